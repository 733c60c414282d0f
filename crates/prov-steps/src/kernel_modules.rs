//! Módulos de kernel requeridos por el runtime de contenedores y el CNI.

use std::path::{Path, PathBuf};

use prov_core::{Criticality, EngineError, Host, ProbeState, ProvisionStep, RunContext};

use crate::util::{read_optional, run_checked};

pub struct LoadKernelModules;

impl LoadKernelModules {
    pub const CONFIG_PATH: &'static str = "/etc/modules-load.d/k8s.conf";
    pub const MODULES: [&'static str; 2] = ["overlay", "br_netfilter"];

    fn expected_config() -> String {
        Self::MODULES.join("\n") + "\n"
    }

    fn is_loaded(host: &dyn Host, module: &str) -> bool {
        host.exists(&Path::new("/sys/module/").join(module))
    }
}

impl ProvisionStep for LoadKernelModules {
    fn name(&self) -> &str {
        "load-kernel-modules"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn mutates_paths(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(Self::CONFIG_PATH)]
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        match read_optional(host, Path::new(Self::CONFIG_PATH)) {
            Ok(Some(config)) if config == Self::expected_config() => {}
            Ok(_) => return ProbeState::Unsatisfied,
            Err(detail) => return ProbeState::unknown(detail),
        }
        for module in Self::MODULES {
            if !Self::is_loaded(host, module) {
                return ProbeState::Unsatisfied;
            }
        }
        ProbeState::Satisfied
    }

    fn action(&self, host: &mut dyn Host, _ctx: &RunContext) -> Result<(), EngineError> {
        host.write_file(Path::new(Self::CONFIG_PATH), &Self::expected_config())
            .map_err(|e| EngineError::ActionFailed(format!("cannot write {}: {e}", Self::CONFIG_PATH)))?;
        for module in Self::MODULES {
            run_checked(host, "modprobe", &[module])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_config_lists_both_modules() {
        let config = LoadKernelModules::expected_config();
        assert_eq!(config, "overlay\nbr_netfilter\n");
    }
}
