//! Parámetros sysctl de red para tráfico bridged y forwarding.

use std::path::{Path, PathBuf};

use prov_core::{Criticality, EngineError, Host, ProbeState, ProvisionStep, RunContext};

use crate::util::{read_optional, run_checked};

pub struct ConfigureSysctl;

impl ConfigureSysctl {
    pub const CONFIG_PATH: &'static str = "/etc/sysctl.d/k8s.conf";

    fn expected_config() -> String {
        ["net.bridge.bridge-nf-call-iptables = 1",
         "net.bridge.bridge-nf-call-ip6tables = 1",
         "net.ipv4.ip_forward = 1"].join("\n")
        + "\n"
    }
}

impl ProvisionStep for ConfigureSysctl {
    fn name(&self) -> &str {
        "configure-sysctl"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn mutates_paths(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(Self::CONFIG_PATH)]
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        match read_optional(host, Path::new(Self::CONFIG_PATH)) {
            Ok(Some(config)) if config == Self::expected_config() => ProbeState::Satisfied,
            Ok(_) => ProbeState::Unsatisfied,
            Err(detail) => ProbeState::unknown(detail),
        }
    }

    fn action(&self, host: &mut dyn Host, _ctx: &RunContext) -> Result<(), EngineError> {
        host.write_file(Path::new(Self::CONFIG_PATH), &Self::expected_config())
            .map_err(|e| EngineError::ActionFailed(format!("cannot write {}: {e}", Self::CONFIG_PATH)))?;
        run_checked(host, "sysctl", &["--system"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_config_enables_forwarding() {
        let config = ConfigureSysctl::expected_config();
        assert!(config.contains("net.ipv4.ip_forward = 1"));
        assert!(config.ends_with('\n'));
    }
}
