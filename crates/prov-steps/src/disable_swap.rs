//! Swap deshabilitado: kubelet se niega a arrancar con swap activo.

use std::path::{Path, PathBuf};

use prov_core::{Criticality, EngineError, Host, ProbeState, ProvisionStep, RunContext};

use crate::util::{read_optional, run_checked};

const SWAPS: &str = "/proc/swaps";
const FSTAB: &str = "/etc/fstab";

pub struct DisableSwap;

impl DisableSwap {
    /// ¿Hay algún dispositivo de swap activo? `/proc/swaps` trae una línea
    /// de encabezado; cualquier línea extra es un swap montado.
    fn swap_active(contents: &str) -> bool {
        contents.lines().count() > 1
    }

    /// ¿fstab re-habilitaría swap al reiniciar? Cuenta sólo entradas no
    /// comentadas cuyo tercer campo es `swap`.
    fn fstab_has_swap(contents: &str) -> bool {
        contents.lines()
                .filter(|line| !line.trim_start().starts_with('#'))
                .any(|line| line.split_whitespace().nth(2) == Some("swap"))
    }

    fn strip_swap_lines(contents: &str) -> String {
        let cleaned = contents.lines()
                              .filter(|line| {
                                  line.trim_start().starts_with('#')
                                  || line.split_whitespace().nth(2) != Some("swap")
                              })
                              .collect::<Vec<_>>()
                              .join("\n");
        if contents.ends_with('\n') {
            cleaned + "\n"
        } else {
            cleaned
        }
    }
}

impl ProvisionStep for DisableSwap {
    fn name(&self) -> &str {
        "disable-swap"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn mutates_paths(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(FSTAB)]
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        let swaps = match host.read_to_string(Path::new(SWAPS)) {
            Ok(s) => s,
            Err(e) => return ProbeState::unknown(format!("cannot read {SWAPS}: {e}")),
        };
        if Self::swap_active(&swaps) {
            return ProbeState::Unsatisfied;
        }
        match read_optional(host, Path::new(FSTAB)) {
            // sin fstab no hay nada que re-habilite swap al reiniciar
            Ok(None) => ProbeState::Satisfied,
            Ok(Some(fstab)) if Self::fstab_has_swap(&fstab) => ProbeState::Unsatisfied,
            Ok(Some(_)) => ProbeState::Satisfied,
            Err(detail) => ProbeState::unknown(detail),
        }
    }

    fn action(&self, host: &mut dyn Host, _ctx: &RunContext) -> Result<(), EngineError> {
        run_checked(host, "swapoff", &["-a"])?;

        if let Ok(Some(original)) = read_optional(host, Path::new(FSTAB)) {
            let cleaned = Self::strip_swap_lines(&original);
            if cleaned != original {
                log::info!("removing swap entries from {FSTAB}");
                host.write_file(Path::new(FSTAB), &cleaned)
                    .map_err(|e| EngineError::ActionFailed(format!("cannot rewrite {FSTAB}: {e}")))?;
            }
        }
        Ok(())
    }
}
