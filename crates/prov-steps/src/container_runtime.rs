//! Runtime de contenedores (containerd) instalado y habilitado.
//!
//! Recoverable: un nodo sin runtime puede corregirse a mano después; el
//! resto de las validaciones del pipeline siguen aportando información.

use prov_core::{Criticality, EngineError, Host, HostError, ProbeState, ProvisionStep, RunContext};

use crate::util::run_checked;

pub struct InstallRuntime;

impl InstallRuntime {
    /// Probe: `containerd --version` responde con exit 0.
    fn probe(host: &mut dyn Host) -> ProbeState {
        match host.run("containerd", &["--version"]) {
            Ok(out) if out.success() => ProbeState::Satisfied,
            Ok(_) => ProbeState::Unsatisfied,
            // binario ausente = runtime no instalado, no un fallo de probe
            Err(HostError::Launch { ref source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                ProbeState::Unsatisfied
            }
            Err(e) => ProbeState::unknown(e.to_string()),
        }
    }
}

impl ProvisionStep for InstallRuntime {
    fn name(&self) -> &str {
        "install-runtime"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Recoverable
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        Self::probe(host)
    }

    fn action(&self, host: &mut dyn Host, _ctx: &RunContext) -> Result<(), EngineError> {
        run_checked(host, "apt-get", &["install", "-y", "containerd"])?;
        run_checked(host, "systemctl", &["enable", "--now", "containerd"])?;
        Ok(())
    }
}
