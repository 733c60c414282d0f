//! Unión de un nodo worker al clúster.

use std::path::Path;

use prov_core::{Criticality, EngineError, Host, ProbeState, ProvisionStep, Role, RunContext};

use crate::control_plane::join_inputs;
use crate::util::run_checked;

const KUBELET_CONF: &str = "/etc/kubernetes/kubelet.conf";

pub struct JoinWorker;

impl ProvisionStep for JoinWorker {
    fn name(&self) -> &str {
        "join-worker"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn applies_to(&self, role: Role) -> bool {
        role == Role::Worker
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        if host.exists(Path::new(KUBELET_CONF)) {
            ProbeState::Satisfied
        } else {
            ProbeState::Unsatisfied
        }
    }

    fn action(&self, host: &mut dyn Host, ctx: &RunContext) -> Result<(), EngineError> {
        let (endpoint, token) = join_inputs(ctx)?;
        run_checked(host, "kubeadm", &["join", endpoint, "--token", token])?;
        Ok(())
    }
}
