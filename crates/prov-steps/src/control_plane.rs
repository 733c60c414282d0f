//! Inicialización y unión del plano de control.

use std::path::Path;

use prov_core::{Criticality, EngineError, Host, ProbeState, ProvisionStep, Role, RunContext};

use crate::util::run_checked;

pub const ADMIN_CONF: &str = "/etc/kubernetes/admin.conf";
const KUBELET_CONF: &str = "/etc/kubernetes/kubelet.conf";

/// `kubeadm init` en el primer nodo de control. Idempotente vía la
/// existencia de admin.conf, que kubeadm sólo genera al completar el init.
pub struct InitControlPlane;

impl ProvisionStep for InitControlPlane {
    fn name(&self) -> &str {
        "init-control-plane"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn applies_to(&self, role: Role) -> bool {
        role == Role::FirstControlNode
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        if host.exists(Path::new(ADMIN_CONF)) {
            ProbeState::Satisfied
        } else {
            ProbeState::Unsatisfied
        }
    }

    fn action(&self, host: &mut dyn Host, ctx: &RunContext) -> Result<(), EngineError> {
        let mut args: Vec<String> = vec!["init".into()];
        if let Some(ep) = &ctx.control_endpoint {
            args.push("--control-plane-endpoint".into());
            args.push(ep.clone());
        }
        if let Some(ip) = &ctx.node_ip {
            args.push("--apiserver-advertise-address".into());
            args.push(ip.clone());
        }
        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        run_checked(host, "kubeadm", &arg_refs)?;
        Ok(())
    }
}

/// `kubeadm join --control-plane` en nodos de control adicionales.
pub struct JoinControlPlane;

impl ProvisionStep for JoinControlPlane {
    fn name(&self) -> &str {
        "join-control-plane"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn applies_to(&self, role: Role) -> bool {
        role == Role::AdditionalControlNode
    }

    fn precondition(&self, host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        // un nodo ya unido tiene kubelet.conf emitido por kubeadm
        if host.exists(Path::new(KUBELET_CONF)) {
            ProbeState::Satisfied
        } else {
            ProbeState::Unsatisfied
        }
    }

    fn action(&self, host: &mut dyn Host, ctx: &RunContext) -> Result<(), EngineError> {
        let (endpoint, token) = join_inputs(ctx)?;
        run_checked(host, "kubeadm", &["join", endpoint, "--token", token, "--control-plane"])?;
        Ok(())
    }
}

/// Entradas obligatorias para cualquier `kubeadm join`.
pub(crate) fn join_inputs(ctx: &RunContext) -> Result<(&str, &str), EngineError> {
    match (&ctx.control_endpoint, &ctx.join_token) {
        (Some(ep), Some(token)) => Ok((ep.as_str(), token.as_str())),
        _ => Err(EngineError::ActionFailed("join requires --control-endpoint and --join-token".into())),
    }
}
