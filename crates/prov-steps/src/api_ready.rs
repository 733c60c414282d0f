//! Espera acotada a que el endpoint del API server responda.
//!
//! Va después del init y antes de los joins: el endpoint del plano de
//! control tiene que existir antes de que un join pueda correr. La espera
//! usa el helper único de retry del core; el timeout se trata como fallo de
//! acción normal.

use prov_core::{retry, Criticality, EngineError, Host, HostError, ProbeState, ProvisionStep, RetryPolicy, Role, RunContext};

pub struct WaitApiReady {
    policy: RetryPolicy,
}

impl WaitApiReady {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    fn endpoint(ctx: &RunContext) -> String {
        // el primer nodo de control puede no tener endpoint externo aún
        ctx.control_endpoint.clone().unwrap_or_else(|| "127.0.0.1:6443".to_string())
    }

    /// Probe: el healthz del API server responde 2xx. `curl -f` convierte
    /// respuestas de error HTTP en exit code distinto de cero.
    fn probe(host: &mut dyn Host, ctx: &RunContext) -> ProbeState {
        let url = format!("https://{}/healthz", Self::endpoint(ctx));
        match host.run("curl", &["-k", "-f", "-s", "-o", "/dev/null", "--max-time", "5", &url]) {
            Ok(out) if out.success() => ProbeState::Satisfied,
            Ok(_) => ProbeState::Unsatisfied,
            Err(HostError::Launch { ref source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                ProbeState::unknown("curl not available")
            }
            Err(e) => ProbeState::unknown(e.to_string()),
        }
    }
}

impl ProvisionStep for WaitApiReady {
    fn name(&self) -> &str {
        "wait-api-ready"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }

    fn applies_to(&self, role: Role) -> bool {
        matches!(role, Role::FirstControlNode | Role::AdditionalControlNode)
    }

    fn precondition(&self, host: &mut dyn Host, ctx: &RunContext) -> ProbeState {
        Self::probe(host, ctx)
    }

    fn action(&self, host: &mut dyn Host, ctx: &RunContext) -> Result<(), EngineError> {
        retry::wait_for(self.policy, &ctx.interrupt, || Self::probe(&mut *host, ctx))
    }
}
