use std::path::PathBuf;

use super::probe::{Criticality, ProbeState};
use crate::errors::EngineError;
use crate::host::Host;
use crate::model::RunContext;
use crate::role::Role;

/// Trait que define un step de aprovisionamiento.
///
/// Invariantes que el engine hace cumplir (no la implementación):
/// - si `precondition` retorna `Satisfied`, `action` nunca se invoca;
/// - una `action` exitosa es seguida por exactamente una evaluación de
///   `postcondition` antes de avanzar al siguiente step.
///
/// Las probes deben ser de sólo lectura respecto al estado del sistema.
pub trait ProvisionStep {
    /// Identificador estable y único dentro del registro.
    fn name(&self) -> &str;

    /// Política de fallo del step.
    fn criticality(&self) -> Criticality;

    /// Predicado sobre el rol resuelto. Por defecto el step aplica a todos.
    fn applies_to(&self, role: Role) -> bool {
        let _ = role;
        true
    }

    /// Archivos que `action` va a mutar. El engine respalda cada uno que
    /// exista antes de invocar la acción.
    fn mutates_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Probe de sólo lectura: ¿el efecto del step ya está en su lugar?
    fn precondition(&self, host: &mut dyn Host, ctx: &RunContext) -> ProbeState;

    /// Operación con efectos (comando externo, escritura de archivo).
    fn action(&self, host: &mut dyn Host, ctx: &RunContext) -> Result<(), EngineError>;

    /// Probe posterior a `action` para confirmar el éxito. Por defecto
    /// re-evalúa la precondición, que para la mayoría de los steps es la
    /// misma observación.
    fn postcondition(&self, host: &mut dyn Host, ctx: &RunContext) -> ProbeState {
        self.precondition(host, ctx)
    }
}
