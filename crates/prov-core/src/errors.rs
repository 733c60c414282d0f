//! Errores específicos del core (taxonomía por frontera de step).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errores capturados en la frontera de un step. Ninguno debe propagarse
/// más allá del `Engine` sin convertirse en `StepOutcome`, con la única
/// excepción de `AmbiguousRole`, que aborta antes de ejecutar paso alguno.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("precondition probe failed: {0}")] PreconditionProbe(String),
    #[error("backup failed for {path}: {reason}")] BackupFailed { path: String, reason: String },
    #[error("action failed: {0}")] ActionFailed(String),
    #[error("postcondition failed after successful action: {0}")] PostconditionFailed(String),
    #[error("ambiguous role: {0}")] AmbiguousRole(String),
    #[error("run interrupted by signal")] Interrupted,
    #[error("internal: {0}")] Internal(String),
}
