//! Resultado inmutable de ejecutar (o saltar) un step.
//!
//! Cada ejecución de step produce exactamente un `StepOutcome`, que se
//! agrega en orden al log del `Run` y se entrega de inmediato al
//! `ReportSink`. Una vez creado no se modifica.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado final de un step dentro de un `Run`.
///
/// Las transiciones válidas por step son:
/// - precondición satisfecha -> `Skipped`
/// - acción + verificación exitosas -> `Done`
/// - fallo en step `Fatal` -> `Failed` (detiene el Run)
/// - fallo en step `Recoverable` -> `Warning` (el Run continúa)
/// - señal de terminación recibida -> `Interrupted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Done,
    Skipped,
    Failed,
    Warning,
    Interrupted,
}

impl fmt::Display for StepStatus {
    /// Forma en mayúsculas usada en el log de líneas (`[DONE]`, `[SKIPPED]`...).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Done => "DONE",
            StepStatus::Skipped => "SKIPPED",
            StepStatus::Failed => "FAILED",
            StepStatus::Warning => "WARNING",
            StepStatus::Interrupted => "INTERRUPTED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step_name: String,
    pub status: StepStatus,
    pub detail: String,
    pub ts: DateTime<Utc>,
}

impl StepOutcome {
    pub fn new(step_name: impl Into<String>, status: StepStatus, detail: impl Into<String>) -> Self {
        Self { step_name: step_name.into(),
               status,
               detail: detail.into(),
               ts: Utc::now() }
    }

    /// Línea machine-parseable: `[<ISO8601>] [<STATUS>] <step>: <detail>`.
    pub fn log_line(&self) -> String {
        format!("[{}] [{}] {}: {}", self.ts.to_rfc3339(), self.status, self.step_name, self.detail)
    }
}
