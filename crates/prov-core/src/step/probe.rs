//! Estados de probe y política de criticidad.

use serde::{Deserialize, Serialize};

/// Resultado de una probe de pre/postcondición.
///
/// Reemplaza el grep sobre salida de CLIs de los scripts originales: la
/// probe puede seguir invocando comandos y parseando texto internamente,
/// pero hacia el engine sólo expone este enum tipado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeState {
    /// El efecto del step ya está en su lugar.
    Satisfied,
    /// El efecto no está presente; la acción debe ejecutarse.
    Unsatisfied,
    /// La probe misma falló (comando ausente, archivo ilegible). El engine
    /// lo trata como `Unsatisfied` pero registra la anomalía en el detail.
    Unknown { detail: String },
}

impl ProbeState {
    pub fn unknown(detail: impl Into<String>) -> Self {
        ProbeState::Unknown { detail: detail.into() }
    }
}

/// Política de fallo de un step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criticality {
    /// Un fallo detiene el Run completo (fail-fast).
    Fatal,
    /// Un fallo se registra como `Warning` y el Run continúa.
    Recoverable,
}
