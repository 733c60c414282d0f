//! Agregado top-level de una ejecución del pipeline.
//!
//! Reemplaza el estado mutable global de los scripts originales: contadores
//! y banderas viven aquí y el `Engine` lo recibe/retorna explícitamente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StepOutcome, StepStatus};
use crate::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: Uuid,
    pub role: Role,
    pub node_ip: Option<String>,
    pub control_endpoint: Option<String>,
    pub outcomes: Vec<StepOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Run {
    pub fn new(role: Role, node_ip: Option<String>, control_endpoint: Option<String>) -> Self {
        Self { run_id: Uuid::new_v4(),
               role,
               node_ip,
               control_endpoint,
               outcomes: Vec::new(),
               started_at: Utc::now(),
               finished_at: None }
    }

    /// Agrega un outcome al final del log (orden de ejecución = orden del log).
    pub fn push(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finalize(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn has_failed(&self) -> bool {
        self.count(StepStatus::Failed) > 0
    }

    pub fn was_interrupted(&self) -> bool {
        self.count(StepStatus::Interrupted) > 0
    }
}
