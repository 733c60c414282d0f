//! Registro ordenado y declarativo de steps.
//!
//! El orden de declaración es el orden de ejecución; `steps_for` sólo
//! filtra por rol, nunca reordena. Mismo rol -> misma secuencia, siempre.

use super::definition::ProvisionStep;
use crate::role::Role;

pub struct StepRegistry {
    steps: Vec<Box<dyn ProvisionStep>>,
}

impl StepRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder { steps: Vec::new() }
    }

    /// Steps aplicables al rol, preservando el orden global de declaración.
    pub fn steps_for(&self, role: Role) -> Vec<&dyn ProvisionStep> {
        self.steps
            .iter()
            .filter(|s| s.applies_to(role))
            .map(|s| s.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builder encadenado: consume `self` en cada paso, como el resto de los
/// builders del workspace.
pub struct RegistryBuilder {
    steps: Vec<Box<dyn ProvisionStep>>,
}

impl RegistryBuilder {
    pub fn step<S>(mut self, step: S) -> Self
        where S: ProvisionStep + 'static
    {
        // el nombre es la clave del outcome en el reporte; debe ser único
        assert!(!self.steps.iter().any(|s| s.name() == step.name()),
                "nombre de step duplicado: {}",
                step.name());
        self.steps.push(Box::new(step));
        self
    }

    pub fn build(self) -> StepRegistry {
        StepRegistry { steps: self.steps }
    }
}
