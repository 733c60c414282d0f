//! Definiciones relacionadas a Steps.
//!
//! Un step es la unidad de trabajo de aprovisionamiento: una probe de
//! precondición ("¿ya está satisfecho?"), una acción con efectos, y una
//! probe de postcondición ("¿funcionó?"). Este módulo define:
//! - `ProvisionStep`: interfaz neutral usada por el engine.
//! - `ProbeState` y `Criticality`: contrato observable de las probes.
//! - `StepRegistry`: lista ordenada y declarativa de steps, filtrable por rol.

mod definition;
mod probe;
mod registry;

pub use definition::ProvisionStep;
pub use probe::{Criticality, ProbeState};
pub use registry::{RegistryBuilder, StepRegistry};
