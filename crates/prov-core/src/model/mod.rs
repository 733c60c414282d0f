//! Modelo de datos del pipeline: outcomes, contexto y el agregado `Run`.

mod context;
mod outcome;
mod run;

pub use context::{InterruptFlag, RunContext};
pub use outcome::{StepOutcome, StepStatus};
pub use run::Run;
