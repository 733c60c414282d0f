//! prov-core: motor idempotente de aprovisionamiento multi-step
//!
//! Orquesta steps declarativos (precondición / acción / postcondición) sin
//! tocar el sistema por sí mismo: los efectos pasan por los traits de
//! `host` que implementa `prov-host`.

pub mod engine;
pub mod errors;
pub mod host;
pub mod model;
pub mod report;
pub mod retry;
pub mod role;
pub mod step;

pub use engine::Engine;
pub use errors::EngineError;
pub use host::{BackupManager, BackupOutcome, BackupRecord, CommandOutput, Host, HostError};
pub use model::{InterruptFlag, Run, RunContext, StepOutcome, StepStatus};
pub use report::{render_human, summarize, FileLogSink, InMemorySink, ReportSink, Summary, TeeSink, Verdict, VerdictPolicy};
pub use retry::{wait_for, RetryPolicy};
pub use role::{resolve_role, Role};
pub use step::{Criticality, ProbeState, ProvisionStep, RegistryBuilder, StepRegistry};
