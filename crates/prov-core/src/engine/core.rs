//! Core Engine implementation
//!
//! Motor secuencial e idempotente del pipeline de aprovisionamiento.
//!
//! Responsable de recorrer los steps aplicables al rol en orden de
//! declaración, haciendo cumplir el contrato por step:
//! `Pending -> (probe) -> Skipped` o
//! `Pending -> respaldo -> acción -> verificación -> {Done, Warning, Failed}`.
//!
//! La idempotencia es re-derivada del estado actual del sistema en cada
//! ejecución (las probes), nunca "recordada" de runs anteriores. Un fallo
//! Fatal detiene el resto del pipeline; los fallos Recoverable se acumulan
//! como warnings. Todo error queda capturado en la frontera del step y
//! convertido en `StepOutcome`: un defecto de programación en un step
//! (panic) se registra como fallo, no tumba el proceso.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::errors::EngineError;
use crate::host::{BackupManager, BackupOutcome, Host};
use crate::model::{Run, RunContext, StepOutcome, StepStatus};
use crate::report::ReportSink;
use crate::step::{Criticality, ProbeState, ProvisionStep, StepRegistry};

/// Motor de ejecución, genérico sobre el sink de reporte y el backup
/// manager para que los tests corran completamente en memoria.
pub struct Engine<S, B>
    where S: ReportSink,
          B: BackupManager
{
    sink: S,
    backups: B,
    dry_run: bool,
}

impl<S, B> Engine<S, B>
    where S: ReportSink,
          B: BackupManager
{
    pub fn new(sink: S, backups: B) -> Self {
        Self { sink,
               backups,
               dry_run: false }
    }

    /// En dry-run se evalúan y reportan las precondiciones, pero no se
    /// ejecutan acciones ni respaldos.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ejecuta el Run completo: steps aplicables al rol, en orden, hasta
    /// terminar, hasta el primer fallo Fatal, o hasta una interrupción.
    /// Siempre retorna el `Run` finalizado con su log de outcomes, de modo
    /// que el reporte final pueda emitirse incluso en un Run detenido.
    pub fn run(&mut self, registry: &StepRegistry, host: &mut dyn Host, ctx: &RunContext) -> Run {
        let mut run = Run::new(ctx.role, ctx.node_ip.clone(), ctx.control_endpoint.clone());

        for step in registry.steps_for(ctx.role) {
            if ctx.interrupt.is_set() {
                self.record(&mut run,
                            StepOutcome::new(step.name(), StepStatus::Interrupted, "termination signal received before step"));
                break;
            }
            let halt = self.run_step(step, host, ctx, &mut run);
            if halt {
                break;
            }
        }

        run.finalize();
        run
    }

    /// Ejecuta un step y retorna `true` si el Run debe detenerse.
    fn run_step(&mut self, step: &dyn ProvisionStep, host: &mut dyn Host, ctx: &RunContext, run: &mut Run) -> bool {
        let name = step.name().to_string();

        // 1. precondición: Satisfied salta la acción (idempotencia)
        let mut notes: Vec<String> = Vec::new();
        match catch_probe(|| step.precondition(&mut *host, ctx)) {
            ProbeState::Satisfied => {
                self.record(run, StepOutcome::new(&name, StepStatus::Skipped, "precondition already satisfied"));
                return false;
            }
            ProbeState::Unknown { detail } => {
                // se trata como insatisfecha, pero la anomalía queda en el detail
                log::warn!("{name}: precondition probe error, treating as unsatisfied: {detail}");
                notes.push(format!("precondition probe error treated as unsatisfied: {detail}"));
            }
            ProbeState::Unsatisfied => {}
        }

        if self.dry_run {
            let detail = join_notes(&notes, "dry-run: action not executed");
            self.record(run, StepOutcome::new(&name, StepStatus::Skipped, detail));
            return false;
        }

        // 2. respaldo de los archivos que la acción va a mutar
        let mut backup_warnings: Vec<String> = Vec::new();
        for path in step.mutates_paths() {
            match self.backups.backup(&path) {
                Ok(BackupOutcome::Created(rec)) => {
                    log::info!("{name}: backed up {} -> {}", rec.original_path.display(), rec.backup_path.display());
                }
                Ok(BackupOutcome::AbsentNoOp) => {
                    // nada que preservar; informativo, no error
                    log::info!("{name}: no backup for {}: original absent", path.display());
                }
                Err(e) => {
                    let msg = format!("backup failed for {}: {e}", path.display());
                    match step.criticality() {
                        Criticality::Fatal => {
                            self.record(run, StepOutcome::new(&name, StepStatus::Failed, join_notes(&notes, &msg)));
                            return true;
                        }
                        Criticality::Recoverable => {
                            log::warn!("{name}: {msg}; action proceeds");
                            backup_warnings.push(msg);
                        }
                    }
                }
            }
        }
        notes.extend(backup_warnings.iter().cloned());

        // 3. acción
        let action_res = match catch_unwind(AssertUnwindSafe(|| step.action(&mut *host, ctx))) {
            Ok(res) => res,
            Err(payload) => Err(EngineError::Internal(format!("step panicked: {}", panic_message(&payload)))),
        };

        if let Err(e) = action_res {
            if e == EngineError::Interrupted {
                self.record(run, StepOutcome::new(&name, StepStatus::Interrupted, join_notes(&notes, "action interrupted by signal")));
                return true;
            }
            let msg = join_notes(&notes, &e.to_string());
            return match step.criticality() {
                Criticality::Fatal => {
                    self.record(run, StepOutcome::new(&name, StepStatus::Failed, msg));
                    true
                }
                Criticality::Recoverable => {
                    self.record(run, StepOutcome::new(&name, StepStatus::Warning, msg));
                    false
                }
            };
        }

        // 4. verificación: exactamente una evaluación de postcondición
        match catch_probe(|| step.postcondition(&mut *host, ctx)) {
            ProbeState::Satisfied => {
                if backup_warnings.is_empty() {
                    self.record(run, StepOutcome::new(&name, StepStatus::Done, join_notes(&notes, "action completed and verified")));
                } else {
                    // la acción sirvió, pero el respaldo no: el operador debe saberlo
                    self.record(run, StepOutcome::new(&name, StepStatus::Warning, join_notes(&notes, "action completed and verified")));
                }
                false
            }
            state => {
                // señal más fuerte que un fallo de acción: la acción reportó
                // éxito pero la verificación lo contradice
                let why = match state {
                    ProbeState::Unknown { detail } => detail,
                    _ => "postcondition still unsatisfied".to_string(),
                };
                let msg = join_notes(&notes, &format!("action reported success but verification failed: {why}"));
                match step.criticality() {
                    Criticality::Fatal => {
                        self.record(run, StepOutcome::new(&name, StepStatus::Failed, msg));
                        true
                    }
                    Criticality::Recoverable => {
                        self.record(run, StepOutcome::new(&name, StepStatus::Warning, msg));
                        false
                    }
                }
            }
        }
    }

    /// Entrega el outcome al sink de inmediato y lo agrega al log del Run.
    fn record(&mut self, run: &mut Run, outcome: StepOutcome) {
        match outcome.status {
            StepStatus::Failed => log::error!("{}", outcome.log_line()),
            StepStatus::Warning | StepStatus::Interrupted => log::warn!("{}", outcome.log_line()),
            _ => log::info!("{}", outcome.log_line()),
        }
        self.sink.record(&outcome);
        run.push(outcome);
    }
}

/// Evalúa una probe conteniendo panics: una probe que revienta equivale a
/// `Unknown` con el mensaje del panic.
fn catch_probe<F>(f: F) -> ProbeState
    where F: FnOnce() -> ProbeState
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(state) => state,
        Err(payload) => ProbeState::unknown(format!("probe panicked: {}", panic_message(&payload))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn join_notes(notes: &[String], tail: &str) -> String {
    if notes.is_empty() {
        tail.to_string()
    } else {
        format!("{}; {}", notes.join("; "), tail)
    }
}
