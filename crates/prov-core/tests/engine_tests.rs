//! Tests de las propiedades del motor: idempotencia, fail-fast, warnings
//! que no detienen, captura de panics y reporte siempre emitido. Todo corre
//! en memoria: steps stub, host nulo y backups stub.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use prov_core::{summarize, BackupManager, BackupOutcome, BackupRecord, CommandOutput, Criticality, Engine, EngineError, Host,
                HostError, InMemorySink, ProbeState, ProvisionStep, Role, RunContext, StepRegistry, StepStatus, Verdict,
                VerdictPolicy};

/// Host que no sabe hacer nada; los steps stub no lo usan.
struct NullHost;

impl Host for NullHost {
    fn run(&mut self, program: &str, _args: &[&str]) -> Result<CommandOutput, HostError> {
        Err(HostError::Launch { cmd: program.to_string(),
                                source: std::io::Error::new(std::io::ErrorKind::NotFound, "null host") })
    }
    fn read_to_string(&self, path: &Path) -> Result<String, HostError> {
        Err(HostError::Io { path: path.to_path_buf(),
                            source: std::io::Error::new(std::io::ErrorKind::NotFound, "null host") })
    }
    fn write_file(&mut self, _path: &Path, _contents: &str) -> Result<(), HostError> {
        Ok(())
    }
    fn exists(&self, _path: &Path) -> bool {
        false
    }
}

/// Backup manager stub: no-op o fallo forzado.
struct StubBackups {
    fail: bool,
}

impl BackupManager for StubBackups {
    fn backup(&mut self, path: &Path) -> Result<BackupOutcome, HostError> {
        if self.fail {
            Err(HostError::Io { path: path.to_path_buf(),
                                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk full") })
        } else {
            Ok(BackupOutcome::Created(BackupRecord { original_path: path.to_path_buf(),
                                                     backup_path: path.with_extension("bak"),
                                                     ts: chrono::Utc::now() }))
        }
    }
}

type Trace = Arc<Mutex<Vec<String>>>;

/// Step configurable para los tests; registra cada invocación en el trace.
struct StubStep {
    name: &'static str,
    criticality: Criticality,
    pre: ProbeState,
    action_err: Option<EngineError>,
    panic_in_action: bool,
    post: ProbeState,
    mutates: Vec<PathBuf>,
    trace: Trace,
}

impl StubStep {
    fn ok(name: &'static str, criticality: Criticality, trace: &Trace) -> Self {
        Self { name,
               criticality,
               pre: ProbeState::Unsatisfied,
               action_err: None,
               panic_in_action: false,
               post: ProbeState::Satisfied,
               mutates: Vec::new(),
               trace: Arc::clone(trace) }
    }

    fn failing(name: &'static str, criticality: Criticality, trace: &Trace) -> Self {
        Self { action_err: Some(EngineError::ActionFailed("exit status 1".into())),
               ..Self::ok(name, criticality, trace) }
    }
}

impl ProvisionStep for StubStep {
    fn name(&self) -> &str {
        self.name
    }
    fn criticality(&self) -> Criticality {
        self.criticality
    }
    fn mutates_paths(&self) -> Vec<PathBuf> {
        self.mutates.clone()
    }
    fn precondition(&self, _host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        self.trace.lock().unwrap().push(format!("pre:{}", self.name));
        self.pre.clone()
    }
    fn action(&self, _host: &mut dyn Host, _ctx: &RunContext) -> Result<(), EngineError> {
        self.trace.lock().unwrap().push(format!("act:{}", self.name));
        if self.panic_in_action {
            panic!("defecto de programación en el step");
        }
        match &self.action_err {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
    fn postcondition(&self, _host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        self.trace.lock().unwrap().push(format!("post:{}", self.name));
        self.post.clone()
    }
}

fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

fn engine() -> Engine<InMemorySink, StubBackups> {
    Engine::new(InMemorySink::new(), StubBackups { fail: false })
}

fn ctx() -> RunContext {
    RunContext::new(Role::Worker)
}

fn statuses(run: &prov_core::Run) -> Vec<(String, StepStatus)> {
    run.outcomes.iter().map(|o| (o.step_name.clone(), o.status)).collect()
}

#[test]
fn satisfied_precondition_never_invokes_action() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { pre: ProbeState::Satisfied,
                                                      ..StubStep::ok("a", Criticality::Fatal, &t) })
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run), vec![("a".to_string(), StepStatus::Skipped)]);
    let calls = t.lock().unwrap().clone();
    assert_eq!(calls, vec!["pre:a"], "ni action ni postcondition deben correr");
}

#[test]
fn successful_action_evaluates_postcondition_exactly_once() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep::ok("a", Criticality::Fatal, &t)).build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run), vec![("a".to_string(), StepStatus::Done)]);
    let calls = t.lock().unwrap().clone();
    assert_eq!(calls, vec!["pre:a", "act:a", "post:a"]);
}

#[test]
fn fatal_failure_halts_rest_of_pipeline() {
    // [A(Recoverable ok), B(Fatal falla), C(Recoverable)] -> [Done, Failed], sin outcome para C
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep::ok("a", Criticality::Recoverable, &t))
                                     .step(StubStep::failing("b", Criticality::Fatal, &t))
                                     .step(StubStep::ok("c", Criticality::Recoverable, &t))
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run),
               vec![("a".to_string(), StepStatus::Done), ("b".to_string(), StepStatus::Failed)]);
    let calls = t.lock().unwrap().clone();
    assert!(!calls.iter().any(|c| c.ends_with(":c")), "C no debe ejecutarse: {calls:?}");
}

#[test]
fn recoverable_failure_does_not_halt() {
    // [A(Recoverable falla), B(Fatal ok)] -> [Warning, Done]
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep::failing("a", Criticality::Recoverable, &t))
                                     .step(StubStep::ok("b", Criticality::Fatal, &t))
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run),
               vec![("a".to_string(), StepStatus::Warning), ("b".to_string(), StepStatus::Done)]);
}

#[test]
fn unknown_precondition_treated_as_unsatisfied_with_anomaly_noted() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { pre: ProbeState::unknown("kubectl: command not found"),
                                                      ..StubStep::ok("a", Criticality::Fatal, &t) })
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(run.outcomes[0].status, StepStatus::Done);
    assert!(run.outcomes[0].detail.contains("kubectl: command not found"),
            "detail: {}",
            run.outcomes[0].detail);
    assert!(t.lock().unwrap().contains(&"act:a".to_string()), "la acción debe ejecutarse");
}

#[test]
fn failed_postcondition_after_successful_action() {
    // corrupción silenciosa: la acción reporta éxito pero la verificación no
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { post: ProbeState::Unsatisfied,
                                                      ..StubStep::ok("a", Criticality::Fatal, &t) })
                                     .step(StubStep::ok("b", Criticality::Fatal, &t))
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run), vec![("a".to_string(), StepStatus::Failed)]);
    assert!(run.outcomes[0].detail.contains("verification failed"));
}

#[test]
fn failed_postcondition_on_recoverable_step_continues() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { post: ProbeState::Unsatisfied,
                                                      ..StubStep::ok("a", Criticality::Recoverable, &t) })
                                     .step(StubStep::ok("b", Criticality::Fatal, &t))
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run),
               vec![("a".to_string(), StepStatus::Warning), ("b".to_string(), StepStatus::Done)]);
}

#[test]
fn step_panic_recorded_as_failure_without_killing_process() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { panic_in_action: true,
                                                      ..StubStep::ok("a", Criticality::Fatal, &t) })
                                     .build();
    let run = engine().run(&reg, &mut NullHost, &ctx());

    assert_eq!(run.outcomes[0].status, StepStatus::Failed);
    assert!(run.outcomes[0].detail.contains("panicked"), "detail: {}", run.outcomes[0].detail);
}

#[test]
fn report_emitted_even_on_halted_run() {
    // fallo Fatal en el step 2 de 5: el sink tiene exactamente 2 outcomes
    // y el veredicto es NotReady
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep::ok("s1", Criticality::Fatal, &t))
                                     .step(StubStep::failing("s2", Criticality::Fatal, &t))
                                     .step(StubStep::ok("s3", Criticality::Fatal, &t))
                                     .step(StubStep::ok("s4", Criticality::Fatal, &t))
                                     .step(StubStep::ok("s5", Criticality::Fatal, &t))
                                     .build();
    let mut eng = engine();
    let run = eng.run(&reg, &mut NullHost, &ctx());

    assert_eq!(eng.sink().outcomes.len(), 2);
    assert_eq!(run.outcomes.len(), 2);
    let summary = summarize(&run, VerdictPolicy::default());
    assert_eq!(summary.verdict, Verdict::NotReady);
}

#[test]
fn failed_backup_on_fatal_step_aborts() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { mutates: vec![PathBuf::from("/etc/fstab")],
                                                      ..StubStep::ok("a", Criticality::Fatal, &t) })
                                     .step(StubStep::ok("b", Criticality::Fatal, &t))
                                     .build();
    let mut eng = Engine::new(InMemorySink::new(), StubBackups { fail: true });
    let run = eng.run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run), vec![("a".to_string(), StepStatus::Failed)]);
    assert!(!t.lock().unwrap().contains(&"act:a".to_string()), "la acción no debe correr sin respaldo");
}

#[test]
fn failed_backup_on_recoverable_step_warns_and_action_proceeds() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep { mutates: vec![PathBuf::from("/etc/fstab")],
                                                      ..StubStep::ok("a", Criticality::Recoverable, &t) })
                                     .build();
    let mut eng = Engine::new(InMemorySink::new(), StubBackups { fail: true });
    let run = eng.run(&reg, &mut NullHost, &ctx());

    assert!(t.lock().unwrap().contains(&"act:a".to_string()));
    assert_eq!(run.outcomes[0].status, StepStatus::Warning);
    assert!(run.outcomes[0].detail.contains("backup failed"));
}

#[test]
fn dry_run_executes_no_actions_or_backups() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep::ok("a", Criticality::Fatal, &t))
                                     .step(StubStep { pre: ProbeState::Satisfied,
                                                      ..StubStep::ok("b", Criticality::Fatal, &t) })
                                     .build();
    let mut eng = engine().dry_run(true);
    let run = eng.run(&reg, &mut NullHost, &ctx());

    assert_eq!(statuses(&run),
               vec![("a".to_string(), StepStatus::Skipped), ("b".to_string(), StepStatus::Skipped)]);
    let calls = t.lock().unwrap().clone();
    assert_eq!(calls, vec!["pre:a", "pre:b"]);
}

#[test]
fn interruption_finalizes_run_with_recorded_outcome() {
    let t = trace();
    let reg = StepRegistry::builder().step(StubStep::ok("a", Criticality::Fatal, &t))
                                     .step(StubStep::ok("b", Criticality::Fatal, &t))
                                     .build();
    let context = ctx();
    context.interrupt.set();
    let run = engine().run(&reg, &mut NullHost, &context);

    assert_eq!(run.outcomes.len(), 1);
    assert_eq!(run.outcomes[0].status, StepStatus::Interrupted);
    assert!(run.finished_at.is_some());
    let summary = summarize(&run, VerdictPolicy::default());
    assert_eq!(summary.verdict, Verdict::NotReady);
}

/// Step cuyo estado "durable" vive en un booleano compartido: la probe lo
/// lee, la acción lo fija. Modela idempotencia real re-derivada del estado.
struct StatefulStep {
    name: &'static str,
    state: Arc<Mutex<bool>>,
}

impl ProvisionStep for StatefulStep {
    fn name(&self) -> &str {
        self.name
    }
    fn criticality(&self) -> Criticality {
        Criticality::Fatal
    }
    fn precondition(&self, _host: &mut dyn Host, _ctx: &RunContext) -> ProbeState {
        if *self.state.lock().unwrap() { ProbeState::Satisfied } else { ProbeState::Unsatisfied }
    }
    fn action(&self, _host: &mut dyn Host, _ctx: &RunContext) -> Result<(), EngineError> {
        *self.state.lock().unwrap() = true;
        Ok(())
    }
}

#[test]
fn second_run_skips_everything_left_done() {
    let s1 = Arc::new(Mutex::new(false));
    let s2 = Arc::new(Mutex::new(false));
    let build = |a: &Arc<Mutex<bool>>, b: &Arc<Mutex<bool>>| {
        StepRegistry::builder().step(StatefulStep { name: "uno", state: Arc::clone(a) })
                               .step(StatefulStep { name: "dos", state: Arc::clone(b) })
                               .build()
    };

    let first = engine().run(&build(&s1, &s2), &mut NullHost, &ctx());
    assert_eq!(statuses(&first),
               vec![("uno".to_string(), StepStatus::Done), ("dos".to_string(), StepStatus::Done)]);

    // mismo estado del sistema, registro reconstruido desde cero
    let second = engine().run(&build(&s1, &s2), &mut NullHost, &ctx());
    assert_eq!(statuses(&second),
               vec![("uno".to_string(), StepStatus::Skipped), ("dos".to_string(), StepStatus::Skipped)]);
}
