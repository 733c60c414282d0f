//! Resumen humano y veredicto del Run.

use serde::{Deserialize, Serialize};

use crate::model::{Run, StepStatus};

/// Veredicto global del Run; determina el exit code del proceso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Sin fallos ni warnings por encima del umbral.
    Ready,
    /// Sólo warnings de steps `Recoverable`, por encima del umbral.
    NeedsAttention,
    /// Hubo fallo Fatal o el Run fue interrumpido.
    NotReady,
}

impl Verdict {
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Ready => 0,
            Verdict::NotReady => 1,
            Verdict::NeedsAttention => 2,
        }
    }
}

/// Umbral de warnings tolerados antes de degradar `Ready` a
/// `NeedsAttention`. Es política configurable, no constante del engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerdictPolicy {
    pub warn_threshold: usize,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        // cero warnings tolerados por defecto
        Self { warn_threshold: 0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warning: usize,
    pub interrupted: usize,
    pub verdict: Verdict,
}

/// Deriva conteos por estado y veredicto a partir del log de outcomes.
pub fn summarize(run: &Run, policy: VerdictPolicy) -> Summary {
    let failed = run.count(StepStatus::Failed);
    let warning = run.count(StepStatus::Warning);
    let interrupted = run.count(StepStatus::Interrupted);

    let verdict = if failed > 0 || interrupted > 0 {
        Verdict::NotReady
    } else if warning > policy.warn_threshold {
        Verdict::NeedsAttention
    } else {
        Verdict::Ready
    };

    Summary { done: run.count(StepStatus::Done),
              skipped: run.count(StepStatus::Skipped),
              failed,
              warning,
              interrupted,
              verdict }
}

/// Reporte legible para el operador: metadata del Run, outcomes agrupados
/// por estado y conteos. Se emite siempre, incluso en un Run detenido.
pub fn render_human(run: &Run, summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!("run {} role={}\n", run.run_id, run.role));
    if let Some(ip) = &run.node_ip {
        out.push_str(&format!("node ip: {ip}\n"));
    }
    if let Some(ep) = &run.control_endpoint {
        out.push_str(&format!("control endpoint: {ep}\n"));
    }
    out.push_str(&format!("started: {}\n", run.started_at.to_rfc3339()));
    if let Some(fin) = run.finished_at {
        out.push_str(&format!("finished: {}\n", fin.to_rfc3339()));
    }
    out.push('\n');

    for status in [StepStatus::Failed, StepStatus::Interrupted, StepStatus::Warning, StepStatus::Done, StepStatus::Skipped] {
        let group: Vec<_> = run.outcomes.iter().filter(|o| o.status == status).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("{} ({}):\n", status, group.len()));
        for o in group {
            out.push_str(&format!("  {}: {}\n", o.step_name, o.detail));
        }
    }

    out.push_str(&format!("\nverdict: {:?} (done={} skipped={} warning={} failed={} interrupted={})\n",
                          summary.verdict, summary.done, summary.skipped, summary.warning, summary.failed, summary.interrupted));
    out
}
