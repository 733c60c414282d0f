//! Sinks de outcomes, append-only.
//!
//! `record` se invoca inmediatamente al producirse cada outcome, no al
//! final del Run: si el proceso muere a mitad de camino, el progreso
//! parcial ya quedó en el log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::model::StepOutcome;

pub trait ReportSink {
    /// Registra un outcome de inmediato (sin buffering hasta el final).
    fn record(&mut self, outcome: &StepOutcome);
}

/// Sink en memoria, usado por tests y para componer el resumen.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub outcomes: Vec<StepOutcome>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for InMemorySink {
    fn record(&mut self, outcome: &StepOutcome) {
        self.outcomes.push(outcome.clone());
    }
}

/// Log durable en disco: una línea por outcome, formato
/// `[<ISO8601>] [<STATUS>] <step_name>: <detail>`.
pub struct FileLogSink {
    file: File,
}

impl FileLogSink {
    /// Abre (o crea) el archivo en modo append.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl ReportSink for FileLogSink {
    fn record(&mut self, outcome: &StepOutcome) {
        // Un log que no se puede escribir no debe tumbar el Run; se avisa
        // por el canal de diagnóstico y se sigue.
        if let Err(e) = writeln!(self.file, "{}", outcome.log_line()).and_then(|_| self.file.flush()) {
            log::warn!("could not append to report log: {e}");
        }
    }
}

/// Fan-out hacia dos sinks (típicamente archivo + memoria).
pub struct TeeSink<A: ReportSink, B: ReportSink> {
    pub first: A,
    pub second: B,
}

impl<A: ReportSink, B: ReportSink> TeeSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ReportSink, B: ReportSink> ReportSink for TeeSink<A, B> {
    fn record(&mut self, outcome: &StepOutcome) {
        self.first.record(outcome);
        self.second.record(outcome);
    }
}
