//! Report sink y resumen del Run.

mod sink;
mod summary;

pub use sink::{FileLogSink, InMemorySink, ReportSink, TeeSink};
pub use summary::{render_human, summarize, Summary, Verdict, VerdictPolicy};
