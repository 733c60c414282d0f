//! Motor de ejecución del pipeline.

mod core;

pub use core::Engine;
