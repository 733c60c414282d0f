//! Contexto de ejecución entregado a los steps y bandera de interrupción.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::role::Role;

/// Bandera compartida entre el manejador de señales, el engine y el helper
/// de retry. Una vez activada no se desactiva dentro del mismo proceso.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Datos del nodo resueltos una vez al inicio del Run, inmutables después.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub role: Role,
    pub node_ip: Option<String>,
    pub control_endpoint: Option<String>,
    pub join_token: Option<String>,
    pub interrupt: InterruptFlag,
}

impl RunContext {
    pub fn new(role: Role) -> Self {
        Self { role,
               node_ip: None,
               control_endpoint: None,
               join_token: None,
               interrupt: InterruptFlag::new() }
    }
}
