//! Helper único de espera acotada.
//!
//! Los scripts originales duplicaban loops ad hoc de retry-con-sleep en
//! cada variante; aquí hay uno solo, reutilizado por cualquier step que
//! espere disponibilidad de red o de servicio. El engine bloquea hasta que
//! la probe se satisfaga o el timeout venza; no hay concurrencia de fondo.

use std::thread;
use std::time::{Duration, Instant};

use crate::errors::EngineError;
use crate::model::InterruptFlag;
use crate::step::ProbeState;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self { max_wait, poll_interval }
    }
}

/// Evalúa `probe` hasta que retorne `Satisfied`, venza `max_wait`, o se
/// active la bandera de interrupción. La probe se evalúa al menos una vez.
/// El timeout se reporta como fallo de acción normal: las reglas de
/// criticidad del step aplican sin caso especial.
pub fn wait_for<F>(policy: RetryPolicy, interrupt: &InterruptFlag, mut probe: F) -> Result<(), EngineError>
    where F: FnMut() -> ProbeState
{
    let started = Instant::now();
    let mut last_detail = String::new();
    loop {
        if interrupt.is_set() {
            return Err(EngineError::Interrupted);
        }
        match probe() {
            ProbeState::Satisfied => return Ok(()),
            ProbeState::Unsatisfied => last_detail.clear(),
            ProbeState::Unknown { detail } => last_detail = detail,
        }
        if started.elapsed() >= policy.max_wait {
            let mut msg = format!("timed out after {:?}", policy.max_wait);
            if !last_detail.is_empty() {
                msg.push_str(&format!(" (last probe error: {last_detail})"));
            }
            return Err(EngineError::ActionFailed(msg));
        }
        thread::sleep(policy.poll_interval);
    }
}
