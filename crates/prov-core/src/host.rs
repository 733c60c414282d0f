//! Seams hacia el sistema: comandos externos y respaldos de archivos.
//!
//! El core no lanza procesos ni toca el filesystem; sólo define los traits
//! que `prov-host` implementa contra el sistema real y que los tests
//! implementan en memoria. Los CLIs colaboradores (`kubeadm`, `kubectl`,
//! gestores de paquetes) son comandos opacos: el core sólo consume su exit
//! code y el texto capturado de stdout/stderr.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Salida capturada de un comando externo.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code si el proceso terminó normalmente.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Fallos de la capa host. `Launch` (binario ausente) se distingue de un
/// exit code distinto de cero porque las probes los tratan distinto:
/// binario ausente suele significar `ProbeState::Unknown`.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to launch `{cmd}`: {source}")]
    Launch {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Acceso al sistema que necesitan las probes y acciones de los steps.
pub trait Host {
    /// Ejecuta un comando y captura exit code, stdout y stderr. Un exit
    /// code distinto de cero NO es `Err`; `Err` es no poder lanzarlo.
    fn run(&mut self, program: &str, args: &[&str]) -> Result<CommandOutput, HostError>;

    fn read_to_string(&self, path: &Path) -> Result<String, HostError>;

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<(), HostError>;

    fn exists(&self, path: &Path) -> bool;
}

/// Registro de un respaldo realizado antes de una mutación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
    pub ts: DateTime<Utc>,
}

/// Resultado de pedir un respaldo.
#[derive(Debug, Clone)]
pub enum BackupOutcome {
    Created(BackupRecord),
    /// El original no existe: no hay nada que preservar. Informativo, no error.
    AbsentNoOp,
}

/// Preserva el estado pre-mutación de los archivos que un step va a tocar.
pub trait BackupManager {
    /// Copia `path` a un sibling con sufijo de timestamp + contador. Falla
    /// ruidosamente si la copia no puede completarse; el que llama decide
    /// la criticidad.
    fn backup(&mut self, path: &Path) -> Result<BackupOutcome, HostError>;
}
