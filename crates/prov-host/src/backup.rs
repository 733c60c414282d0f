//! Backup manager sobre el filesystem real.
//!
//! Antes de que una acción mute un archivo rastreado, el original se copia
//! byte a byte a un sibling con sufijo de timestamp más un contador
//! monótono por Run. El contador garantiza unicidad aunque dos respaldos
//! del mismo original caigan en el mismo segundo; un respaldo previo nunca
//! se sobreescribe.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use prov_core::{BackupManager, BackupOutcome, BackupRecord, HostError};

#[derive(Debug, Default)]
pub struct FsBackupManager {
    counter: u32,
}

impl FsBackupManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn candidate(&self, path: &Path, stamp: &str, n: u32) -> PathBuf {
        PathBuf::from(format!("{}.bak.{stamp}.{n}", path.display()))
    }
}

impl BackupManager for FsBackupManager {
    fn backup(&mut self, path: &Path) -> Result<BackupOutcome, HostError> {
        if !path.exists() {
            // nada que preservar
            return Ok(BackupOutcome::AbsentNoOp);
        }

        let ts = Utc::now();
        let stamp = ts.format("%Y%m%d%H%M%S").to_string();
        // el contador avanza hasta encontrar un sibling libre, por si quedó
        // un respaldo de un Run anterior con el mismo timestamp
        let mut backup_path = self.candidate(path, &stamp, self.counter);
        while backup_path.exists() {
            self.counter += 1;
            backup_path = self.candidate(path, &stamp, self.counter);
        }
        self.counter += 1;

        // fs::copy preserva los bits de permisos del original
        fs::copy(path, &backup_path).map_err(|source| HostError::Io { path: path.to_path_buf(), source })?;

        Ok(BackupOutcome::Created(BackupRecord { original_path: path.to_path_buf(),
                                                 backup_path,
                                                 ts }))
    }
}
