//! prov-host: implementaciones contra el sistema real de los seams que
//! define `prov-core` (comandos externos y respaldos), más un host fake en
//! memoria para testear probes contra salida capturada.

pub mod backup;
pub mod command;

pub use backup::FsBackupManager;
pub use command::{FakeHost, LocalHost};
