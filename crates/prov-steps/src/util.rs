//! Helpers compartidos por las probes y acciones de los steps.

use std::path::Path;

use prov_core::{CommandOutput, EngineError, Host, HostError};

/// Lee un archivo distinguiendo "no existe" (`Ok(None)`) de un error real
/// de lectura (`Err(detail)`), que las probes reportan como `Unknown`.
pub(crate) fn read_optional(host: &dyn Host, path: &Path) -> Result<Option<String>, String> {
    match host.read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(HostError::Io { ref source, .. }) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

/// Ejecuta un comando y exige exit code 0; cualquier otra cosa es
/// `ActionFailed` con el stderr capturado.
pub(crate) fn run_checked(host: &mut dyn Host, program: &str, args: &[&str]) -> Result<CommandOutput, EngineError> {
    match host.run(program, args) {
        Ok(out) if out.success() => Ok(out),
        Ok(out) => {
            Err(EngineError::ActionFailed(format!("`{program} {}` exited with {:?}: {}",
                                                  args.join(" "),
                                                  out.code,
                                                  out.stderr.trim())))
        }
        Err(e) => Err(EngineError::ActionFailed(format!("could not launch {program}: {e}"))),
    }
}
