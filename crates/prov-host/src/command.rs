//! Invocación de comandos externos.
//!
//! Los CLIs colaboradores (`kubeadm`, `kubectl`, gestores de paquetes) se
//! invocan como procesos opacos: sólo interesa el exit
//! code y el texto capturado. `FakeHost` permite testear el parsing de las
//! probes contra salida capturada sin tocar el sistema.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use prov_core::{CommandOutput, Host, HostError};

/// Host real: procesos y filesystem locales.
#[derive(Debug, Default)]
pub struct LocalHost;

impl LocalHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for LocalHost {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<CommandOutput, HostError> {
        let full_cmd = format!("{} {}", program, args.join(" "));
        log::debug!("running: {full_cmd}");
        let output = Command::new(program).args(args)
                                          .output()
                                          .map_err(|source| HostError::Launch { cmd: full_cmd, source })?;
        Ok(CommandOutput { code: output.status.code(),
                           stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                           stderr: String::from_utf8_lossy(&output.stderr).into_owned() })
    }

    fn read_to_string(&self, path: &Path) -> Result<String, HostError> {
        fs::read_to_string(path).map_err(|source| HostError::Io { path: path.to_path_buf(), source })
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<(), HostError> {
        fs::write(path, contents).map_err(|source| HostError::Io { path: path.to_path_buf(), source })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[derive(Debug, Clone)]
enum FakeResponse {
    Output(CommandOutput),
    /// Simula binario ausente (error de lanzamiento).
    Missing,
}

/// Host en memoria con respuestas guionadas por programa.
///
/// Las respuestas encoladas (`queue_*`) se consumen una vez, en orden; al
/// agotarse se usa la respuesta sticky (`on_*`) si existe. Un programa sin
/// guion responde como binario ausente, igual que un sistema pelado.
#[derive(Debug, Default)]
pub struct FakeHost {
    files: HashMap<PathBuf, String>,
    queued: HashMap<String, VecDeque<FakeResponse>>,
    sticky: HashMap<String, FakeResponse>,
    /// Línea completa de cada invocación, para asserts de tests.
    pub invocations: Vec<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Respuesta sticky: el programa siempre sale 0 con este stdout.
    pub fn on_success(mut self, program: &str, stdout: &str) -> Self {
        self.sticky.insert(program.to_string(), FakeResponse::Output(success(stdout)));
        self
    }

    /// Respuesta sticky: el programa siempre falla con este exit code.
    pub fn on_failure(mut self, program: &str, code: i32, stderr: &str) -> Self {
        self.sticky.insert(program.to_string(), FakeResponse::Output(failure(code, stderr)));
        self
    }

    /// Respuesta sticky: el binario no existe.
    pub fn on_missing(mut self, program: &str) -> Self {
        self.sticky.insert(program.to_string(), FakeResponse::Missing);
        self
    }

    /// Encola un éxito que se consume una sola vez.
    pub fn queue_success(&mut self, program: &str, stdout: &str) {
        self.queued.entry(program.to_string()).or_default().push_back(FakeResponse::Output(success(stdout)));
    }

    /// Encola un fallo que se consume una sola vez.
    pub fn queue_failure(&mut self, program: &str, code: i32, stderr: &str) {
        self.queued.entry(program.to_string()).or_default().push_back(FakeResponse::Output(failure(code, stderr)));
    }

    /// Contenido actual de un archivo (incluye escrituras de steps).
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(|s| s.as_str())
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    fn next_response(&mut self, program: &str) -> FakeResponse {
        if let Some(queue) = self.queued.get_mut(program) {
            if let Some(resp) = queue.pop_front() {
                return resp;
            }
        }
        self.sticky.get(program).cloned().unwrap_or(FakeResponse::Missing)
    }
}

fn success(stdout: &str) -> CommandOutput {
    CommandOutput { code: Some(0),
                    stdout: stdout.to_string(),
                    stderr: String::new() }
}

fn failure(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput { code: Some(code),
                    stdout: String::new(),
                    stderr: stderr.to_string() }
}

impl Host for FakeHost {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<CommandOutput, HostError> {
        self.invocations.push(format!("{} {}", program, args.join(" ")));
        match self.next_response(program) {
            FakeResponse::Output(out) => Ok(out),
            FakeResponse::Missing => {
                Err(HostError::Launch { cmd: program.to_string(),
                                        source: std::io::Error::new(std::io::ErrorKind::NotFound, "command not found") })
            }
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String, HostError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::Io { path: path.to_path_buf(),
                                           source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file") })
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<(), HostError> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}
