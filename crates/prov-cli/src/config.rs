//! Carga de configuración desde variables de entorno.
//! Convención `PROVFLOW_*`; `.env` se carga una sola vez, perezosamente.

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use prov_core::{RetryPolicy, Role, VerdictPolicy};

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct Config {
    /// Rol configurado (no el override explícito de línea de comandos).
    pub role: Option<Role>,
    /// Lista ordenada de hostnames de control esperados.
    pub control_hosts: Vec<String>,
    pub log_file: String,
    pub summary_file: Option<String>,
    pub verdict_policy: VerdictPolicy,
    pub api_wait: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let role = env::var("PROVFLOW_ROLE").ok().and_then(|v| v.parse().ok());
        let control_hosts = env::var("PROVFLOW_CONTROL_HOSTS").ok()
                                                              .map(|v| {
                                                                  v.split(',')
                                                                   .map(|s| s.trim().to_string())
                                                                   .filter(|s| !s.is_empty())
                                                                   .collect()
                                                              })
                                                              .unwrap_or_default();
        let log_file = env::var("PROVFLOW_LOG_FILE").unwrap_or_else(|_| "provflow.log".to_string());
        let summary_file = env::var("PROVFLOW_SUMMARY_FILE").ok();
        let warn_threshold = env::var("PROVFLOW_WARN_THRESHOLD").ok().and_then(|v| v.parse().ok()).unwrap_or(0);
        let max_wait = env::var("PROVFLOW_API_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(300);
        let poll = env::var("PROVFLOW_POLL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(5);
        Self { role,
               control_hosts,
               log_file,
               summary_file,
               verdict_policy: VerdictPolicy { warn_threshold },
               api_wait: RetryPolicy::new(Duration::from_secs(max_wait), Duration::from_secs(poll)) }
    }
}
