//! provflow: pipeline idempotente de bootstrap de nodo.
//!
//! `provflow run --role {first-control|additional-control|worker}
//!     [--node-ip IP] [--control-endpoint HOST:PORT] [--hostname NAME]
//!     [--control-hosts A,B,C] [--join-token TOKEN] [--dry-run]`
//!
//! Exit codes: 0 = Ready, 1 = NotReady (fallo Fatal o interrupción),
//! 2 = NeedsAttention (sólo warnings Recoverable), 64 = error de uso.

mod config;

use std::path::Path;

use prov_core::{render_human, resolve_role, summarize, Engine, FileLogSink, Role, RunContext};
use prov_host::{FsBackupManager, LocalHost};
use prov_steps::default_registry;

use crate::config::Config;

const USAGE: &str = "Uso: provflow run --role {first-control|additional-control|worker} \
[--node-ip IP] [--control-endpoint HOST:PORT] [--hostname NAME] \
[--control-hosts A,B,C] [--join-token TOKEN] [--dry-run]";

fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}");
    eprintln!("{USAGE}");
    std::process::exit(64);
}

fn main() {
    let cfg = Config::from_env();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
                                                  .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
                             .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "run" {
        usage_error("se requiere el subcomando `run`");
    }

    let mut explicit_role: Option<Role> = None;
    let mut node_ip: Option<String> = None;
    let mut control_endpoint: Option<String> = None;
    let mut hostname: Option<String> = None;
    let mut control_hosts: Option<Vec<String>> = None;
    let mut join_token: Option<String> = None;
    let mut dry_run = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--role" => {
                i += 1;
                match args.get(i).map(|v| v.parse::<Role>()) {
                    Some(Ok(r)) => explicit_role = Some(r),
                    Some(Err(e)) => usage_error(&e),
                    None => usage_error("--role requiere un valor"),
                }
            }
            "--node-ip" => {
                i += 1;
                node_ip = args.get(i).cloned();
            }
            "--control-endpoint" => {
                i += 1;
                control_endpoint = args.get(i).cloned();
            }
            "--hostname" => {
                i += 1;
                hostname = args.get(i).cloned();
            }
            "--control-hosts" => {
                i += 1;
                control_hosts = args.get(i).map(|v| {
                                                v.split(',')
                                                 .map(|s| s.trim().to_string())
                                                 .filter(|s| !s.is_empty())
                                                 .collect()
                                            });
            }
            "--join-token" => {
                i += 1;
                join_token = args.get(i).cloned();
            }
            "--dry-run" => dry_run = true,
            other => usage_error(&format!("argumento desconocido: {other}")),
        }
        i += 1;
    }

    // el hostname del sistema sirve de fallback para la inferencia
    let hostname = hostname.or_else(|| std::env::var("HOSTNAME").ok());
    let control_hosts = control_hosts.unwrap_or_else(|| cfg.control_hosts.clone());

    // AmbiguousRole es abort de pre-vuelo: antes de ejecutar step alguno
    let role = match resolve_role(explicit_role, cfg.role, hostname.as_deref(), &control_hosts) {
        Ok(role) => role,
        Err(e) => {
            eprintln!("provflow: {e}");
            std::process::exit(1);
        }
    };
    log::info!("resolved role: {role}");

    let mut ctx = RunContext::new(role);
    ctx.node_ip = node_ip;
    ctx.control_endpoint = control_endpoint;
    ctx.join_token = join_token;

    // la señal deja terminar la iteración en curso; el Run cierra con
    // outcome Interrupted en lugar de estado parcial sin documentar
    let interrupt = ctx.interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::warn!("termination signal received; finishing current step");
        interrupt.set();
    }) {
        log::warn!("could not install signal handler: {e}");
    }

    let sink = match FileLogSink::open(Path::new(&cfg.log_file)) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("provflow: cannot open log file {}: {e}", cfg.log_file);
            std::process::exit(1);
        }
    };

    let registry = default_registry(cfg.api_wait);
    let mut engine = Engine::new(sink, FsBackupManager::new()).dry_run(dry_run);
    let mut host = LocalHost::new();

    let run = engine.run(&registry, &mut host, &ctx);
    let summary = summarize(&run, cfg.verdict_policy);

    // el reporte se emite siempre, incluso en un Run detenido
    print!("{}", render_human(&run, &summary));

    if let Some(path) = &cfg.summary_file {
        let artifact = serde_json::json!({ "run": run, "summary": summary });
        match serde_json::to_string_pretty(&artifact) {
            Ok(text) => {
                if let Err(e) = std::fs::write(path, text) {
                    log::warn!("could not write summary artifact {path}: {e}");
                }
            }
            Err(e) => log::warn!("could not serialize summary artifact: {e}"),
        }
    }

    std::process::exit(summary.verdict.exit_code());
}
