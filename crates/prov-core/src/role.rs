//! Resolución del rol del nodo dentro de la topología destino.
//!
//! El rol se resuelve exactamente una vez, antes de consultar el registro de
//! steps, y es inmutable durante todo el Run. La heurística difusa de los
//! scripts originales (contar IPs en archivos de configuración) se descartó
//! a propósito: aquí la entrada debe ser explícita o inferible sin
//! ambigüedad, y el desacuerdo entre fuentes es un error (`AmbiguousRole`),
//! nunca una adivinanza silenciosa.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Posición del nodo en la topología del clúster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    FirstControlNode,
    AdditionalControlNode,
    Worker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::FirstControlNode => "first-control",
            Role::AdditionalControlNode => "additional-control",
            Role::Worker => "worker",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-control" => Ok(Role::FirstControlNode),
            "additional-control" => Ok(Role::AdditionalControlNode),
            "worker" => Ok(Role::Worker),
            other => Err(format!("rol desconocido: {other}")),
        }
    }
}

/// Infiere el rol a partir del hostname y la lista ordenada de hosts de
/// control esperados: primer elemento -> `FirstControlNode`, cualquier otro
/// elemento -> `AdditionalControlNode`, sin coincidencia -> `Worker`.
fn infer_from_hostname(hostname: &str, control_hosts: &[String]) -> Role {
    match control_hosts.iter().position(|h| h == hostname) {
        Some(0) => Role::FirstControlNode,
        Some(_) => Role::AdditionalControlNode,
        None => Role::Worker,
    }
}

/// Resuelve el rol del nodo.
///
/// Precedencia:
/// 1. `explicit` (flag de línea de comandos) gana siempre, incluso sobre una
///    inferencia contradictoria.
/// 2. Si hay rol configurado (`configured`, p.ej. variable de entorno) y
///    además una inferencia por hostname, ambos deben coincidir; el
///    desacuerdo sin override explícito es `AmbiguousRole`.
/// 3. Una única fuente disponible (configurado o inferido) se usa tal cual.
/// 4. Sin ninguna fuente: `AmbiguousRole`.
pub fn resolve_role(explicit: Option<Role>,
                    configured: Option<Role>,
                    hostname: Option<&str>,
                    control_hosts: &[String])
                    -> Result<Role, EngineError> {
    if let Some(role) = explicit {
        return Ok(role);
    }

    let inferred = match hostname {
        Some(h) if !control_hosts.is_empty() => Some(infer_from_hostname(h, control_hosts)),
        _ => None,
    };

    match (configured, inferred) {
        (Some(c), Some(i)) if c == i => Ok(c),
        (Some(c), Some(i)) => {
            Err(EngineError::AmbiguousRole(format!("configured role `{c}` disagrees with inferred role `{i}`; pass --role to override")))
        }
        (Some(c), None) => Ok(c),
        (None, Some(i)) => Ok(i),
        (None, None) => {
            Err(EngineError::AmbiguousRole("no role input: pass --role, set PROVFLOW_ROLE or supply --hostname with --control-hosts".into()))
        }
    }
}
