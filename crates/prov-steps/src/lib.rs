//! prov-steps: steps concretos de bootstrap de nodo y el registro por
//! defecto. Cada probe aísla su parsing de salida de comandos/archivos para
//! ser testeable contra muestras capturadas, sin tocar el sistema.

mod api_ready;
mod container_runtime;
mod control_plane;
mod disable_swap;
mod kernel_modules;
mod sysctl;
mod util;
mod worker;

pub use api_ready::WaitApiReady;
pub use container_runtime::InstallRuntime;
pub use control_plane::{InitControlPlane, JoinControlPlane, ADMIN_CONF};
pub use disable_swap::DisableSwap;
pub use kernel_modules::LoadKernelModules;
pub use sysctl::ConfigureSysctl;
pub use worker::JoinWorker;

use prov_core::{RetryPolicy, StepRegistry};

/// Registro por defecto del bootstrap de nodo, en orden de declaración.
/// El filtrado por rol lo hace el registro; aquí sólo se declara.
pub fn default_registry(api_wait: RetryPolicy) -> StepRegistry {
    StepRegistry::builder().step(DisableSwap)
                           .step(LoadKernelModules)
                           .step(ConfigureSysctl)
                           .step(InstallRuntime)
                           .step(InitControlPlane)
                           .step(WaitApiReady::new(api_wait))
                           .step(JoinControlPlane)
                           .step(JoinWorker)
                           .build()
}
