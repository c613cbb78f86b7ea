//! Application service: configuration use-cases.

use crate::application::ports::ConfigStore;
use crate::domain::config::QuadletConfig;
use crate::domain::dirs::{DirEnv, PrivilegeMode, UnitDirLayout};
use anyhow::Result;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<QuadletConfig> {
    store.load()
}

/// Compute the search layout, letting configured `unit_dirs` stand in when
/// the environment did not already supply an override.
#[must_use]
pub fn effective_layout(
    config: &QuadletConfig,
    mode: PrivilegeMode,
    mut env: DirEnv,
) -> UnitDirLayout {
    if env.override_dirs.is_none() {
        env.override_dirs.clone_from(&config.unit_dirs);
    }
    UnitDirLayout::compute(mode, &env)
}
