//! Host facts that decide where quadlets live: effective uid and XDG paths.

use std::path::PathBuf;

use nix::unistd::geteuid;

use crate::domain::dirs::{DirEnv, PrivilegeMode, parse_dir_list};

/// Colon-separated directory list replacing the computed search path.
pub const UNIT_DIRS_ENV: &str = "QUADLET_UNIT_DIRS";

/// Elevated when running as root.
#[must_use]
pub fn privilege_mode() -> PrivilegeMode {
    if geteuid().is_root() {
        PrivilegeMode::Elevated
    } else {
        PrivilegeMode::Restricted
    }
}

/// Snapshot of the environment used to compute search directories.
#[must_use]
pub fn dir_env() -> DirEnv {
    let config_home = non_empty_var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir);
    DirEnv {
        uid: geteuid().as_raw(),
        config_home,
        runtime_dir: non_empty_var("XDG_RUNTIME_DIR").map(PathBuf::from),
        override_dirs: non_empty_var(UNIT_DIRS_ENV).map(|v| parse_dir_list(&v)),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
