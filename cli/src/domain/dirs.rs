//! Quadlet search directories and install-target selection rules.
//!
//! Pure functions only: callers supply the environment and the probed state
//! of each candidate directory.

use std::path::{Path, PathBuf};

/// Admin-managed quadlet root.
pub const UNIT_DIR_ADMIN: &str = "/etc/containers/systemd";
/// Volatile system-wide quadlets.
pub const UNIT_DIR_TEMP: &str = "/run/containers/systemd";
/// Quadlets shipped by the distribution.
pub const UNIT_DIR_DISTRO: &str = "/usr/share/containers/systemd";

/// Whether the caller manages system units or only its own user units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeMode {
    /// Root: system-wide directories, `systemctl` without `--user`.
    Elevated,
    /// Unprivileged user: per-user directories, `systemctl --user`.
    Restricted,
}

impl PrivilegeMode {
    #[must_use]
    pub fn is_restricted(self) -> bool {
        self == Self::Restricted
    }
}

/// Inputs for computing the search directories.
#[derive(Debug, Clone, Default)]
pub struct DirEnv {
    pub uid: u32,
    /// `$XDG_CONFIG_HOME` (or `~/.config`).
    pub config_home: Option<PathBuf>,
    /// `$XDG_RUNTIME_DIR`.
    pub runtime_dir: Option<PathBuf>,
    /// Explicit directory list replacing the computed one.
    pub override_dirs: Option<Vec<PathBuf>>,
}

/// State of a candidate directory as seen on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirProbe {
    Missing,
    WritableDir,
    ReadOnlyDir,
    NotADirectory,
}

/// Ordered search directories plus the admin root used for install preference.
#[derive(Debug, Clone)]
pub struct UnitDirLayout {
    pub mode: PrivilegeMode,
    pub admin_root: PathBuf,
    /// Highest precedence first.
    pub search_dirs: Vec<PathBuf>,
}

impl UnitDirLayout {
    #[must_use]
    pub fn new(mode: PrivilegeMode, admin_root: PathBuf, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            mode,
            admin_root,
            search_dirs,
        }
    }

    /// Compute the default layout for `mode`.
    ///
    /// Elevated: admin root, then the volatile and distribution directories.
    /// Restricted: the per-uid and shared `users/` admin directories, then the
    /// user's config directory, then the volatile runtime directory.
    #[must_use]
    pub fn compute(mode: PrivilegeMode, env: &DirEnv) -> Self {
        let admin_root = PathBuf::from(UNIT_DIR_ADMIN);
        if let Some(dirs) = &env.override_dirs {
            return Self::new(mode, admin_root, dirs.clone());
        }

        let search_dirs = match mode {
            PrivilegeMode::Elevated => vec![
                admin_root.clone(),
                PathBuf::from(UNIT_DIR_TEMP),
                PathBuf::from(UNIT_DIR_DISTRO),
            ],
            PrivilegeMode::Restricted => {
                let users = admin_root.join("users");
                let mut dirs = vec![users.join(env.uid.to_string()), users];
                if let Some(config) = &env.config_home {
                    dirs.push(config.join("containers").join("systemd"));
                }
                if let Some(runtime) = &env.runtime_dir {
                    dirs.push(runtime.join("containers").join("systemd"));
                }
                dirs
            }
        };
        Self::new(mode, admin_root, search_dirs)
    }

    fn is_admin(&self, dir: &Path) -> bool {
        dir.starts_with(&self.admin_root)
    }

    /// Choose where new quadlets are written.
    ///
    /// Elevated mode always targets the first search directory. Restricted
    /// mode prefers the first admin-prefixed directory that is an existing,
    /// writable directory; failing that, the first non-admin directory that is
    /// writable or does not exist yet. `probe` is consulted in list order.
    #[must_use]
    pub fn select_install_target(&self, probe: impl Fn(&Path) -> DirProbe) -> Option<PathBuf> {
        if self.mode == PrivilegeMode::Elevated {
            return self.search_dirs.first().cloned();
        }

        let probed: Vec<(&PathBuf, DirProbe)> =
            self.search_dirs.iter().map(|d| (d, probe(d))).collect();

        probed
            .iter()
            .find(|(d, p)| self.is_admin(d) && *p == DirProbe::WritableDir)
            .or_else(|| {
                probed.iter().find(|(d, p)| {
                    !self.is_admin(d) && matches!(p, DirProbe::WritableDir | DirProbe::Missing)
                })
            })
            .map(|(d, _)| d.to_path_buf())
    }
}

/// Parse a colon-separated directory list (as in `QUADLET_UNIT_DIRS`).
#[must_use]
pub fn parse_dir_list(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Inverse of [`parse_dir_list`].
#[must_use]
pub fn format_dir_list(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.to_string_lossy())
        .collect::<Vec<_>>()
        .join(":")
}
