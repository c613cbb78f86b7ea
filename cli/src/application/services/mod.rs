//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.
//!
//! No service caches anything between calls: every operation re-reads the
//! quadlet directories and re-queries the service manager.

pub mod config_service;
pub mod directories;
pub mod install;
pub mod list;
pub mod print;
pub mod remove;

use crate::domain::UnitDirLayout;

/// Ports shared by install, list and remove.
pub struct QuadletContext<'a, F, M, R> {
    /// Filesystem holding the quadlet directories.
    pub fs: &'a F,
    /// Service manager connection used for the whole request.
    pub manager: &'a M,
    /// Search directories and privilege mode.
    pub layout: &'a UnitDirLayout,
    /// Progress sink for user-facing steps.
    pub reporter: &'a R,
}
