//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cancel;
pub mod config;
pub mod dirs;
pub mod error;
pub mod filter;
pub mod quadlet;
pub mod report;
pub mod source;
pub mod unit;

pub use cancel::CancelToken;
pub use config::QuadletConfig;
pub use dirs::{DirEnv, DirProbe, PrivilegeMode, UnitDirLayout};
pub use error::QuadletError;
pub use filter::ListFilters;
pub use quadlet::QuadletDescriptor;
pub use report::{InstallReport, ItemOutcome, JobResult, ListEntry, RemoveReport, UnitStatus};
pub use source::SourceRef;
