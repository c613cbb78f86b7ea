//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, `systemctl`, the quadlet generator, downloads and artifact extraction.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod artifact;
pub mod command_runner;
pub mod config;
pub mod fetch;
pub mod fs;
pub mod generator;
pub mod host;
pub mod systemd;
