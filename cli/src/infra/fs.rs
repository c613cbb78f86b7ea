//! Filesystem infrastructure: implements `QuadletFs` on the local disk.

use std::fs::{DirBuilder, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::Path;

use nix::unistd::{AccessFlags, access};

use crate::application::ports::QuadletFs;
use crate::domain::dirs::DirProbe;

/// Mode for newly created quadlet directories.
const DIR_MODE: u32 = 0o755;
/// Mode for installed quadlet files.
const FILE_MODE: u32 = 0o644;

/// Production filesystem implementation of `QuadletFs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl QuadletFs for LocalFs {
    fn probe_dir(&self, dir: &Path) -> DirProbe {
        match std::fs::metadata(dir) {
            Err(_) => DirProbe::Missing,
            Ok(meta) if !meta.is_dir() => DirProbe::NotADirectory,
            // The effective uid is what matters for writing, not the mode bits.
            Ok(_) if access(dir, AccessFlags::W_OK).is_ok() => DirProbe::WritableDir,
            Ok(_) => DirProbe::ReadOnlyDir,
        }
    }

    fn create_dir_all(&self, dir: &Path) -> std::io::Result<()> {
        DirBuilder::new().recursive(true).mode(DIR_MODE).create(dir)
    }

    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            // file_type() does not follow symlinks; metadata() does.
            let is_dir = match entry.metadata() {
                Ok(meta) => meta.is_dir(),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            if is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> std::io::Result<bool> {
        match std::fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn is_file(&self, path: &Path) -> std::io::Result<bool> {
        std::fs::metadata(path).map(|m| m.is_file())
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_new(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(FILE_MODE)
            .open(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}
