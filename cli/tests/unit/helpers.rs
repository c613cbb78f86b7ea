//! Shared fixtures: a temp directory tree laid out like a rootless host.

#![allow(clippy::expect_used, dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;

use quadlet_cli::application::ports::QuadletFs;
use quadlet_cli::application::services::QuadletContext;
use quadlet_cli::domain::{PrivilegeMode, UnitDirLayout};
use quadlet_cli::infra::fs::LocalFs;
use tempfile::TempDir;

use crate::mocks::{MockServiceManager, NoopReporter};

pub const WEB_CONTAINER: &str =
    "[Unit]\nDescription=web\n\n[Container]\nImage=quay.io/podman/hello\n";

/// Restricted layout: admin root `<tmp>/etc` (absent) and one user dir
/// `<tmp>/user` (created on first install). Sources live in `<tmp>/src`.
pub struct Fixture {
    pub tmp: TempDir,
    pub layout: UnitDirLayout,
    pub fs: LocalFs,
    pub reporter: NoopReporter,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let layout = UnitDirLayout::new(
            PrivilegeMode::Restricted,
            tmp.path().join("etc"),
            vec![tmp.path().join("user")],
        );
        std::fs::create_dir(tmp.path().join("src")).expect("src dir");
        Self {
            tmp,
            layout,
            fs: LocalFs,
            reporter: NoopReporter,
        }
    }

    /// Layout with several search directories, highest precedence first.
    pub fn with_dirs(names: &[&str]) -> Self {
        let mut fixture = Self::new();
        fixture.layout = UnitDirLayout::new(
            PrivilegeMode::Restricted,
            fixture.tmp.path().join("etc"),
            names.iter().map(|n| fixture.tmp.path().join(n)).collect(),
        );
        fixture
    }

    pub fn ctx<'a>(
        &'a self,
        manager: &'a MockServiceManager,
    ) -> QuadletContext<'a, LocalFs, MockServiceManager, NoopReporter> {
        QuadletContext {
            fs: &self.fs,
            manager,
            layout: &self.layout,
            reporter: &self.reporter,
        }
    }

    /// Like [`Fixture::ctx`] but over a caller-supplied filesystem.
    pub fn ctx_with<'a, F: QuadletFs>(
        &'a self,
        fs: &'a F,
        manager: &'a MockServiceManager,
    ) -> QuadletContext<'a, F, MockServiceManager, NoopReporter> {
        QuadletContext {
            fs,
            manager,
            layout: &self.layout,
            reporter: &self.reporter,
        }
    }

    pub fn user_dir(&self) -> PathBuf {
        self.tmp.path().join("user")
    }

    /// Write a source file to `<tmp>/src/<name>` and return its path as a string.
    pub fn source(&self, name: &str, contents: &str) -> String {
        let path = self.tmp.path().join("src").join(name);
        std::fs::write(&path, contents).expect("write source");
        path.to_string_lossy().into_owned()
    }

    /// Place an already-installed quadlet in `<tmp>/<dir>/<name>`.
    pub fn installed(&self, dir: &str, name: &str, contents: &str) -> PathBuf {
        let dir = self.tmp.path().join(dir);
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write quadlet");
        path
    }
}

/// Answer the next `requests` HTTP GETs with `200 OK` and `body`.
/// Returns the server's base URL.
pub fn serve(body: &'static str, requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    std::thread::spawn(move || {
        for _ in 0..requests {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write");
        }
    });
    format!("http://{addr}")
}
