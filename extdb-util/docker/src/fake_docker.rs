//! Replaces the `docker` CLI with a shell script for the duration of a test

use std::{
    env,
    ffi::OsString,
    fs,
    os::unix::fs::PermissionsExt,
};

use tempfile::TempDir;

/// Puts a `docker` script first on `PATH`, restoring `PATH` when dropped.
///
/// Tests using this must be `#[serial]` as the environment is process-wide.
pub(crate) struct FakeDocker {
    _dir: TempDir,
    old_path: Option<OsString>,
}

impl FakeDocker {
    pub(crate) fn new(script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("docker");
        fs::write(&bin, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        let old_path = env::var_os("PATH");
        env::set_var("PATH", format!("{}:/usr/bin:/bin", dir.path().display()));

        Self {
            _dir: dir,
            old_path,
        }
    }
}

impl Drop for FakeDocker {
    fn drop(&mut self) {
        match self.old_path.take() {
            Some(path) => env::set_var("PATH", path),
            None => env::remove_var("PATH"),
        }
    }
}
