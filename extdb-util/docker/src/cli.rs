use std::{
    ffi::OsStr,
    process::{Command, Stdio},
};

use extdb_core::err::{bail, Context, Result};
use extdb_logging::debug;

/// Whether the docker CLI is installed and can reach a daemon
pub fn docker_available() -> bool {
    Command::new("docker")
        .arg("version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Runs a docker command, returning its trimmed stdout
pub(crate) fn docker<I, S>(args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new("docker");
    cmd.args(args);

    // only the subcommand is logged, arguments may contain credentials
    let subcommand = cmd
        .get_args()
        .next()
        .map(|a| a.to_string_lossy().to_string())
        .unwrap_or_default();
    debug!("Running docker {subcommand}");

    let output = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("Failed to spawn docker, please check it is installed")?;

    if !output.status.success() {
        bail!(
            "Running 'docker {subcommand}' failed with exit code {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
