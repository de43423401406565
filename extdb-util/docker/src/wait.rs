use std::{
    io::{BufRead, BufReader},
    net::{IpAddr, SocketAddr, TcpStream},
    process::{Command, Stdio},
    sync::mpsc::channel,
    thread,
    time::{Duration, Instant},
};

use extdb_core::err::{bail, Context, Result};
use extdb_logging::{debug, info};

use crate::container::Container;

/// Waits until a TCP connection to the address succeeds
pub fn wait_for_port_open(ip_addr: IpAddr, port: u16, timeout: Duration) -> Result<()> {
    let addr = SocketAddr::from((ip_addr, port));

    poll_until(timeout, Duration::from_millis(500), || {
        debug!("Checking if {addr} is listening...");
        TcpStream::connect_timeout(&addr, Duration::from_secs(5))
            .with_context(|| format!("Port {addr} is not open"))?;
        Ok(())
    })?;

    info!("Port {addr} is open");
    Ok(())
}

/// Waits until the supplied string appears in the container's stdout
pub fn wait_for_log(container: &Container, log_str: &str, timeout: Duration) -> Result<()> {
    let mut child = Command::new("docker")
        .args(["logs", "--follow", container.id()])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to spawn docker logs")?;
    let stdout = child
        .stdout
        .take()
        .context("Failed to capture docker logs output")?;

    let (tx, rx) = channel();
    let needle = log_str.to_string();
    thread::spawn(move || {
        let found = BufReader::new(stdout)
            .lines()
            .map_while(|line| line.ok())
            .any(|line| line.contains(&needle));
        let _ = tx.send(found);
    });

    info!(
        "Waiting for '{log_str}' to appear in container {} output",
        container.id()
    );
    let res = rx.recv_timeout(timeout);

    let _ = child.kill();
    let _ = child.wait();

    match res {
        Ok(true) => {
            info!("Log string detected!");
            Ok(())
        }
        Ok(false) => bail!(
            "Container {} stopped logging before '{log_str}' appeared",
            container.id()
        ),
        Err(_) => bail!(
            "Timed out after {timeout:?} waiting for '{log_str}' in container {} output",
            container.id()
        ),
    }
}

/// Calls `check` every `interval` until it succeeds, ignoring errors
/// until `timeout` has elapsed. Fails with the last error.
pub fn poll_until<F>(timeout: Duration, interval: Duration, mut check: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match check() {
            Ok(()) => return Ok(()),
            Err(err) if Instant::now() >= deadline => {
                return Err(err.context(format!("Condition not met within {timeout:?}")))
            }
            Err(err) => {
                debug!("Condition not met yet: {err}");
                thread::sleep(interval);
            }
        }
    }
}
