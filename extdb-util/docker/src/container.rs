use std::{
    collections::HashMap,
    mem,
    net::{IpAddr, Ipv4Addr},
    process::{self, Command, Stdio},
    sync::mpsc::{channel, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use extdb_core::err::{anyhow, bail, Context, Result};
use extdb_logging::{debug, info, warn};
use itertools::Itertools;
use serde::Deserialize;

use crate::{cli::docker, wait::wait_for_log};

/// Describes the container to run
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSpec {
    pub image: String,
    /// Fixed container name, required for reuse
    pub name: Option<String>,
    /// Container ports published on random loopback ports
    pub ports: Vec<u16>,
    pub env: Vec<(String, String)>,
    /// Adopt a running container with the same name and leave it running
    pub reuse: bool,
    /// Line the container prints once it is ready for use
    pub ready_log: Option<String>,
    /// Bounds the whole startup, including waiting for `ready_log`
    pub startup_timeout: Duration,
}

impl ContainerSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: None,
            ports: vec![],
            env: vec![],
            reuse: false,
            ready_log: None,
            startup_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.env.push((key.into(), val.into()));
        self
    }

    pub fn with_reuse(mut self, reuse: bool) -> Self {
        self.reuse = reuse;
        self
    }

    pub fn with_ready_log(mut self, log: impl Into<String>) -> Self {
        self.ready_log = Some(log.into());
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Checks the spec can be started without leaking a container
    pub fn validate(&self) -> Result<()> {
        if self.reuse && self.name.is_none() {
            bail!(
                "Container from image {} is marked for reuse but has no name",
                self.image
            );
        }

        Ok(())
    }

    /// Arguments passed to `docker run`
    pub(crate) fn run_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "-d".to_string()];

        if !self.reuse {
            args.push("--rm".into());
        }

        if let Some(name) = self.name.as_ref() {
            args.extend(["--name".to_string(), name.clone()]);
        }

        for port in self.ports.iter() {
            args.extend(["-p".to_string(), format!("127.0.0.1::{port}")]);
        }

        for (key, val) in self.env.iter() {
            args.extend(["-e".to_string(), format!("{key}={val}")]);
        }

        args.push(self.image.clone());
        args
    }
}

/// A running container
#[derive(Debug, PartialEq)]
pub struct Container {
    id: String,
    host: IpAddr,
    /// Mapping of container ports to the published host ports
    ports: HashMap<u16, u16>,
    stop_on_drop: bool,
}

impl Container {
    pub(crate) fn new(id: String, ports: HashMap<u16, u16>, stop_on_drop: bool) -> Self {
        Self {
            id,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            ports,
            stop_on_drop,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Gets the host port which the container port is published on
    pub fn host_port(&self, container_port: u16) -> Result<u16> {
        self.ports.get(&container_port).copied().with_context(|| {
            format!(
                "Port {container_port} is not published by container {}",
                self.id
            )
        })
    }

    /// Leaves the container running after this handle is dropped
    pub fn detach(mut self) -> String {
        self.stop_on_drop = false;
        mem::take(&mut self.id)
    }

    /// Removes the container once the current process exits.
    ///
    /// Handles kept in statics are never dropped, so a watcher process
    /// waits for this process to go away and removes the container.
    pub fn remove_on_exit(&self) -> Result<()> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(reaper_script(process::id(), &self.id))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // keep the watcher alive when the test run is interrupted
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

        cmd.spawn()
            .with_context(|| format!("Failed to watch container {} for removal", self.id))?;
        debug!("Container {} will be removed on exit", self.id);

        Ok(())
    }
}

fn reaper_script(pid: u32, id: &str) -> String {
    format!(
        "while kill -0 {pid} 2>/dev/null; do sleep 1; done; docker rm -f {id} >/dev/null 2>&1"
    )
}

impl Drop for Container {
    fn drop(&mut self) {
        if self.stop_on_drop {
            info!("Removing container {}", self.id);
            if let Err(err) = docker(["rm", "-f", self.id.as_str()]) {
                warn!("Failed to remove container {}: {:?}", self.id, err);
            }
        }
    }
}

/// Starts the container described by `spec` and waits for its ready log,
/// giving up once `spec.startup_timeout` has elapsed
pub fn start_container(spec: ContainerSpec) -> Result<Container> {
    spec.validate()?;

    let timeout = spec.startup_timeout;
    let deadline = Instant::now() + timeout;
    let image = spec.image.clone();
    let (tx, rx) = channel();

    thread::spawn(move || {
        // a container arriving after the timeout is dropped here
        let _ = tx.send(start_container_docker(&spec, deadline));
    });

    recv_started(&rx, timeout, &image)
}

fn recv_started(
    rx: &Receiver<Result<Container>>,
    timeout: Duration,
    image: &str,
) -> Result<Container> {
    match rx.recv_timeout(timeout) {
        Ok(res) => res,
        Err(RecvTimeoutError::Timeout) => {
            Err(anyhow!("Timed out after {timeout:?} while starting container {image}"))
        }
        Err(RecvTimeoutError::Disconnected) => Err(anyhow!(
            "Starting container {image} failed unexpectedly, the startup thread exited"
        )),
    }
}

fn start_container_docker(spec: &ContainerSpec, deadline: Instant) -> Result<Container> {
    let container = match (spec.reuse, spec.name.as_ref()) {
        (true, Some(name)) => match find_running(name)? {
            Some(id) => {
                info!("Reusing running container {name} ({id})");
                inspect_container(&id, false)?
            }
            None => {
                // a stopped container would conflict with the name
                let _ = docker(["rm", "-f", name.as_str()]);
                run_container(spec)?
            }
        },
        _ => run_container(spec)?,
    };

    if let Some(log) = spec.ready_log.as_ref() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        wait_for_log(&container, log, remaining)?;
    }

    Ok(container)
}

fn run_container(spec: &ContainerSpec) -> Result<Container> {
    info!("Starting container from image {}", spec.image);
    let id = docker(spec.run_args()).context("Failed to start container")?;

    inspect_container(&id, !spec.reuse)
}

/// Finds the id of a running container with exactly the supplied name
fn find_running(name: &str) -> Result<Option<String>> {
    let out = docker([
        "ps".to_string(),
        "-q".to_string(),
        "--filter".to_string(),
        format!("name=^/?{name}$"),
        "--filter".to_string(),
        "status=running".to_string(),
    ])?;

    Ok(out.lines().next().map(|i| i.trim().to_string()))
}

fn inspect_container(id: &str, stop_on_drop: bool) -> Result<Container> {
    let out = docker(["inspect", "--type", "container", id])?;
    let inspected = parse_inspect(&out)?;

    info!(
        "Container {} running with ports [{}]",
        inspected.id,
        inspected
            .ports
            .iter()
            .map(|(c, h)| format!("{c}->{h}"))
            .join(", ")
    );

    Ok(Container::new(inspected.id, inspected.ports, stop_on_drop))
}

/// The subset of `docker inspect` output we care about
#[derive(Debug, Clone, PartialEq)]
pub struct InspectedContainer {
    pub id: String,
    pub running: bool,
    /// Mapping of container tcp ports to published host ports
    pub ports: HashMap<u16, u16>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectOutput {
    id: String,
    state: InspectState,
    network_settings: InspectNetworkSettings,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    running: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectNetworkSettings {
    #[serde(default)]
    ports: Option<HashMap<String, Option<Vec<InspectPortBinding>>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectPortBinding {
    host_port: String,
}

/// Parses the json output of `docker inspect`
pub fn parse_inspect(json: &str) -> Result<InspectedContainer> {
    let output = serde_json::from_str::<Vec<InspectOutput>>(json)
        .context("Failed to parse docker inspect output")?
        .into_iter()
        .next()
        .context("No container found in docker inspect output")?;

    let ports = output
        .network_settings
        .ports
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, bindings)| {
            let container_port = key.strip_suffix("/tcp")?.parse::<u16>().ok()?;
            let host_port = bindings?.first()?.host_port.parse::<u16>().ok()?;
            Some((container_port, host_port))
        })
        .collect();

    Ok(InspectedContainer {
        id: output.id,
        running: output.state.running,
        ports,
    })
}
