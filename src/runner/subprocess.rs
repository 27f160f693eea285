//! Shell subprocess runner.
//!
//! The command runs through the platform shell with the current
//! environment plus the injected capture variables. Stdout is pumped in
//! chunks through a bounded channel and handed to the caller as it
//! arrives; stderr is buffered whole so it can be shown on failure.
//! Both streams are fully drained before the exit status is examined, so
//! a background process still holding stdout keeps the run waiting.

use crate::utils::config::OUTPUT_CHANNEL_CAPACITY;
use crate::utils::error::SubprocessError;
use log::debug;
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};

/// Something able to run a shell command to completion
pub trait CommandRunner {
    /// Run `command` with `env` added to the inherited environment
    ///
    /// `on_output` receives stdout chunks in arrival order. Returns
    /// `SubprocessError::Failed` with the buffered stderr on a non-zero exit.
    fn run(
        &self,
        command: &str,
        env: &[(String, String)],
        on_output: &mut dyn FnMut(&[u8]),
    ) -> Result<(), SubprocessError>;
}

/// Runs commands through `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(
        &self,
        command: &str,
        env: &[(String, String)],
        on_output: &mut dyn FnMut(&[u8]),
    ) -> Result<(), SubprocessError> {
        let io_error = |source| SubprocessError::Io {
            command: command.to_string(),
            source,
        };

        debug!("Spawning: {}", command);
        for (key, value) in env {
            debug!("  {}={}", key, value);
        }

        let mut child = shell_command(command)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_error)?;

        let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(OUTPUT_CHANNEL_CAPACITY);

        // `tx` lives only inside the pump, so `rx` ends when stdout closes
        let stdout_pump = child.stdout.take().map(|stdout| spawn_chunk_pump(stdout, tx));
        let stderr_pump = child.stderr.take().map(spawn_buffer_pump);

        for chunk in rx {
            on_output(&chunk);
        }

        if let Some(pump) = stdout_pump {
            let _ = pump.join();
        }
        let stderr = stderr_pump
            .and_then(|pump| pump.join().ok())
            .unwrap_or_default();

        let status = child.wait().map_err(io_error)?;
        debug!("Command finished with {}", status);

        if status.success() {
            return Ok(());
        }

        Err(SubprocessError::Failed {
            command: command.to_string(),
            exit_code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Forward chunks from `reader` into `tx` until EOF or the receiver hangs up
fn spawn_chunk_pump<R>(mut reader: R, tx: SyncSender<Vec<u8>>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    })
}

/// Collect everything from `reader`
fn spawn_buffer_pump<R>(mut reader: R) -> JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}
