//! High-level process runner with event handling.

use std::process::ExitStatus;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::info;

use crate::command::CommandSpec;

/// Events emitted during process execution.
#[derive(Debug, PartialEq)]
pub enum RunEvent {
    /// Process creation failed with error message.
    ProcessCreationFailed(String),
    /// Process was successfully created.
    ProcessCreated,
    /// New output line from the process (stdout and stderr merged).
    ProcessNewOutputLine(String),
    /// Output draining or process wait failed after the process started.
    ProcessIoFailed(String),
    /// Process ended (true = zero exit status, false otherwise).
    ProcessEnd(bool),
}

/// Event-driven runner for a single [`CommandSpec`].
pub struct Runner {
    spec: CommandSpec,
}

impl Runner {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    fn launch_stream_reader<R>(tx: Sender<RunEvent>, stream: R) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stream).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let _ = tx.send(RunEvent::ProcessNewOutputLine(line)).await;
                    }
                    Ok(None) => break,
                    Err(err) => {
                        let _ = tx.send(RunEvent::ProcessIoFailed(err.to_string())).await;
                        break;
                    }
                }
            }
        })
    }

    /// Run the process to completion, sending events via the provided channel.
    ///
    /// Blocks (asynchronously) until the process has terminated and both
    /// output streams have been drained to end-of-file. Returns the exit
    /// status when one could be collected.
    ///
    /// The command text and working directory are logged before execution.
    pub async fn run(&self, tx: Sender<RunEvent>) -> Option<ExitStatus> {
        info!("Running `{}`", self.spec);
        info!("in location {:?}", self.spec.cwd);

        let mut process = match self.spec.spawn() {
            Ok(process) => process,
            Err(err) => {
                let _ = tx
                    .send(RunEvent::ProcessCreationFailed(err.to_string()))
                    .await;
                return None;
            }
        };

        let _ = tx.send(RunEvent::ProcessCreated).await;

        // Take stdout and stderr and launch a stream reader for each
        let stdout_task = process
            .stdout
            .take()
            .map(|stream| Runner::launch_stream_reader(tx.clone(), stream));
        let stderr_task = process
            .stderr
            .take()
            .map(|stream| Runner::launch_stream_reader(tx.clone(), stream));

        let exit_status = match process.wait().await {
            Ok(status) => Some(status),
            Err(err) => {
                let _ = tx
                    .send(RunEvent::ProcessIoFailed(format!(
                        "failed to wait for process: {err}"
                    )))
                    .await;
                None
            }
        };

        // Join the readers so every line is delivered before ProcessEnd
        if let Some(task) = stdout_task {
            let _ = task.await;
        }
        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        let success = exit_status.map(|status| status.success()).unwrap_or(false);
        let _ = tx.send(RunEvent::ProcessEnd(success)).await;
        exit_status
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::sync::mpsc::{Receiver, channel};

    async fn drain(mut rx: Receiver<RunEvent>) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    async fn run_collecting(spec: CommandSpec) -> (Option<ExitStatus>, Vec<RunEvent>) {
        let (tx, rx) = channel(64);
        let runner = Runner::new(spec);
        tokio::join!(runner.run(tx), drain(rx))
    }

    #[tokio::test]
    async fn captures_output_lines() {
        let spec = CommandSpec::new("echo", ".").arg("hello world");
        let (status, events) = run_collecting(spec).await;

        assert!(status.expect("exit status").success());
        assert!(events.contains(&RunEvent::ProcessCreated));
        assert!(events.contains(&RunEvent::ProcessNewOutputLine("hello world".into())));
        assert_eq!(events.last(), Some(&RunEvent::ProcessEnd(true)));
    }

    #[tokio::test]
    async fn missing_program_reports_creation_failure() {
        let spec = CommandSpec::new("definitely-not-a-real-program", ".");
        let (status, events) = run_collecting(spec).await;

        assert!(status.is_none());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RunEvent::ProcessCreationFailed(_)))
        );
        assert!(!events.contains(&RunEvent::ProcessCreated));
    }

    #[tokio::test]
    async fn missing_cwd_reports_creation_failure() {
        let spec = CommandSpec::new("echo", "/definitely/not/a/real/directory");
        let (status, events) = run_collecting(spec).await;

        assert!(status.is_none());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RunEvent::ProcessCreationFailed(_)))
        );
    }

    #[tokio::test]
    async fn nonzero_exit_is_still_a_completed_run() {
        let spec = CommandSpec::new("sh", ".").args(["-c", "exit 3"]);
        let (status, events) = run_collecting(spec).await;

        let status = status.expect("exit status");
        assert!(!status.success());
        assert_eq!(events.last(), Some(&RunEvent::ProcessEnd(false)));
    }

    #[tokio::test]
    async fn env_overrides_reach_the_child() {
        let spec = CommandSpec::new("sh", ".")
            .args(["-c", "echo $RT_COMPILER"])
            .env("RT_COMPILER", "gnu");
        let (_, events) = run_collecting(spec).await;

        assert!(events.contains(&RunEvent::ProcessNewOutputLine("gnu".into())));
    }

    #[tokio::test]
    async fn stderr_is_merged_into_the_stream() {
        let spec = CommandSpec::new("sh", ".").args(["-c", "echo oops 1>&2"]);
        let (_, events) = run_collecting(spec).await;

        assert!(events.contains(&RunEvent::ProcessNewOutputLine("oops".into())));
    }
}
