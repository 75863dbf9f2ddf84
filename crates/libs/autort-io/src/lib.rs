//! Process execution and I/O capture for the autort service.
//!
//! Commands are described as data ([`command::CommandSpec`]: program, argument
//! list, working directory, environment overrides) and executed by an
//! event-driven [`runner::Runner`] that streams output lines over a channel.
//!
//! The runner never interprets a command's exit code as job success or
//! failure. Whether a regression test passed is decided later, from the log
//! file the test driver writes, so a non-zero exit only shows up as a
//! `ProcessEnd(false)` event.
//!
//! # Usage
//!
//! ```no_run
//! use autort_io::command::CommandSpec;
//! use autort_io::runner::{RunEvent, Runner};
//!
//! # async fn demo() {
//! let spec = CommandSpec::new("echo", "/tmp").arg("hello");
//! let (tx, mut rx) = tokio::sync::mpsc::channel(16);
//!
//! let status = Runner::new(spec).run(tx).await;
//!
//! while let Ok(event) = rx.try_recv() {
//!     if let RunEvent::ProcessNewOutputLine(line) = event {
//!         println!("output: {line}");
//!     }
//! }
//! # let _ = status;
//! # }
//! ```

pub mod command;
pub mod runner;
