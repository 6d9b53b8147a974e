//! Blocking-call bridge.
//!
//! Collaborators (pipeline, SERP search) are synchronous and may block for a
//! long time. [`BlockingBridge::run_blocking`] moves such a call off the async
//! executor and awaits its result, so `tools/list` and other tool calls keep
//! being served while it runs.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task;
use tracing::{debug, error, warn};

use super::error::ToolError;
use crate::domains::travel::CollaboratorError;

/// Where blocking work is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockingStrategy {
    /// Tokio's blocking thread pool.
    #[default]
    Pool,
    /// A dedicated OS thread per call.
    Thread,
}

impl BlockingStrategy {
    /// Parse a strategy name (`pool` or `thread`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pool" => Some(Self::Pool),
            "thread" => Some(Self::Thread),
            _ => None,
        }
    }
}

/// Runs blocking handlers on a separate execution context.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingBridge {
    strategy: BlockingStrategy,
    timeout: Option<Duration>,
}

impl BlockingBridge {
    pub fn new(strategy: BlockingStrategy, timeout: Option<Duration>) -> Self {
        Self { strategy, timeout }
    }

    pub fn strategy(&self) -> BlockingStrategy {
        self.strategy
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `handler(input)` off the async executor and await its result.
    ///
    /// Errors returned by the handler and panics inside it both surface as
    /// [`ToolError::CollaboratorFailure`]. When a timeout is configured and
    /// expires, the call fails with [`ToolError::Timeout`]; the worker cannot
    /// be interrupted and its eventual result is dropped.
    pub async fn run_blocking<F, I, O>(
        &self,
        collaborator: &'static str,
        handler: F,
        input: I,
    ) -> Result<O, ToolError>
    where
        F: FnOnce(I) -> Result<O, CollaboratorError> + Send + 'static,
        I: Send + 'static,
        O: Send + 'static,
    {
        debug!(collaborator, strategy = ?self.strategy, "Offloading blocking call");

        let work = execute(self.strategy, collaborator, handler, input);

        let joined = match self.timeout {
            Some(after) => match tokio::time::timeout(after, work).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(collaborator, ?after, "Blocking call timed out");
                    return Err(ToolError::Timeout {
                        collaborator,
                        after,
                    });
                }
            },
            None => work.await,
        };

        match joined {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => {
                error!(collaborator, error = %source, "Collaborator call failed");
                Err(ToolError::collaborator(collaborator, source))
            }
            Err(WorkerFailure::Panicked(message)) => {
                error!(collaborator, panic = %message, "Collaborator panicked");
                Err(ToolError::collaborator(
                    collaborator,
                    CollaboratorError::other(format!("worker panicked: {}", message)),
                ))
            }
            Err(WorkerFailure::Cancelled) => {
                error!(collaborator, "Blocking worker was cancelled");
                Err(ToolError::collaborator(
                    collaborator,
                    CollaboratorError::other("worker was cancelled before completing"),
                ))
            }
            Err(WorkerFailure::Spawn(message)) => {
                error!(collaborator, "Failed to spawn blocking worker");
                let reason = format!("failed to spawn worker thread: {}", message);
                Err(ToolError::internal(reason))
            }
        }
    }
}

enum WorkerFailure {
    Panicked(String),
    Cancelled,
    Spawn(String),
}

async fn execute<F, I, O>(
    strategy: BlockingStrategy,
    collaborator: &'static str,
    handler: F,
    input: I,
) -> Result<Result<O, CollaboratorError>, WorkerFailure>
where
    F: FnOnce(I) -> Result<O, CollaboratorError> + Send + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    match strategy {
        BlockingStrategy::Pool => match task::spawn_blocking(move || handler(input)).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_panic() => Err(WorkerFailure::Panicked(panic_message(e.into_panic()))),
            Err(_) => Err(WorkerFailure::Cancelled),
        },
        BlockingStrategy::Thread => {
            let (tx, rx) = oneshot::channel();
            let spawned = std::thread::Builder::new()
                .name(format!("blocking-{}", collaborator.replace(' ', "-")))
                .spawn(move || {
                    let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| handler(input)));
                    let _ = tx.send(outcome);
                });

            if let Err(e) = spawned {
                return Err(WorkerFailure::Spawn(e.to_string()));
            }

            match rx.await {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(payload)) => Err(WorkerFailure::Panicked(panic_message(payload))),
                Err(_) => Err(WorkerFailure::Cancelled),
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
