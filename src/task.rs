use crate::host::{TaskHost, TaskResult};
use std::io::Write;
use tracing::{debug, error};

/// Name of the single input the task reads
pub const INPUT_NAME: &str = "samplestring";
/// Input value that is rejected
pub const SENTINEL: &str = "bad";
pub const BAD_INPUT_MESSAGE: &str = "Bad input was given";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Failed(String),
    Succeeded,
}

/// Task entry point: resolve `samplestring`, reject the sentinel, echo anything else to `out`.
///
/// Every error is turned into a `Failed` report carrying the error's message; nothing propagates.
/// Success is implicit: no result is reported on that path.
pub async fn run(host: &dyn TaskHost, out: &mut (dyn Write + Send)) -> TaskState {
    let state = TaskState::Running;
    debug!(?state, "task started");

    match execute(host, out).await {
        Ok(state) => state,
        Err(e) => {
            let reason = e.to_string();
            error!("task failed: {:#}", e);
            if let Err(report_err) = host.set_result(TaskResult::Failed, &reason).await {
                error!("could not report failure: {:#}", report_err);
            }
            TaskState::Failed(reason)
        }
    }
}

async fn execute(host: &dyn TaskHost, out: &mut (dyn Write + Send)) -> anyhow::Result<TaskState> {
    let input = host.get_input(INPUT_NAME, true).await?;

    if input == SENTINEL {
        host.set_result(TaskResult::Failed, BAD_INPUT_MESSAGE).await?;
        return Ok(TaskState::Failed(BAD_INPUT_MESSAGE.to_string()));
    }

    writeln!(out, "Input: {}", input)?;
    out.flush()?;
    Ok(TaskState::Succeeded)
}
