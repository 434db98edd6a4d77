//! Test doubles for the agent: an in-memory [`MockHost`] for driving the task
//! logic directly, and a [`MockTestRunner`] that runs the task against a real
//! [`PipelineHost`] and reads the outcome back from its logging commands.

use crate::command::LoggingCommand;
use crate::host::{input_variable, PipelineHost, TaskHost, TaskResult};
use crate::task::{self, TaskState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory host that records every reported result
#[derive(Default)]
pub struct MockHost {
    inputs: HashMap<String, String>,
    input_error: Option<String>,
    result_error: Option<String>,
    results: Mutex<Vec<(TaskResult, String)>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.to_string(), value.to_string());
        self
    }

    /// Make every input lookup fail with `message`
    pub fn failing_inputs(mut self, message: &str) -> Self {
        self.input_error = Some(message.to_string());
        self
    }

    /// Make every result report fail with `message`
    pub fn failing_results(mut self, message: &str) -> Self {
        self.result_error = Some(message.to_string());
        self
    }

    pub fn results(&self) -> Vec<(TaskResult, String)> {
        self.results.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TaskHost for MockHost {
    async fn get_input(&self, name: &str, required: bool) -> anyhow::Result<String> {
        if let Some(msg) = &self.input_error {
            anyhow::bail!("{}", msg);
        }
        let value = self.inputs.get(name).cloned().unwrap_or_default();
        if required && value.trim().is_empty() {
            anyhow::bail!("Input required: {}", name);
        }
        Ok(value)
    }

    async fn set_result(&self, result: TaskResult, message: &str) -> anyhow::Result<()> {
        if let Some(msg) = &self.result_error {
            anyhow::bail!("{}", msg);
        }
        self.results
            .lock()
            .map_err(|_| anyhow::anyhow!("results lock poisoned"))?
            .push((result, message.to_string()));
        Ok(())
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "buffer lock poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// What a run looked like from the agent's side
#[derive(Debug, Clone)]
pub struct TaskRunReport {
    pub state: TaskState,
    pub succeeded: bool,
    pub result: Option<TaskResult>,
    pub warning_issues: Vec<String>,
    pub error_issues: Vec<String>,
    pub stdout: String,
}

impl TaskRunReport {
    /// Interpret captured stdout the way the agent does; lines that fail to parse are skipped
    pub fn from_stdout(state: TaskState, stdout: String) -> anyhow::Result<Self> {
        let mut result = None;
        let mut warning_issues = Vec::new();
        let mut error_issues = Vec::new();

        for line in stdout.lines() {
            let cmd = match LoggingCommand::parse(line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(e) => {
                    debug!("skipping stdout line: {:#}", e);
                    continue;
                }
            };
            match cmd.name.as_str() {
                "task.issue" => {
                    let kind = cmd.property("type").map(str::to_string);
                    match kind.as_deref() {
                        Some("error") => error_issues.push(cmd.message),
                        Some("warning") => warning_issues.push(cmd.message),
                        _ => {}
                    }
                }
                "task.complete" => {
                    match cmd.property("result").map(str::parse::<TaskResult>) {
                        Some(Ok(r)) => result = Some(r),
                        Some(Err(e)) => debug!("skipping task.complete: {:#}", e),
                        None => {}
                    }
                }
                _ => {}
            }
        }

        let succeeded = match result {
            Some(r) => matches!(r, TaskResult::Succeeded | TaskResult::SucceededWithIssues),
            None => true,
        };

        Ok(Self {
            state,
            succeeded,
            result,
            warning_issues,
            error_issues,
            stdout,
        })
    }
}

/// Runs the task entry point with inputs set up like the agent would set them
#[derive(Default)]
pub struct MockTestRunner {
    env: HashMap<String, String>,
}

impl MockTestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, name: &str, value: &str) -> &mut Self {
        self.env.insert(input_variable(name), value.to_string());
        self
    }

    pub async fn run(&self) -> anyhow::Result<TaskRunReport> {
        let buffer = SharedBuffer::default();
        let host = PipelineHost::new(self.env.clone(), buffer.clone());
        let mut out = buffer.clone();
        let state = task::run(&host, &mut out).await;
        TaskRunReport::from_stdout(state, buffer.contents())
    }
}
