use crate::command::LoggingCommand;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::debug;

/// Outcome a task reports back to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskResult {
    Succeeded,
    SucceededWithIssues,
    Failed,
    Cancelled,
    Skipped,
}

impl TaskResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskResult::Succeeded => "Succeeded",
            TaskResult::SucceededWithIssues => "SucceededWithIssues",
            TaskResult::Failed => "Failed",
            TaskResult::Cancelled => "Cancelled",
            TaskResult::Skipped => "Skipped",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TaskResult::Succeeded | TaskResult::SucceededWithIssues | TaskResult::Skipped
        )
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskResult {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Ok(match s {
            "Succeeded" => TaskResult::Succeeded,
            "SucceededWithIssues" => TaskResult::SucceededWithIssues,
            "Failed" => TaskResult::Failed,
            "Cancelled" => TaskResult::Cancelled,
            "Skipped" => TaskResult::Skipped,
            other => anyhow::bail!("unknown task result '{}'", other),
        })
    }
}

/// Capabilities the agent provides to a running task: input resolution and result reporting
#[async_trait]
pub trait TaskHost: Send + Sync {
    async fn get_input(&self, name: &str, required: bool) -> anyhow::Result<String>;
    async fn set_result(&self, result: TaskResult, message: &str) -> anyhow::Result<()>;
}

/// Environment variable the agent uses to pass input `name`
pub fn input_variable(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Production host: inputs come from `INPUT_*` variables, results are
/// written to `sink` as logging commands.
pub struct PipelineHost<W: Write + Send> {
    env: HashMap<String, String>,
    sink: Mutex<W>,
    last_result: Mutex<Option<TaskResult>>,
}

impl PipelineHost<std::io::Stdout> {
    pub fn from_env() -> Self {
        Self::new(std::env::vars().collect(), std::io::stdout())
    }
}

impl<W: Write + Send> PipelineHost<W> {
    pub fn new(env: HashMap<String, String>, sink: W) -> Self {
        Self {
            env,
            sink: Mutex::new(sink),
            last_result: Mutex::new(None),
        }
    }

    pub fn last_result(&self) -> Option<TaskResult> {
        self.last_result.lock().ok().and_then(|r| *r)
    }

    /// Exit code the process should end with; no report means success
    pub fn exit_code(&self) -> i32 {
        match self.last_result() {
            Some(r) if !r.is_success() => 1,
            _ => 0,
        }
    }

    fn emit(&self, cmd: &LoggingCommand) -> anyhow::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| anyhow::anyhow!("output sink lock poisoned"))?;
        writeln!(sink, "{}", cmd)?;
        sink.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> TaskHost for PipelineHost<W> {
    async fn get_input(&self, name: &str, required: bool) -> anyhow::Result<String> {
        let var = input_variable(name);
        let value = self
            .env
            .get(&var)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        if required && value.is_empty() {
            anyhow::bail!("Input required: {}", name);
        }
        debug!("{}={}", name, value);
        Ok(value)
    }

    async fn set_result(&self, result: TaskResult, message: &str) -> anyhow::Result<()> {
        match result {
            TaskResult::Failed => self.emit(
                &LoggingCommand::new("task.issue", message).with_property("type", "error"),
            )?,
            TaskResult::SucceededWithIssues => self.emit(
                &LoggingCommand::new("task.issue", message).with_property("type", "warning"),
            )?,
            _ => {}
        }
        self.emit(&LoggingCommand::new("task.complete", message).with_property("result", result.as_str()))?;
        if let Ok(mut last) = self.last_result.lock() {
            *last = Some(result);
        }
        Ok(())
    }
}
