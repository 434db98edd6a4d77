pub mod cli;
pub mod command;
pub mod host;
pub mod manifest;
pub mod mock;
pub mod task;

pub use host::{PipelineHost, TaskHost, TaskResult};
pub use task::{run, TaskState};
