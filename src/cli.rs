use std::env;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: sampletask [run | validate <task.json>]";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run,
    Validate(PathBuf),
}

pub fn get_command() -> anyhow::Result<Command> {
    parse_args(env::args().skip(1))
}

/// The agent starts the task with no arguments, so that means `run`
pub fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Command> {
    let args: Vec<String> = args.into_iter().collect();
    match args.first().map(String::as_str) {
        None | Some("run") => Ok(Command::Run),
        Some("validate") => match args.get(1) {
            Some(path) => Ok(Command::Validate(PathBuf::from(path))),
            None => anyhow::bail!("{}", USAGE),
        },
        Some(other) => anyhow::bail!("unknown subcommand: {} ({})", other, USAGE),
    }
}
