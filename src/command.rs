use anyhow::Context;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const PREFIX: &str = "##vso[";

static COMMAND_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// A single agent logging command, e.g. `##vso[task.complete result=Failed;]reason`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingCommand {
    pub name: String,
    pub properties: Vec<(String, String)>,
    pub message: String,
}

impl LoggingCommand {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Parse one stdout line. Only lines starting with `##vso[` are commands;
    /// anything else yields `Ok(None)`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let body = line.trim_end_matches(['\r', '\n']);
        if !body.starts_with(PREFIX) {
            return Ok(None);
        }

        let re = COMMAND_RE
            .get_or_init(|| Regex::new(r"^##vso\[([^\s\]]+)(?:\s+([^\]]*))?\](.*)$"))
            .as_ref()
            .map_err(|e| anyhow::anyhow!("logging command pattern: {}", e))?;
        let caps = re
            .captures(body)
            .with_context(|| format!("malformed logging command: {}", body))?;

        let name = caps[1].to_string();
        let mut properties = Vec::new();
        if let Some(props) = caps.get(2) {
            for pair in props.as_str().split(';') {
                let pair = pair.trim();
                if pair.is_empty() {
                    continue;
                }
                let (k, v) = pair
                    .split_once('=')
                    .with_context(|| format!("invalid property '{}' in command '{}'", pair, name))?;
                properties.push((k.trim().to_string(), unescape(v)));
            }
        }

        Ok(Some(Self {
            name,
            properties,
            message: unescape(&caps[3]),
        }))
    }
}

impl fmt::Display for LoggingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.name)?;
        if !self.properties.is_empty() {
            write!(f, " ")?;
            for (k, v) in &self.properties {
                write!(f, "{}={};", k, escape_property(v))?;
            }
        }
        write!(f, "]{}", escape_message(&self.message))
    }
}

fn escape_message(s: &str) -> String {
    s.replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_message(s).replace(']', "%5D").replace(';', "%3B")
}

fn unescape(s: &str) -> String {
    s.replace("%0D", "\r")
        .replace("%0A", "\n")
        .replace("%5D", "]")
        .replace("%3B", ";")
        .replace("%AZP25", "%")
}
