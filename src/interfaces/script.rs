use super::tools::ToolContext;
use crate::domain::game::{GroupId, UserId};
use crate::error::{GameError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read};

/// One tool invocation, as recorded in a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn context(&self) -> ToolContext {
        ToolContext {
            group_id: self.group_id,
            user_id: self.user_id,
            user_name: self.user_name.clone(),
        }
    }
}

/// Reads tool calls from a JSON-lines source.
///
/// Blank lines and lines starting with `#` are skipped.
pub struct ScriptReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> ScriptReader<R> {
    /// Creates a new `ScriptReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and deserializes tool calls.
    pub fn calls(self) -> impl Iterator<Item = Result<ToolCall>> {
        self.reader.lines().filter_map(|line| match line {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    None
                } else {
                    Some(serde_json::from_str::<ToolCall>(line).map_err(GameError::from))
                }
            }
            Err(e) => Some(Err(GameError::from(e))),
        })
    }
}
