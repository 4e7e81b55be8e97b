//! Text and JSON rendering for `pk2` subcommands.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// Renders each command's result as pretty JSON or as the text produced by
/// the command itself.
pub struct OutputWriter {
    format: Format,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        let format = if json { Format::Json } else { Format::Text };
        Self { format }
    }

    /// `render_text` only runs in text mode.
    pub fn write<T: Serialize>(
        &self,
        data: &T,
        render_text: impl FnOnce() -> String,
    ) -> Result<()> {
        let mut stdout = io::stdout().lock();
        match self.format {
            Format::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(data)?)?,
            Format::Text => stdout.write_all(render_text().as_bytes())?,
        }
        Ok(())
    }

    /// Report a failed command on stderr, keeping the error chain.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        let mut stderr = io::stderr().lock();
        let message = format!("{:#}", error);
        match self.format {
            Format::Json => {
                let failure = ErrorOutput {
                    success: false,
                    result_code,
                    error: message,
                };
                if let Ok(json) = serde_json::to_string_pretty(&failure) {
                    let _ = writeln!(stderr, "{}", json);
                }
            }
            Format::Text => {
                let _ = writeln!(stderr, "pk2: {}", message);
            }
        }
    }
}

/// Failure body for `--json` runs.
#[derive(Debug, Serialize)]
struct ErrorOutput {
    success: bool,
    result_code: u8,
    error: String,
}

/// One child entry for `ls`.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub name: String,
    pub entry_type: &'static str,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Output for `ls` command.
#[derive(Debug, Serialize)]
pub struct LsOutput {
    pub success: bool,
    pub result_code: u8,
    pub path: String,
    pub entries: Vec<EntryInfo>,
}

/// Data variants for `stat` command.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatData {
    Folder {
        name: String,
        path: String,
        offset: u64,
        depth: usize,
        files: usize,
        folders: usize,
    },
    File {
        name: String,
        offset: u64,
        size: u32,
    },
}

/// Output for `stat` command.
#[derive(Debug, Serialize)]
pub struct StatOutput {
    pub success: bool,
    pub result_code: u8,
    #[serde(flatten)]
    pub data: StatData,
}

/// Output for `paths` command.
#[derive(Debug, Serialize)]
pub struct PathsOutput {
    pub success: bool,
    pub result_code: u8,
    pub folders: usize,
    pub files: usize,
    pub paths: Vec<String>,
}
