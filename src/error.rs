//! Error types shared by the merger, encoder and inspector.
//!
//! Only malformed input ends up here. Unmatched room names and records
//! holding the unknown-room sentinel are normal outcomes and are reported
//! through return values instead.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unable to write to console: {0}")]
    Console(#[source] io::Error),

    #[error("dungeon record has {found} fields, expected 4")]
    FieldCount { found: usize },

    #[error("room slot {slot} is not a room id: {text:?}")]
    RoomSlot { slot: usize, text: String },

    #[error("encoded layout too short: {len} characters (need {need})")]
    LayoutTooShort { len: usize, need: usize },

    #[error("encoded layout cell {cell} is not a room code: {text:?}")]
    LayoutCell { cell: usize, text: String },
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ToolError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ToolError::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = ToolError::io("data/rooms.json", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "unable to access data/rooms.json: gone");

        let err = ToolError::RoomSlot { slot: 3, text: "x1".to_string() };
        assert_eq!(err.to_string(), "room slot 3 is not a room id: \"x1\"");

        let err = ToolError::FieldCount { found: 2 };
        assert_eq!(err.to_string(), "dungeon record has 2 fields, expected 4");
    }
}
