//! Room catalog records and JSON file helpers.
//!
//! Catalogs are flat JSON arrays. Only the keys the transforms read are
//! modelled; everything else in an entry is ignored on load.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ToolError};

/// Numeric room identifier as it appears in the catalogs and dungeon records.
pub type RoomId = i64;

/// Entry of the primary room catalog (the merger's left-hand side).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SourceRoom {
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(rename = "roomID")]
    pub room_id: RoomId,
    pub shape: String,
    /// Door layout, copied through untouched. `Some(Value::Null)` when the
    /// key is present with a null value.
    #[serde(default, deserialize_with = "present")]
    pub doors: Option<Value>,
}

/// Entry of the secondary catalog that carries the alternate id list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AliasRoom {
    pub name: String,
    pub id: Vec<RoomId>,
}

/// Entry of the catalog the dungeon encoder looks room ids up in.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "roomID")]
    pub room_id: RoomId,
    /// Missing or null means the room has no fixed category.
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Read and parse a JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let value = serde_json::from_str(&contents).map_err(|e| ToolError::json(path, e))?;
    debug!("loaded {}", path.display());
    Ok(value)
}

/// Pretty formatter with 4-space indentation that writes every non-ASCII
/// character as a `\uXXXX` escape (UTF-16 units, surrogate pairs above the
/// BMP), so exported catalogs stay plain ASCII.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        Self { inner: PrettyFormatter::with_indent(b"    ") }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut rest = fragment;
        while let Some(pos) = rest.find(|c: char| !c.is_ascii()) {
            writer.write_all(rest[..pos].as_bytes())?;
            let mut chars = rest[pos..].chars();
            if let Some(c) = chars.next() {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            rest = chars.as_str();
        }
        writer.write_all(rest.as_bytes())
    }
}

/// Serialize a value as ASCII-only pretty JSON into `writer`.
pub fn write_pretty_json<T: Serialize, W: Write>(value: &T, writer: W) -> serde_json::Result<()> {
    let mut ser = serde_json::Serializer::with_formatter(writer, AsciiPrettyFormatter::new());
    value.serialize(&mut ser)
}

/// Write a value as pretty JSON, replacing any existing file.
pub fn write_json_pretty<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ToolError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_pretty_json(value, &mut writer).map_err(ToolError::Serialize)?;
    writer.flush().map_err(|e| ToolError::io(path, e))?;
    debug!("wrote {}", path.display());
    Ok(())
}
