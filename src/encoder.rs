//! Dungeon layout encoder.
//!
//! Turns a dungeon record (`a;b;<36 three-digit room ids>;<doors>`) into the
//! compact string the game server loads: 36 two-digit room codes followed by
//! the untouched door suffix.
//!
//! Room codes:
//! - `00` nothing (room id missing from the catalog)
//! - `01`-`06` fixed categories, see [`RoomCategory`]
//! - `07` and up: rooms without a fixed category, numbered per record in
//!   first-seen order so repeated ids share a code

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::catalog::{self, CatalogEntry, RoomId};
use crate::error::{Result, ToolError};

/// Number of room slots in a dungeon record (6x6 grid).
pub const ROOM_SLOTS: usize = 36;
/// Characters per room slot in a dungeon record.
pub const SLOT_WIDTH: usize = 3;
/// Room id recorded for rooms that were never identified.
pub const UNKNOWN_ROOM: RoomId = 998;
/// Code given to the first uncategorised room of a record.
pub const FIRST_UNIQUE_CODE: u32 = 7;
/// Code for a slot whose room id is not in the catalog.
pub const EMPTY_CODE: u32 = 0;

const RECORD_FIELDS: usize = 4;

/// Room categories with a reserved code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomCategory {
    Entrance,
    Fairy,
    Blood,
    Puzzle,
    Trap,
    Yellow,
}

impl RoomCategory {
    pub fn all() -> &'static [RoomCategory] {
        &[
            RoomCategory::Entrance,
            RoomCategory::Fairy,
            RoomCategory::Blood,
            RoomCategory::Puzzle,
            RoomCategory::Trap,
            RoomCategory::Yellow,
        ]
    }

    /// Category for a catalog `type` string. Anything else is uncategorised.
    pub fn from_type(room_type: &str) -> Option<Self> {
        match room_type {
            "entrance" => Some(RoomCategory::Entrance),
            "fairy" => Some(RoomCategory::Fairy),
            "blood" => Some(RoomCategory::Blood),
            "puzzle" => Some(RoomCategory::Puzzle),
            "trap" => Some(RoomCategory::Trap),
            "yellow" => Some(RoomCategory::Yellow),
            _ => None,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::all().iter().copied().find(|category| category.code() == code)
    }

    pub fn code(self) -> u32 {
        match self {
            RoomCategory::Entrance => 1,
            RoomCategory::Fairy => 2,
            RoomCategory::Blood => 3,
            RoomCategory::Puzzle => 4,
            RoomCategory::Trap => 5,
            RoomCategory::Yellow => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RoomCategory::Entrance => "entrance",
            RoomCategory::Fairy => "fairy",
            RoomCategory::Blood => "blood",
            RoomCategory::Puzzle => "puzzle",
            RoomCategory::Trap => "trap",
            RoomCategory::Yellow => "yellow",
        }
    }
}

/// Room catalog indexed by room id. When several entries share an id the
/// first one in file order is the one used.
#[derive(Clone, Debug, Default)]
pub struct RoomCatalog {
    entries: Vec<CatalogEntry>,
    first_by_id: HashMap<RoomId, usize>,
}

impl RoomCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut first_by_id = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            first_by_id.entry(entry.room_id).or_insert(index);
        }
        Self { entries, first_by_id }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let entries: Vec<CatalogEntry> = catalog::load_json(path)?;
        Ok(Self::new(entries))
    }

    pub fn lookup(&self, room_id: RoomId) -> Option<&CatalogEntry> {
        self.first_by_id.get(&room_id).map(|&index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Codes handed to uncategorised rooms within a single record.
struct UniqueCodes {
    assigned: HashMap<RoomId, u32>,
    next: u32,
}

impl UniqueCodes {
    fn new() -> Self {
        Self { assigned: HashMap::new(), next: FIRST_UNIQUE_CODE }
    }

    fn code_for(&mut self, room_id: RoomId) -> u32 {
        let next = &mut self.next;
        *self.assigned.entry(room_id).or_insert_with(|| {
            let code = *next;
            *next += 1;
            code
        })
    }
}

fn room_code(room_id: RoomId, catalog: &RoomCatalog, unique: &mut UniqueCodes) -> u32 {
    let Some(entry) = catalog.lookup(room_id) else {
        return EMPTY_CODE;
    };

    match entry.room_type.as_deref().and_then(RoomCategory::from_type) {
        Some(category) => category.code(),
        None => unique.code_for(room_id),
    }
}

fn parse_slot(rooms: &str, slot: usize) -> Result<RoomId> {
    let start = slot * SLOT_WIDTH;
    let text = rooms.get(start..start + SLOT_WIDTH).unwrap_or_else(|| rooms.get(start..).unwrap_or(""));
    text.trim()
        .parse::<RoomId>()
        .map_err(|_| ToolError::RoomSlot { slot, text: text.to_string() })
}

/// Encode one dungeon record.
///
/// Returns `Ok(None)` when the record contains [`UNKNOWN_ROOM`]; such records
/// are skipped, not failed. Malformed records are errors.
pub fn convert_dungeon(line: &str, catalog: &RoomCatalog) -> Result<Option<String>> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != RECORD_FIELDS {
        return Err(ToolError::FieldCount { found: fields.len() });
    }
    let (rooms, doors) = (fields[2], fields[3]);

    let mut unique = UniqueCodes::new();
    let mut encoded = String::with_capacity(ROOM_SLOTS * 2 + doors.len());

    for slot in 0..ROOM_SLOTS {
        let room_id = parse_slot(rooms, slot)?;
        if room_id == UNKNOWN_ROOM {
            return Ok(None);
        }

        let code = room_code(room_id, catalog, &mut unique);
        encoded.push_str(&format!("{:02}", code));
    }

    encoded.push_str(doors);
    Ok(Some(encoded))
}

/// Progress snapshot passed to the caller before each record is converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the record about to be converted.
    pub line: usize,
    pub total: usize,
    /// Records converted so far.
    pub converted: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodeReport {
    /// Converted records, in input order.
    pub lines: Vec<String>,
    pub skipped: usize,
    pub total: usize,
}

impl EncodeReport {
    /// File contents: converted records joined by newlines.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

/// Encode every record, dropping the ones with unknown rooms.
pub fn encode_records<F>(records: &[&str], catalog: &RoomCatalog, mut on_progress: F) -> Result<EncodeReport>
where
    F: FnMut(Progress),
{
    let mut report = EncodeReport { total: records.len(), ..EncodeReport::default() };

    for (index, record) in records.iter().enumerate() {
        on_progress(Progress {
            line: index + 1,
            total: report.total,
            converted: report.lines.len(),
        });

        match convert_dungeon(record, catalog)? {
            Some(encoded) => report.lines.push(encoded),
            None => {
                debug!("record {} has an unknown room, skipping", index + 1);
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Read a record file, encode it and write the result to `output`.
pub fn run_encoder<F>(input: &Path, catalog_path: &Path, output: &Path, on_progress: F) -> Result<EncodeReport>
where
    F: FnMut(Progress),
{
    let catalog = RoomCatalog::load(catalog_path)?;
    info!("loaded {} catalog entries from {}", catalog.len(), catalog_path.display());

    let contents = fs::read_to_string(input).map_err(|e| ToolError::io(input, e))?;
    let records: Vec<&str> = contents.lines().collect();

    let report = encode_records(&records, &catalog, on_progress)?;
    fs::write(output, report.output()).map_err(|e| ToolError::io(output, e))?;

    info!(
        "encoded {} of {} records into {} ({} skipped)",
        report.lines.len(),
        report.total,
        output.display(),
        report.skipped
    );
    Ok(report)
}

/// Result of a converter run started from the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum ConvertRun {
    /// No input file was given; nothing was read or written.
    MissingInput,
    Finished(EncodeReport),
}

/// Command-line converter: progress lines and the closing `Done!` go to
/// `out`. Without an input file only `Missing input file` is reported.
pub fn convert_command<W: Write>(
    input: Option<&Path>,
    catalog_path: &Path,
    output: &Path,
    out: &mut W,
) -> Result<ConvertRun> {
    let Some(input) = input else {
        writeln!(out, "Missing input file").map_err(ToolError::Console)?;
        return Ok(ConvertRun::MissingInput);
    };

    let mut console_error = None;
    let report = run_encoder(input, catalog_path, output, |progress| {
        if console_error.is_none() {
            console_error = writeln!(
                out,
                "{}/{} ({}) Dungeons",
                progress.line, progress.total, progress.converted
            )
            .err();
        }
    })?;
    if let Some(e) = console_error {
        return Err(ToolError::Console(e));
    }

    writeln!(out, "Done!").map_err(ToolError::Console)?;
    Ok(ConvertRun::Finished(report))
}
