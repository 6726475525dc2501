//! Room metadata merger.
//!
//! Joins the primary room catalog against a secondary catalog by room name
//! and re-keys each room with the secondary catalog's id list.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::{self, AliasRoom, RoomId, SourceRoom};
use crate::config::{MergeSettings, ToolPaths};
use crate::error::Result;

/// Name substitutions tried when a room has no direct match.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("Dragon", "Miniboss");
        table.insert("Default", "Miniboss");
        table
    }
}

impl AliasTable {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, alias: impl Into<String>) {
        self.entries.insert(name.into(), alias.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }
}

/// Ids dropped from every merged `ids` list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Blacklist {
    ids: HashSet<RoomId>,
}

impl Blacklist {
    pub fn from_ids(ids: impl IntoIterator<Item = RoomId>) -> Self {
        Self { ids: ids.into_iter().collect() }
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One room of the merged export. Field order is the output key order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MergedRoom {
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub room_id: RoomId,
    pub ids: Vec<RoomId>,
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doors: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
    pub merged: Vec<MergedRoom>,
    /// Names of source rooms with no counterpart, in input order.
    pub unmatched: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeSummary {
    pub merged: usize,
    pub unmatched: usize,
}

impl MergeOutcome {
    /// Unmatched names as a single printable line.
    pub fn unmatched_line(&self) -> String {
        self.unmatched.join(", ")
    }

    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            merged: self.merged.len(),
            unmatched: self.unmatched.len(),
        }
    }
}

fn matches(source: &SourceRoom, candidate: &AliasRoom, aliases: &AliasTable) -> bool {
    candidate.name == source.name || aliases.get(&source.name) == Some(candidate.name.as_str())
}

/// Join `sources` against `alias_rooms`. The first matching alias room wins.
pub fn merge(
    sources: &[SourceRoom],
    alias_rooms: &[AliasRoom],
    aliases: &AliasTable,
    blacklist: &Blacklist,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for source in sources {
        match alias_rooms.iter().find(|candidate| matches(source, candidate, aliases)) {
            Some(found) => {
                if found.name != source.name {
                    debug!("{} matched through alias {}", source.name, found.name);
                }
                outcome.merged.push(MergedRoom {
                    name: source.name.clone(),
                    room_type: source.room_type.clone(),
                    room_id: source.room_id,
                    ids: found.id.iter().copied().filter(|id| !blacklist.contains(*id)).collect(),
                    shape: source.shape.clone(),
                    doors: source.doors.clone(),
                });
            }
            None => outcome.unmatched.push(source.name.clone()),
        }
    }

    outcome
}

/// Load both catalogs, merge them and write the export.
pub fn run_merge(paths: &ToolPaths, settings: &MergeSettings) -> Result<MergeOutcome> {
    let alias_rooms: Vec<AliasRoom> = catalog::load_json(&paths.merge_aliases)?;
    let sources: Vec<SourceRoom> = catalog::load_json(&paths.merge_source)?;

    let outcome = merge(&sources, &alias_rooms, &settings.aliases, &settings.blacklist);
    catalog::write_json_pretty(&outcome.merged, &paths.merge_output)?;

    let summary = outcome.summary();
    info!(
        "merged {} rooms into {} ({} unmatched)",
        summary.merged,
        paths.merge_output.display(),
        summary.unmatched
    );
    Ok(outcome)
}
