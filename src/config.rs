//! Run configuration for the batch tools.
//!
//! Defaults reproduce the fixed layout the tools were written against. Any
//! value can be overridden through `DUNGEON_TOOLS_*` environment variables
//! (the binaries load a `.env` file from the working directory first).

use std::path::PathBuf;

use tracing::warn;

use crate::catalog::RoomId;
use crate::merger::{AliasTable, Blacklist};

const ENV_MERGE_SOURCE: &str = "DUNGEON_TOOLS_MERGE_SOURCE";
const ENV_MERGE_ALIASES: &str = "DUNGEON_TOOLS_MERGE_ALIASES";
const ENV_MERGE_OUTPUT: &str = "DUNGEON_TOOLS_MERGE_OUTPUT";
const ENV_ENCODER_CATALOG: &str = "DUNGEON_TOOLS_ENCODER_CATALOG";
const ENV_ENCODER_OUTPUT: &str = "DUNGEON_TOOLS_ENCODER_OUTPUT";
const ENV_BLACKLIST: &str = "DUNGEON_TOOLS_BLACKLIST";

/// Input and output locations for every tool.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolPaths {
    /// Primary room catalog joined by the merger.
    pub merge_source: PathBuf,
    /// Catalog holding the alternate id lists.
    pub merge_aliases: PathBuf,
    /// Merged export written by the merger.
    pub merge_output: PathBuf,
    /// Room catalog the encoder resolves room ids against.
    pub encoder_catalog: PathBuf,
    /// Encoded dungeons written by the encoder.
    pub encoder_output: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            merge_source: PathBuf::from("data/rooms.json"),
            merge_aliases: PathBuf::from("data/bettermapRooms.json"),
            merge_output: PathBuf::from("data/export_rooms.json"),
            encoder_catalog: PathBuf::from("converter/rooms.json"),
            encoder_output: PathBuf::from("output_dungeons.txt"),
        }
    }
}

impl ToolPaths {
    /// Load paths from the environment or use defaults.
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut paths = Self::default();

        let overrides = [
            (ENV_MERGE_SOURCE, &mut paths.merge_source),
            (ENV_MERGE_ALIASES, &mut paths.merge_aliases),
            (ENV_MERGE_OUTPUT, &mut paths.merge_output),
            (ENV_ENCODER_CATALOG, &mut paths.encoder_catalog),
            (ENV_ENCODER_OUTPUT, &mut paths.encoder_output),
        ];
        for (key, slot) in overrides {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => *slot = PathBuf::from(value.trim()),
                Some(_) => warn!("{} is empty, using default", key),
                None => {}
            }
        }

        paths
    }
}

/// Join settings for the room merger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeSettings {
    pub aliases: AliasTable,
    pub blacklist: Blacklist,
}

impl MergeSettings {
    /// Load settings from the environment or use defaults.
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_BLACKLIST) {
            match parse_id_list(&raw) {
                Some(ids) => settings.blacklist = Blacklist::from_ids(ids),
                None => warn!("Invalid {} '{}', using empty blacklist", ENV_BLACKLIST, raw),
            }
        }

        settings
    }
}

/// Parse a comma separated id list. Blank input is an empty list.
fn parse_id_list(raw: &str) -> Option<Vec<RoomId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<RoomId>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_paths() {
        let paths = ToolPaths::from_lookup(|_| None);
        assert_eq!(paths, ToolPaths::default());
        assert_eq!(paths.merge_output, PathBuf::from("data/export_rooms.json"));
        assert_eq!(paths.encoder_catalog, PathBuf::from("converter/rooms.json"));
    }

    #[test]
    fn test_path_overrides() {
        let paths = ToolPaths::from_lookup(lookup_from(&[
            (ENV_ENCODER_OUTPUT, "out/dungeons.txt"),
            (ENV_MERGE_SOURCE, "   "),
        ]));
        assert_eq!(paths.encoder_output, PathBuf::from("out/dungeons.txt"));
        assert_eq!(paths.merge_source, PathBuf::from("data/rooms.json"));
    }

    #[test]
    fn test_blacklist_from_env() {
        let settings = MergeSettings::from_lookup(lookup_from(&[(ENV_BLACKLIST, "12, 40,")]));
        assert!(settings.blacklist.contains(12));
        assert!(settings.blacklist.contains(40));
        assert!(!settings.blacklist.contains(13));

        let settings = MergeSettings::from_lookup(lookup_from(&[(ENV_BLACKLIST, "12,abc")]));
        assert!(settings.blacklist.is_empty());
    }

    #[test]
    fn test_default_settings_keep_fixed_aliases() {
        let settings = MergeSettings::from_lookup(|_| None);
        assert_eq!(settings.aliases.get("Dragon"), Some("Miniboss"));
        assert_eq!(settings.aliases.get("Default"), Some("Miniboss"));
        assert!(settings.blacklist.is_empty());
    }
}
