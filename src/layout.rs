//! Decoding of encoded dungeon layouts.
//!
//! An encoded layout is the encoder's output as the game server reads it:
//! 36 two-digit room codes (6x6, row-major) followed by one character per
//! door slot. Door slots run over 11 rows that alternate between 5
//! connectors joining horizontally adjacent rooms and 6 connectors joining
//! vertically adjacent rooms.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::encoder::{RoomCategory, EMPTY_CODE};
use crate::error::{Result, ToolError};
use crate::tilemap::Tilemap;

/// Rooms per side of the dungeon grid.
pub const GRID_SIZE: usize = 6;
/// Characters taken by the room codes.
pub const ROOM_DIGITS: usize = GRID_SIZE * GRID_SIZE * 2;
/// Number of door slots after the room codes.
pub const DOOR_SLOTS: usize = 60;

/// Content of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomCell {
    Empty,
    Special(RoomCategory),
    /// Uncategorised room; cells with the same code are the same room.
    Unique(u32),
}

impl RoomCell {
    pub fn from_code(code: u32) -> Self {
        if code == EMPTY_CODE {
            return RoomCell::Empty;
        }
        match RoomCategory::from_code(code) {
            Some(category) => RoomCell::Special(category),
            None => RoomCell::Unique(code),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            RoomCell::Empty => EMPTY_CODE,
            RoomCell::Special(category) => category.code(),
            RoomCell::Unique(code) => code,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DoorKind {
    Normal,
    Wither,
    Blood,
    Entrance,
}

impl DoorKind {
    /// Door for a slot character. Any other character is an absent door.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(DoorKind::Normal),
            '1' => Some(DoorKind::Wither),
            '2' => Some(DoorKind::Blood),
            '3' => Some(DoorKind::Entrance),
            _ => None,
        }
    }
}

/// Which pair of rooms a door slot joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorAxis {
    /// Joins `(x, y)` and `(x + 1, y)`.
    Horizontal,
    /// Joins `(x, y)` and `(x, y + 1)`.
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorSlot {
    pub x: usize,
    pub y: usize,
    pub axis: DoorAxis,
    pub kind: Option<DoorKind>,
}

/// Grid position of the door slot at `index`.
pub fn door_position(index: usize) -> (usize, usize, DoorAxis) {
    const PAIR: usize = (GRID_SIZE - 1) + GRID_SIZE;
    let (row_pair, offset) = (index / PAIR, index % PAIR);
    if offset < GRID_SIZE - 1 {
        (offset, row_pair, DoorAxis::Horizontal)
    } else {
        (offset - (GRID_SIZE - 1), row_pair, DoorAxis::Vertical)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomCounts {
    pub empty: usize,
    pub special: usize,
    pub unique_cells: usize,
    /// Distinct unique codes.
    pub unique_rooms: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EncodedLayout {
    pub rooms: Tilemap<RoomCell>,
    pub doors: Vec<DoorSlot>,
    /// Anything after the door slots, kept as is.
    pub trailing: String,
}

impl EncodedLayout {
    pub fn parse(encoded: &str) -> Result<Self> {
        if encoded.len() < ROOM_DIGITS {
            return Err(ToolError::LayoutTooShort {
                len: encoded.chars().count(),
                need: ROOM_DIGITS + DOOR_SLOTS,
            });
        }

        let mut cells = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for cell in 0..GRID_SIZE * GRID_SIZE {
            let text = encoded.get(cell * 2..cell * 2 + 2).unwrap_or("");
            if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ToolError::LayoutCell { cell, text: text.to_string() });
            }
            let code = text
                .parse::<u32>()
                .map_err(|_| ToolError::LayoutCell { cell, text: text.to_string() })?;
            cells.push(RoomCell::from_code(code));
        }
        let rooms = Tilemap::from_cells(GRID_SIZE, GRID_SIZE, cells)
            .ok_or(ToolError::LayoutTooShort { len: encoded.len(), need: ROOM_DIGITS })?;

        let mut suffix = encoded[ROOM_DIGITS..].chars();
        let mut doors = Vec::with_capacity(DOOR_SLOTS);
        for index in 0..DOOR_SLOTS {
            let Some(c) = suffix.next() else {
                return Err(ToolError::LayoutTooShort {
                    len: ROOM_DIGITS + index,
                    need: ROOM_DIGITS + DOOR_SLOTS,
                });
            };
            let (x, y, axis) = door_position(index);
            doors.push(DoorSlot { x, y, axis, kind: DoorKind::from_char(c) });
        }

        Ok(Self { rooms, doors, trailing: suffix.collect() })
    }

    pub fn cell(&self, x: usize, y: usize) -> RoomCell {
        *self.rooms.get(x, y)
    }

    pub fn door(&self, x: usize, y: usize, axis: DoorAxis) -> Option<DoorKind> {
        self.doors
            .iter()
            .find(|slot| slot.x == x && slot.y == y && slot.axis == axis)
            .and_then(|slot| slot.kind)
    }

    pub fn door_count(&self) -> usize {
        self.doors.iter().filter(|slot| slot.kind.is_some()).count()
    }

    pub fn room_counts(&self) -> RoomCounts {
        let mut counts = RoomCounts::default();
        let mut unique_codes = BTreeSet::new();
        for (_, _, cell) in self.rooms.iter() {
            match cell {
                RoomCell::Empty => counts.empty += 1,
                RoomCell::Special(_) => counts.special += 1,
                RoomCell::Unique(code) => {
                    counts.unique_cells += 1;
                    unique_codes.insert(*code);
                }
            }
        }
        counts.unique_rooms = unique_codes.len();
        counts
    }

    /// Number of orthogonally connected pieces per unique code. A code with
    /// more than one piece usually means two different rooms were given the
    /// same id.
    pub fn unique_room_pieces(&self) -> BTreeMap<u32, usize> {
        let mut pieces = BTreeMap::new();
        let mut visited = HashSet::new();

        for (x, y, cell) in self.rooms.iter() {
            let RoomCell::Unique(code) = *cell else {
                continue;
            };
            if !visited.insert((x, y)) {
                continue;
            }
            *pieces.entry(code).or_insert(0) += 1;

            let mut stack = vec![(x, y)];
            while let Some((cx, cy)) = stack.pop() {
                for (nx, ny) in self.rooms.neighbors(cx, cy) {
                    if *self.rooms.get(nx, ny) == RoomCell::Unique(code) && visited.insert((nx, ny)) {
                        stack.push((nx, ny));
                    }
                }
            }
        }

        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::encoder::{convert_dungeon, RoomCatalog};

    fn no_doors() -> String {
        "9".repeat(DOOR_SLOTS)
    }

    #[test]
    fn test_door_positions() {
        assert_eq!(door_position(0), (0, 0, DoorAxis::Horizontal));
        assert_eq!(door_position(4), (4, 0, DoorAxis::Horizontal));
        assert_eq!(door_position(5), (0, 0, DoorAxis::Vertical));
        assert_eq!(door_position(10), (5, 0, DoorAxis::Vertical));
        assert_eq!(door_position(11), (0, 1, DoorAxis::Horizontal));
        assert_eq!(door_position(DOOR_SLOTS - 1), (4, 5, DoorAxis::Horizontal));
    }

    #[test]
    fn test_parse_cells_and_doors() {
        let mut rooms = "00".repeat(36);
        rooms.replace_range(0..4, "0107");
        let mut doors = no_doors();
        doors.replace_range(0..1, "3");
        doors.replace_range(5..6, "1");

        let layout = EncodedLayout::parse(&format!("{rooms}{doors}tail")).unwrap();

        assert_eq!(layout.cell(0, 0), RoomCell::Special(RoomCategory::Entrance));
        assert_eq!(layout.cell(1, 0), RoomCell::Unique(7));
        assert_eq!(layout.cell(5, 5), RoomCell::Empty);
        assert_eq!(layout.door(0, 0, DoorAxis::Horizontal), Some(DoorKind::Entrance));
        assert_eq!(layout.door(0, 0, DoorAxis::Vertical), Some(DoorKind::Wither));
        assert_eq!(layout.door(1, 0, DoorAxis::Horizontal), None);
        assert_eq!(layout.door_count(), 2);
        assert_eq!(layout.trailing, "tail");
    }

    #[test]
    fn test_parse_rejects_short_or_bad_input() {
        let err = EncodedLayout::parse("0101").unwrap_err();
        assert!(matches!(err, ToolError::LayoutTooShort { .. }));

        let err = EncodedLayout::parse(&format!("{}000", "00".repeat(36))).unwrap_err();
        assert!(matches!(err, ToolError::LayoutTooShort { len: 75, .. }));

        let bad = format!("0a{}{}", "00".repeat(35), no_doors());
        let err = EncodedLayout::parse(&bad).unwrap_err();
        assert!(matches!(err, ToolError::LayoutCell { cell: 0, .. }));

        let signed = format!("00+1{}{}", "00".repeat(34), no_doors());
        let err = EncodedLayout::parse(&signed).unwrap_err();
        assert!(matches!(err, ToolError::LayoutCell { cell: 1, ref text } if text == "+1"));
    }

    #[test]
    fn test_counts_and_pieces() {
        // 08 at (0,0) (1,0) and again at (0,2); 02 at (4,1); 07 at (5,1)
        let mut rooms = "00".repeat(36);
        rooms.replace_range(0..4, "0808");
        rooms.replace_range(20..24, "0207");
        rooms.replace_range(24..26, "08");

        let layout = EncodedLayout::parse(&format!("{rooms}{}", no_doors())).unwrap();
        let counts = layout.room_counts();

        assert_eq!(counts.special, 1);
        assert_eq!(counts.unique_cells, 4);
        assert_eq!(counts.unique_rooms, 2);
        assert_eq!(counts.empty, 31);

        let pieces = layout.unique_room_pieces();
        assert_eq!(pieces.get(&7), Some(&1));
        assert_eq!(pieces.get(&8), Some(&2));
    }

    #[test]
    fn test_decoding_encoder_output() {
        let catalog = RoomCatalog::new(vec![
            CatalogEntry { room_id: 1, room_type: Some("entrance".to_string()) },
            CatalogEntry { room_id: 40, room_type: Some("mobs".to_string()) },
            CatalogEntry { room_id: 41, room_type: Some("mobs".to_string()) },
        ]);
        let mut ids = vec!["000"; 36];
        ids[0] = "001";
        ids[1] = "040";
        ids[2] = "040";
        ids[6] = "041";
        let line = format!("a;b;{};{}", ids.concat(), no_doors());

        let encoded = convert_dungeon(&line, &catalog).unwrap().unwrap();
        let layout = EncodedLayout::parse(&encoded).unwrap();

        assert_eq!(layout.cell(0, 0), RoomCell::Special(RoomCategory::Entrance));
        assert_eq!(layout.cell(1, 0), layout.cell(2, 0));
        assert_eq!(layout.cell(1, 0), RoomCell::Unique(7));
        assert_eq!(layout.cell(0, 1), RoomCell::Unique(8));
        assert_eq!(layout.room_counts().unique_rooms, 2);
    }

    #[test]
    fn test_cell_codes() {
        assert_eq!(RoomCell::from_code(0), RoomCell::Empty);
        assert_eq!(RoomCell::from_code(3), RoomCell::Special(RoomCategory::Blood));
        assert_eq!(RoomCell::from_code(12), RoomCell::Unique(12));
        assert_eq!(RoomCell::Unique(12).code(), 12);
    }
}
