//! ASCII rendering and export module for dungeon layouts
//!
//! Draws an encoded layout as an 11x11 character picture: rooms on even
//! coordinates, door slots between them.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use chrono::Local;

use crate::encoder::RoomCategory;
use crate::layout::{DoorAxis, DoorKind, EncodedLayout, RoomCell, GRID_SIZE};

/// Side length of the rendered picture.
pub const RENDER_SIZE: usize = GRID_SIZE * 2 - 1;

const UNIQUE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Get ASCII character for a special room
pub fn category_char(category: RoomCategory) -> char {
    match category {
        RoomCategory::Entrance => 'E',
        RoomCategory::Fairy => 'F',
        RoomCategory::Blood => 'B',
        RoomCategory::Puzzle => 'P',
        RoomCategory::Trap => 'T',
        RoomCategory::Yellow => 'Y',
    }
}

/// Get ASCII character for a grid cell
pub fn room_char(cell: RoomCell) -> char {
    match cell {
        RoomCell::Empty => '.',
        RoomCell::Special(category) => category_char(category),
        RoomCell::Unique(code) => code
            .checked_sub(7)
            .and_then(|i| UNIQUE_CHARS.get(i as usize))
            .map(|&b| b as char)
            .unwrap_or('#'),
    }
}

pub fn door_char(kind: DoorKind, axis: DoorAxis) -> char {
    match (kind, axis) {
        (DoorKind::Normal, DoorAxis::Horizontal) => '-',
        (DoorKind::Normal, DoorAxis::Vertical) => '|',
        (DoorKind::Wither, _) => 'W',
        (DoorKind::Blood, _) => 'R',
        (DoorKind::Entrance, _) => 'N',
    }
}

/// Character between two rooms: the door if there is one, otherwise the
/// room itself when both cells belong to the same unique room.
fn connector_char(layout: &EncodedLayout, x: usize, y: usize, axis: DoorAxis) -> char {
    if let Some(kind) = layout.door(x, y, axis) {
        return door_char(kind, axis);
    }
    let here = layout.cell(x, y);
    let there = match axis {
        DoorAxis::Horizontal => layout.cell(x + 1, y),
        DoorAxis::Vertical => layout.cell(x, y + 1),
    };
    match here {
        RoomCell::Unique(_) if here == there => room_char(here),
        _ => ' ',
    }
}

/// Render a layout to ASCII string
pub fn render_layout(layout: &EncodedLayout) -> String {
    let mut result = String::with_capacity((RENDER_SIZE + 1) * RENDER_SIZE);

    for py in 0..RENDER_SIZE {
        for px in 0..RENDER_SIZE {
            let (x, y) = (px / 2, py / 2);
            let ch = match (px % 2, py % 2) {
                (0, 0) => room_char(layout.cell(x, y)),
                (1, 0) => connector_char(layout, x, y, DoorAxis::Horizontal),
                (0, 1) => connector_char(layout, x, y, DoorAxis::Vertical),
                _ => ' ',
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Generate legend for layout characters
pub fn layout_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LAYOUT LEGEND ===\n");
    legend.push_str("ROOMS:\n");
    legend.push_str("  E Entrance   F Fairy      B Blood      P Puzzle\n");
    legend.push_str("  T Trap       Y Yellow     . Nothing\n");
    legend.push_str("  a-z 0-9 Unique rooms (same letter = same room), # beyond range\n");
    legend.push_str("DOORS:\n");
    legend.push_str("  - | Normal   W Wither     R Blood      N Entrance\n");
    legend
}

pub fn ansi_fg_colored(text: &str, fg: (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", fg.0, fg.1, fg.2, text)
}

fn char_color(ch: char) -> Option<(u8, u8, u8)> {
    match ch {
        'E' | 'N' => Some((80, 200, 80)),
        'F' => Some((230, 120, 220)),
        'B' | 'R' => Some((220, 50, 50)),
        'P' => Some((150, 100, 230)),
        'T' => Some((230, 150, 40)),
        'Y' => Some((240, 220, 60)),
        'W' => Some((120, 120, 120)),
        _ => None,
    }
}

/// Render a layout with ANSI colors for special rooms and doors
pub fn render_colored_layout(layout: &EncodedLayout) -> String {
    render_layout(layout)
        .chars()
        .map(|ch| match char_color(ch) {
            Some(color) => ansi_fg_colored(&ch.to_string(), color),
            None => ch.to_string(),
        })
        .collect()
}

/// Export a set of layouts to an ASCII report file
pub fn export_layout_file(
    layouts: &[(usize, EncodedLayout)],
    source: &Path,
    path: &Path,
) -> io::Result<()> {
    let mut file = File::create(path)?;

    // Header
    writeln!(file, "=== DUNGEON LAYOUT REPORT ===")?;
    writeln!(file, "Source: {}", source.display())?;
    writeln!(file, "Layouts: {}", layouts.len())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for (line, layout) in layouts {
        let counts = layout.room_counts();
        writeln!(file, "=== LINE {} ===", line)?;
        write!(file, "{}", render_layout(layout))?;
        writeln!(
            file,
            "Rooms: {} special, {} unique ({} cells), {} empty; doors: {}",
            counts.special,
            counts.unique_rooms,
            counts.unique_cells,
            counts.empty,
            layout.door_count()
        )?;
        writeln!(file)?;
    }

    write!(file, "{}", layout_legend())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DOOR_SLOTS;

    fn layout_from(rooms: &str, doors: &str) -> EncodedLayout {
        EncodedLayout::parse(&format!("{rooms}{doors}")).unwrap()
    }

    #[test]
    fn test_render_rooms_and_doors() {
        let mut rooms = "00".repeat(36);
        // Entrance at (0,0), unique room 07 over (1,0) and (2,0), fairy at (0,1)
        rooms.replace_range(0..6, "010707");
        rooms.replace_range(12..14, "02");
        let mut doors = "x".repeat(DOOR_SLOTS);
        doors.replace_range(0..1, "3"); // (0,0) to (1,0)
        doors.replace_range(5..6, "0"); // (0,0) to (0,1)

        let picture = render_layout(&layout_from(&rooms, &doors));
        let rows: Vec<&str> = picture.lines().collect();

        assert_eq!(rows.len(), RENDER_SIZE);
        assert!(rows.iter().all(|row| row.chars().count() == RENDER_SIZE));
        assert_eq!(rows[0], "ENaaa . . .");
        assert_eq!(rows[1], format!("|{}", " ".repeat(RENDER_SIZE - 1)));
        assert_eq!(rows[2], "F . . . . .");
    }

    #[test]
    fn test_room_chars() {
        assert_eq!(room_char(RoomCell::Empty), '.');
        assert_eq!(room_char(RoomCell::Special(RoomCategory::Yellow)), 'Y');
        assert_eq!(room_char(RoomCell::Unique(7)), 'a');
        assert_eq!(room_char(RoomCell::Unique(33)), '0');
        assert_eq!(room_char(RoomCell::Unique(99)), '#');
    }

    #[test]
    fn test_colored_render_keeps_plain_chars() {
        let layout = layout_from(&"00".repeat(36), &"x".repeat(DOOR_SLOTS));
        assert_eq!(render_colored_layout(&layout), render_layout(&layout));
    }

    #[test]
    fn test_export_layout_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let layout = layout_from(&format!("01{}", "00".repeat(35)), &"x".repeat(DOOR_SLOTS));

        export_layout_file(&[(3, layout)], Path::new("dungeons.txt"), &path).unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.starts_with("=== DUNGEON LAYOUT REPORT ===\nSource: dungeons.txt\nLayouts: 1\n"));
        assert!(report.contains("Generated: "));
        assert!(report.contains("=== LINE 3 ===\nE . . . . .\n"));
        assert!(report.contains("Rooms: 1 special, 0 unique (0 cells), 35 empty; doors: 0"));
        assert!(report.ends_with(&layout_legend()));
    }
}
