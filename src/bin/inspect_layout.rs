//! Print encoded dungeon layouts as ASCII grids

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use dungeon_tools::ascii;
use dungeon_tools::layout::EncodedLayout;
use dungeon_tools::logging;

#[derive(Parser, Debug)]
#[command(name = "inspect_layout")]
#[command(about = "Render encoded dungeon layouts as ASCII")]
struct Args {
    /// File of encoded layouts, one per line
    input: PathBuf,

    /// Only show this line (1-based)
    #[arg(short, long)]
    line: Option<usize>,

    /// Write an ASCII report to this file instead of printing
    #[arg(long)]
    export: Option<PathBuf>,

    /// Color special rooms and doors
    #[arg(long)]
    color: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    logging::init();
    let args = Args::parse();

    let contents = fs::read_to_string(&args.input)?;
    let mut layouts = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let number = index + 1;
        if args.line.is_some_and(|wanted| wanted != number) {
            continue;
        }
        let layout = EncodedLayout::parse(line).map_err(|e| format!("line {}: {}", number, e))?;
        layouts.push((number, layout));
    }

    if let Some(wanted) = args.line {
        if layouts.is_empty() {
            return Err(format!("{} has no line {}", args.input.display(), wanted).into());
        }
    }

    if let Some(path) = &args.export {
        ascii::export_layout_file(&layouts, &args.input, path)?;
        println!("Exported {} layouts to {}", layouts.len(), path.display());
        return Ok(());
    }

    for (number, layout) in &layouts {
        let counts = layout.room_counts();
        println!("=== Line {} ===", number);
        if args.color {
            print!("{}", ascii::render_colored_layout(layout));
        } else {
            print!("{}", ascii::render_layout(layout));
        }
        println!(
            "{} special, {} unique rooms, {} doors",
            counts.special,
            counts.unique_rooms,
            layout.door_count()
        );
        for (code, pieces) in layout.unique_room_pieces() {
            if pieces > 1 {
                tracing::warn!("line {}: room code {} is split into {} pieces", number, code, pieces);
            }
        }
        println!();
    }
    print!("{}", ascii::layout_legend());

    Ok(())
}
