//! Encode dungeon records into compact layout strings

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use dungeon_tools::config::ToolPaths;
use dungeon_tools::{encoder, logging};

#[derive(Parser, Debug)]
#[command(name = "convert_dungeons")]
#[command(about = "Convert dungeon room-id records into encoded layout strings")]
struct Args {
    /// File with one dungeon record per line
    input: Option<PathBuf>,

    /// Room catalog to resolve room ids against (default: converter/rooms.json)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output file (default: output_dungeons.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    dotenvy::dotenv().ok();
    logging::init();
    let args = Args::parse();

    let paths = ToolPaths::load_or_default();
    let catalog = args.catalog.unwrap_or(paths.encoder_catalog);
    let output = args.output.unwrap_or(paths.encoder_output);

    let mut stdout = io::stdout().lock();
    if let Err(e) = encoder::convert_command(args.input.as_deref(), &catalog, &output, &mut stdout) {
        eprintln!("Conversion failed: {}", e);
        process::exit(1);
    }
}
