//! Merge the room catalog with the alternate-id catalog

use std::process;

use clap::Parser;

use dungeon_tools::config::{MergeSettings, ToolPaths};
use dungeon_tools::{logging, merger};

#[derive(Parser, Debug)]
#[command(name = "merge_rooms")]
#[command(about = "Join data/rooms.json with data/bettermapRooms.json into data/export_rooms.json")]
struct Args {}

fn main() {
    dotenvy::dotenv().ok();
    logging::init();
    let _args = Args::parse();

    let paths = ToolPaths::load_or_default();
    let settings = MergeSettings::load_or_default();

    match merger::run_merge(&paths, &settings) {
        Ok(outcome) => println!("{}", outcome.unmatched_line()),
        Err(e) => {
            eprintln!("Merge failed: {}", e);
            process::exit(1);
        }
    }
}
