//! Example: Rename a file or folder in the current folder
//!
//! Usage:
//!   cargo run --example rename -- [--url URL] [--folder PARENT_ID] <ITEM_ID> <NEW_NAME>

mod cli;

use cli::{parse_connection, usage_and_exit};
use drivelib::RenameDraft;

const USAGE: &str = "Usage: cargo run --example rename -- [--url URL] [--proxy PROXY] [--folder PARENT_ID] <ITEM_ID> <NEW_NAME>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let id = conn.positionals[0].clone();
    let new_name = conn.positionals[1].clone();

    let drive = conn.open().await?;
    let listing = drive.snapshot().await?.listing;

    let mut draft = if let Some(folder) = listing.folder(&id) {
        RenameDraft::for_folder(folder)
    } else if let Some(file) = listing.file(&id) {
        RenameDraft::for_file(file)
    } else {
        return Err(format!("{id} is not in this folder").into());
    };

    println!("Renaming {} to {}...", draft.proposed_name, new_name);
    draft.set_name(new_name);
    drive.submit_rename(draft).await?;

    println!("Rename complete!");

    Ok(())
}
