//! Example: List a Drive folder
//!
//! Usage:
//!   cargo run --example ls -- [--url URL] [--folder FOLDER_ID]

mod cli;

use cli::parse_connection;
use drivelib::error::Result;

const USAGE: &str = "Usage: cargo run --example ls -- [--url URL] [--proxy PROXY] [--folder FOLDER_ID]";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);

    println!("Connecting to {}...", conn.config.base_url);
    let drive = conn.open().await?;
    let snapshot = drive.snapshot().await?;

    let mut location = String::from("/");
    for folder in &snapshot.path {
        location.push_str(&folder.name);
        location.push('/');
    }
    println!("\nListing: {location}\n");

    if snapshot.listing.is_empty() {
        println!("  (empty)");
        return Ok(());
    }
    for folder in &snapshot.listing.folders {
        println!("  [dir]  {}  ({})", folder.name, folder.id);
    }
    for file in &snapshot.listing.files {
        println!(
            "  {:>10}  {}  ({})",
            file.display_size(),
            file.name,
            file.id
        );
    }

    Ok(())
}
