mod cli;

use cli::{parse_connection, usage_and_exit};
use drivelib::error::Result;
use drivelib::ItemKind;

const USAGE: &str =
    "Usage: cargo run --example rm -- [--url URL] [--proxy PROXY] [--folder PARENT_ID] [--dir] <ITEM_ID>";

#[tokio::main]
async fn main() -> Result<()> {
    let mut conn = parse_connection(USAGE);
    let is_dir = conn.positionals.iter().any(|a| a == "--dir");
    conn.positionals.retain(|a| a != "--dir");
    if conn.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let target = conn.positionals[0].clone();
    let kind = if is_dir {
        ItemKind::Folder
    } else {
        ItemKind::File
    };

    let drive = conn.open().await?;

    println!("Removing {kind}: {target}");
    match drive.delete_item(&target, kind).await {
        Ok(_) => {
            println!("Removed successfully!");
        }
        Err(e) => {
            eprintln!("Failed to remove: {e}");
        }
    }

    Ok(())
}
