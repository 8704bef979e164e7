mod cli;

use cli::{parse_connection, usage_and_exit};
use drivelib::error::Result;

const USAGE: &str =
    "Usage: cargo run --example mkdir -- [--url URL] [--proxy PROXY] [--folder PARENT_ID] <NAME>";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let name = conn.positionals[0].clone();

    let drive = conn.open().await?;

    println!("Creating folder: {name}");
    match drive.create_folder(&name).await {
        Ok(folder) => {
            println!("Folder created successfully!");
            println!("Name: {}", folder.name);
            println!("Id: {}", folder.id);
        }
        Err(e) => {
            eprintln!("Failed to create folder: {e}");
        }
    }

    Ok(())
}
