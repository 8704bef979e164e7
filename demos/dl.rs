//! Example: Download a file by id
//!
//! Usage:
//!   cargo run --example dl -- [--url URL] <FILE_ID> [OUTPUT_FILE]

mod cli;

use cli::{parse_connection, usage_and_exit};
use drivelib::{format_size, ApiClient};

const USAGE: &str =
    "Usage: cargo run --example dl -- [--url URL] [--proxy PROXY] <FILE_ID> [OUTPUT_FILE]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = parse_connection(USAGE);
    if conn.positionals.is_empty() || conn.positionals.len() > 2 {
        usage_and_exit(USAGE);
    }
    let file_id = &conn.positionals[0];
    let output_path = conn
        .positionals
        .get(1)
        .cloned()
        .unwrap_or_else(|| file_id.clone());

    let client = ApiClient::new(&conn.config)?;
    println!("Link: {}", drivelib::DriveApi::download_url(&client, file_id)?);

    println!("Downloading to: {output_path}");
    let written = client.download_to_file(file_id, &output_path).await?;
    println!("Done ({})", format_size(written));

    Ok(())
}
