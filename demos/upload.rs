mod cli;

use cli::{parse_connection, usage_and_exit};
use drivelib::progress::make_progress_printer;
use drivelib::UploadFile;
use std::process;

const USAGE: &str = "Usage: cargo run --example upload -- [--url URL] [--proxy PROXY] [--folder PARENT_ID] <LOCAL_FILE>...";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = parse_connection(USAGE);
    if conn.positionals.is_empty() {
        usage_and_exit(USAGE);
    }

    let mut files = Vec::with_capacity(conn.positionals.len());
    for path in &conn.positionals {
        files.push(UploadFile::from_path(path).await?);
    }

    let drive = conn.open().await?;

    println!("Uploading {} file(s)...", files.len());
    let report = drive
        .upload_files_with_progress(files, make_progress_printer())
        .await?;

    if let Err(e) = &report.refresh {
        eprintln!("Listing refresh failed: {e}");
    }
    for failed in report.failed() {
        if let Err(e) = &failed.result {
            eprintln!("{}: {e}", failed.name);
        }
    }
    if !report.all_succeeded() {
        process::exit(1);
    }
    println!("Upload complete!");

    Ok(())
}
