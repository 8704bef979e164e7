use std::env;
use std::process;

use drivelib::{ClientConfig, DriveHandle};
use tracing_subscriber::EnvFilter;

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    pub fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    pub fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Connection flags shared by every demo.
pub struct Connection {
    pub config: ClientConfig,
    pub folder: Option<String>,
    pub positionals: Vec<String>,
}

/// Parse `--url`, `--proxy` and `--folder` on top of the `DRIVE_*` environment.
pub fn parse_connection(usage: &'static str) -> Connection {
    init_logging();

    let mut parser = ArgParser::new(usage);
    let mut config = ClientConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        usage_and_exit(usage)
    });
    if let Some(url) = parser.take_value(&["--url", "-u"]) {
        config.base_url = url;
    }
    if let Some(proxy) = parser.take_value(&["--proxy"]) {
        config = config.with_proxy(proxy);
    }
    let folder = parser.take_value(&["--folder", "-f"]);

    Connection {
        config,
        folder,
        positionals: parser.remaining(),
    }
}

impl Connection {
    /// Connect and enter `--folder` (root when absent).
    #[allow(dead_code)] // dl talks to ApiClient directly.
    pub async fn open(&self) -> drivelib::Result<DriveHandle> {
        let drive = DriveHandle::connect(&self.config).await?;
        if self.folder.is_some() {
            drive.open_folder(self.folder.as_deref()).await?;
        }
        Ok(drive)
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drivelib=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
