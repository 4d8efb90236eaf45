use std::fs::File;

use clap::Parser;
use elizabeth::core::config::{self, CliOverrides};
use elizabeth::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "elizabeth", about = "Terminal chat client for anime recommendations")]
struct Args {
    /// Base URL of the recommendation service (overrides config and env)
    #[arg(long)]
    service_url: Option<String>,

    /// Base URL for catalog deep links (overrides config and env)
    #[arg(long)]
    catalog_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - stdout belongs to the terminal UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("elizabeth.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("elizabeth: {e}");
            log::error!("Config load failed: {}", e);
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            service_url: args.service_url.as_deref(),
            catalog_url: args.catalog_url.as_deref(),
        },
    );
    log::info!(
        "Elizabeth starting up (service: {}, catalog: {})",
        resolved.service_base_url,
        resolved.catalog_base_url
    );

    tui::run(resolved)
}
