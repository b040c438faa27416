//! noteshelf executable.
//!
//! # Responsibility
//! - `noteshelf [serve]`: read config, start logging, open the database and
//!   serve HTTP.
//! - `noteshelf ping`: print core linkage info and exit.

mod args;

use args::{Cli, Command};
use clap::Parser;
use log::{error, info};
use noteshelf_core::db::open_location;
use noteshelf_core::{init_logging, AppConfig};
use noteshelf_web::{AppState, HttpServer};
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command() {
        Command::Serve => match serve().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("event=app_exit module=cli status=error error={err}");
                eprintln!("noteshelf: {err}");
                ExitCode::FAILURE
            }
        },
        Command::Ping => {
            println!("noteshelf_core ping={}", noteshelf_core::ping());
            println!("noteshelf_core version={}", noteshelf_core::core_version());
            ExitCode::SUCCESS
        }
    }
}

async fn serve() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir)?;
    info!(
        "event=config_loaded module=cli status=ok environment={} db_mode={} bind={} dependency_path={}",
        config.environment,
        config.database.mode(),
        config.bind_addr,
        config.flags.dependency_path()
    );

    let conn = open_location(&config.database)?;
    let state = AppState::new(conn, config.flags);
    HttpServer::new(state, config.bind_addr).start().await?;
    Ok(())
}
