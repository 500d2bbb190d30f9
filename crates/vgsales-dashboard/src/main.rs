//! Main entry point for the video game sales dashboard.

use anyhow::Context;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use vgsales_common::init_logging;
use vgsales_config::ConfigLoader;

fn main() -> anyhow::Result<()> {
    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let (config, report) = ConfigLoader::load_with_report(config_path.as_deref())
        .context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    report.log();
    info!("Starting vgsales dashboard");

    match vgsales_dashboard::run(&config) {
        Ok(manifest) => {
            info!(
                "Wrote {} tabs to {}",
                manifest.tabs.len(),
                config.output.directory.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Dashboard export failed: {}", e);
            Err(e.into())
        }
    }
}
