//! WOS - window-os desktop background host
//!
//! Loads ~/.wos/config.toml, attaches the window-os element and drives its
//! background at the configured frame rate, applying config edits live.

mod runner;
mod shutdown;

use anyhow::{Context, Result};
use wos_config::{Config, ConfigWatcher};

use runner::Runner;
use shutdown::StopFlag;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,wos=info")).init();
    log::info!("WOS starting");

    let config = Config::load().context("Failed to load configuration")?;

    let watcher = match ConfigWatcher::new() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            log::warn!("Config hot-reload disabled: {}", e);
            None
        }
    };

    let stop = StopFlag::new();
    if let Err(e) = shutdown::listen(stop.clone()) {
        log::warn!("Signal handling disabled: {:#}", e);
    }

    let mut runner = Runner::new(&config);
    runner.attach(&config);
    runner.run(watcher, &stop);
    runner.shutdown();

    log::info!("WOS stopped");
    Ok(())
}
