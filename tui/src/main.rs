use std::fs::File;

use anyhow::{anyhow, Context, Result};
use env_logger::{Env, Target};
use safesip::InferencePipeline;

mod app;
mod config;
mod ui;

use config::{config_path, json};

fn main() -> Result<()> {
    let path = config_path();
    let config = json::load_config(&path).map_err(|e| anyhow!("{}: {e}", path.display()))?;

    let log_file = File::create(&config.log_path)
        .with_context(|| format!("cannot create log file {}", config.log_path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(log_file)))
        .init();

    log::info!("starting with {config:?}");

    let pipeline = InferencePipeline::load(&config.model_path, &config.scaler_path);
    app::run::run(&pipeline)
}
