use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};
use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use common::PathDisplay;

// Appends to the log file and mirrors everything to stderr, RUST_LOG overrides the default level
pub fn init_logging(log_path: &PathBuf) -> Result<()> {
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(log_path)
		.with_context(|| anyhow!("Unable to open log file \"{}\"", log_path.to_string()))?;
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer()
			.with_ansi(false)
			.with_target(false)
			.with_writer(Mutex::new(file)))
		.with(fmt::layer()
			.with_target(false)
			.with_writer(std::io::stderr))
		.try_init()
		.map_err(|error| anyhow!(error))
		.with_context(|| "Unable to initialize logging")?;
	Ok(())
}
