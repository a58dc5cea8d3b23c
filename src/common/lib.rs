pub mod config;
pub mod database;
pub mod export;
pub mod numeric;
pub mod parser;
pub mod record;
pub mod risk;
pub mod sink;
pub mod tag;

use std::{fs, path::PathBuf};
use configparser::ini::{Ini, IniDefault};
use anyhow::{anyhow, Context, Result};

pub trait PathDisplay {
	fn to_string(&self) -> &str;
}

// Only whole lines starting with '#' or ';' are comments, values such as passwords keep both characters
pub fn new_ini() -> Ini {
	let mut defaults: IniDefault = Ini::new().defaults();
	defaults.enable_inline_comments = false;
	Ini::new_from_defaults(defaults)
}

pub fn get_ini(path: &str) -> Result<Ini> {
	let mut config = new_ini();
	config.load(path)
		.map_err(|error| anyhow!(error))
		.with_context(|| format!("Failed to read configuration file \"{path}\""))?;
	Ok(config)
}

pub fn read_feed(path: &PathBuf) -> Result<String> {
	let content = fs::read_to_string(path)
		.with_context(|| anyhow!("Unable to read SPAN file \"{}\"", path.to_string()))?;
	Ok(content)
}

impl PathDisplay for PathBuf {
	fn to_string(&self) -> &str {
		match self.to_str() {
			Some(string) => string,
			None => "?"
		}
	}
}
