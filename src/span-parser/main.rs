mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use stopwatch::Stopwatch;
use anyhow::Result;
use tracing::{error, info, warn};
use common::config::TagConfig;
use common::database::{DatabaseSettings, PostgresSink};
use common::export::CsvSink;
use common::parser::SpanParser;
use common::record::SpanRecord;
use common::sink::RecordSink;
use common::{read_feed, PathDisplay};
use crate::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "span-parser", about = "Flattens a SPAN risk-parameter file and stores one row per contract or option")]
struct Arguments {
	/// SPAN file to load
	span_file: PathBuf,
	/// Database configuration with a [database] section
	#[arg(long, default_value = "config/db-config.ini")]
	db_config: PathBuf,
	/// Tag vocabulary of the feed
	#[arg(long, default_value = "config/tags-config.ini")]
	tags_config: PathBuf,
	/// Write the records to this .csv file instead of the database
	#[arg(long)]
	csv: Option<PathBuf>,
	#[arg(long, default_value = "app.log")]
	log_file: PathBuf
}

#[tokio::main]
async fn main() -> ExitCode {
	let arguments = Arguments::parse();
	if let Err(error) = init_logging(&arguments.log_file) {
		eprintln!("{error:#}");
		return ExitCode::FAILURE;
	}
	let stopwatch = Stopwatch::start_new();
	info!("Starting application");
	match run(&arguments).await {
		Ok(()) => {
			info!("Total time taken to process: {:.3} sec", stopwatch.elapsed_ms() as f64 / 1000.0);
			ExitCode::SUCCESS
		},
		Err(error) => {
			error!("{error:#}");
			info!("Time taken before failure: {:.3} sec", stopwatch.elapsed_ms() as f64 / 1000.0);
			ExitCode::FAILURE
		}
	}
}

async fn run(arguments: &Arguments) -> Result<()> {
	let config = TagConfig::load(arguments.tags_config.to_string())?;
	info!("Tag configuration loaded from \"{}\"", arguments.tags_config.to_string());
	let content = read_feed(&arguments.span_file)?;
	info!("SPAN file \"{}\" read ({} bytes)", arguments.span_file.to_string(), content.len());
	let parser = SpanParser::new(&config)?;
	let feed = parser.parse_document(content.as_str());
	info!("Parsed {} blocks into {} records", feed.blocks, feed.records.len());
	if feed.unrecognized > 0 {
		warn!("Skipped {} blocks without a recognized portfolio tag", feed.unrecognized);
	}
	let written = match &arguments.csv {
		Some(csv_path) => {
			let mut sink = CsvSink::new(csv_path.clone());
			write_records(&mut sink, &feed.records).await?
		},
		None => {
			let settings = DatabaseSettings::load(arguments.db_config.to_string())?;
			info!("Database connection: {}", settings.connection_string());
			let mut sink = PostgresSink::connect(settings).await?;
			info!("Connected to database successfully");
			let written = write_records(&mut sink, &feed.records).await;
			sink.close().await;
			written?
		}
	};
	info!("Span records inserted successfully ({written} rows)");
	info!("{}", feed.counts);
	Ok(())
}

async fn write_records(sink: &mut impl RecordSink, records: &[SpanRecord]) -> Result<usize> {
	info!("Writing {} records to {}", records.len(), sink.describe());
	sink.write(records).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn configuration_paths_have_defaults() {
		let arguments = Arguments::try_parse_from(["span-parser", "feed.spn"]).unwrap();
		assert_eq!(arguments.span_file, PathBuf::from("feed.spn"));
		assert_eq!(arguments.db_config, PathBuf::from("config/db-config.ini"));
		assert_eq!(arguments.tags_config, PathBuf::from("config/tags-config.ini"));
		assert_eq!(arguments.csv, None);
	}

	#[test]
	fn configuration_paths_can_be_overridden() {
		let arguments = Arguments::try_parse_from([
			"span-parser",
			"feed.spn",
			"--db-config",
			"/etc/span/db.ini",
			"--tags-config",
			"tags.ini",
			"--csv",
			"out.csv"
		]).unwrap();
		assert_eq!(arguments.db_config, PathBuf::from("/etc/span/db.ini"));
		assert_eq!(arguments.tags_config, PathBuf::from("tags.ini"));
		assert_eq!(arguments.csv, Some(PathBuf::from("out.csv")));
	}
}
