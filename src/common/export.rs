use std::path::PathBuf;
use async_trait::async_trait;
use anyhow::{anyhow, Context, Result};
use crate::record::{SpanRecord, SpanRow};
use crate::sink::RecordSink;
use crate::PathDisplay;

pub struct CsvSink {
	path: PathBuf
}

impl CsvSink {
	pub fn new(path: PathBuf) -> CsvSink {
		CsvSink {
			path
		}
	}

	pub fn write_rows(&self, records: &[SpanRecord]) -> Result<usize> {
		let path_string = self.path.to_string();
		let mut writer = csv::Writer::from_path(&self.path)
			.with_context(|| anyhow!("Unable to create .csv file \"{path_string}\""))?;
		for record in records {
			writer.serialize(SpanRow::from(record))
				.with_context(|| anyhow!("Failed to write record to \"{path_string}\""))?;
		}
		writer.flush()
			.with_context(|| anyhow!("Failed to flush \"{path_string}\""))?;
		Ok(records.len())
	}
}

#[async_trait]
impl RecordSink for CsvSink {
	fn describe(&self) -> String {
		format!("CSV file \"{}\"", self.path.to_string())
	}

	async fn write(&mut self, records: &[SpanRecord]) -> Result<usize> {
		self.write_rows(records)
	}
}
