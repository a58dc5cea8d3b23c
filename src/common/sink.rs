use async_trait::async_trait;
use anyhow::Result;
use crate::record::SpanRecord;

// Destination of a fully parsed feed, either all records are stored or the run fails
#[async_trait]
pub trait RecordSink {
	fn describe(&self) -> String;

	async fn write(&mut self, records: &[SpanRecord]) -> Result<usize>;
}
