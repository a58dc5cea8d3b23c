use regex::Regex;
use anyhow::{Context, Result};
use tracing::{debug, trace};
use crate::config::TagConfig;
use crate::numeric::{to_integer, to_real};
use crate::record::{RecordCounts, SegmentKind, SpanRecord};
use crate::risk::extract_risk_array;
use crate::tag::{extract_tag, has_open_tag, RegionPattern};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
	Physical,
	Futures,
	OptionOnFutures,
	Unrecognized
}

impl BlockKind {
	pub fn segment(&self) -> Option<SegmentKind> {
		match self {
			BlockKind::Physical => Some(SegmentKind::Physical),
			BlockKind::Futures => Some(SegmentKind::Futures),
			BlockKind::OptionOnFutures => Some(SegmentKind::OptionOnFutures),
			BlockKind::Unrecognized => None
		}
	}
}

#[derive(Debug, Default)]
pub struct ParsedFeed {
	pub records: Vec<SpanRecord>,
	pub counts: RecordCounts,
	pub blocks: usize,
	pub unrecognized: usize
}

pub struct SpanParser<'a> {
	config: &'a TagConfig,
	block_regex: Regex,
	physical: RegionPattern,
	futures: RegionPattern,
	series: RegionPattern,
	option: RegionPattern
}

impl<'a> SpanParser<'a> {
	pub fn new(config: &'a TagConfig) -> Result<SpanParser<'a>> {
		let blocks = &config.blocks;
		let alternatives: Vec<String> = [&blocks.physical, &blocks.futures, &blocks.option]
			.iter()
			.map(|tag| {
				let escaped = regex::escape(tag);
				format!("<{escaped}>.*?</{escaped}>")
			})
			.collect();
		let pattern = format!("(?s){}", alternatives.join("|"));
		let block_regex = Regex::new(pattern.as_str())
			.with_context(|| "Unable to build block pattern from tag configuration")?;
		let parser = SpanParser {
			config,
			block_regex,
			physical: RegionPattern::new(&config.contract.physical)?,
			futures: RegionPattern::new(&config.contract.futures)?,
			series: RegionPattern::new(&config.option.series)?,
			option: RegionPattern::new(&config.option.option)?
		};
		Ok(parser)
	}

	pub fn blocks<'t>(&self, content: &'t str) -> Vec<&'t str> {
		self.block_regex
			.find_iter(content)
			.map(|x| x.as_str())
			.collect()
	}

	pub fn parse_document(&self, content: &str) -> ParsedFeed {
		let mut feed = ParsedFeed::default();
		for block in self.blocks(content) {
			let kind = self.parse_block(block, &mut feed.records, &mut feed.counts);
			feed.blocks += 1;
			if kind == BlockKind::Unrecognized {
				feed.unrecognized += 1;
			}
		}
		feed
	}

	pub fn classify(&self, block: &str) -> BlockKind {
		let blocks = &self.config.blocks;
		if has_open_tag(block, &blocks.physical) {
			BlockKind::Physical
		} else if has_open_tag(block, &blocks.futures) {
			BlockKind::Futures
		} else if has_open_tag(block, &blocks.option) {
			BlockKind::OptionOnFutures
		} else {
			BlockKind::Unrecognized
		}
	}

	pub fn parse_block(&self, block: &str, records: &mut Vec<SpanRecord>, counts: &mut RecordCounts) -> BlockKind {
		let kind = self.classify(block);
		let Some(segment) = kind.segment() else {
			debug!("Skipping block without a recognized portfolio tag ({} bytes)", block.len());
			return kind;
		};
		let template = self.root_record(block, segment);
		let emitted = records.len();
		match kind {
			BlockKind::Physical => self.parse_physical(block, template, records),
			BlockKind::Futures => self.parse_futures(block, template, records),
			BlockKind::OptionOnFutures => self.parse_options(block, template, records),
			BlockKind::Unrecognized => {}
		}
		for _ in emitted..records.len() {
			counts.add(segment);
		}
		trace!("Parsed {} block into {} records", segment, records.len() - emitted);
		kind
	}

	fn root_record(&self, block: &str, segment: SegmentKind) -> SpanRecord {
		let tags = &self.config.root;
		SpanRecord {
			segment,
			pf_id: to_integer(extract_tag(block, &tags.pf_id), 0),
			pf_code: extract_tag(block, &tags.pf_code).to_string(),
			currency: extract_tag(block, &tags.currency).to_string(),
			cvf: to_real(extract_tag(block, &tags.cvf), 0.0),
			value_meth: extract_tag(block, &tags.value_meth).to_string(),
			price_meth: extract_tag(block, &tags.price_meth).to_string(),
			setl_meth: extract_tag(block, &tags.setl_meth).to_string(),
			..SpanRecord::default()
		}
	}

	fn parse_physical(&self, block: &str, template: SpanRecord, records: &mut Vec<SpanRecord>) {
		let tags = &self.config.contract;
		// A missing contract region leaves every contract field at its default
		let physical = self.physical.first(block);
		if physical.is_empty() {
			debug!("Physical block \"{}\" has no <{}> region", template.pf_code, self.physical.tag());
		}
		let record = SpanRecord {
			contract_id: to_integer(extract_tag(physical, &tags.contract_id), 0),
			expiry: extract_tag(physical, &tags.expiry).to_string(),
			volatility: to_real(extract_tag(physical, &tags.volatility), 0.0),
			price_scan: to_real(extract_tag(physical, &tags.price_scan), 0.0),
			vol_scan: to_real(extract_tag(physical, &tags.vol_scan), 0.0),
			risk_array: extract_risk_array(physical, &self.config.risk_array),
			..template
		};
		records.push(record);
	}

	fn parse_futures(&self, block: &str, template: SpanRecord, records: &mut Vec<SpanRecord>) {
		let tags = &self.config.contract;
		let interest = &self.config.interest;
		for futures in self.futures.regions(block) {
			let rate = extract_tag(futures, &interest.rate);
			let record = SpanRecord {
				contract_id: to_integer(extract_tag(futures, &tags.contract_id), 0),
				expiry: extract_tag(futures, &tags.expiry).to_string(),
				volatility: to_real(extract_tag(futures, &tags.volatility), 0.0),
				settle_date: extract_tag(futures, &tags.settle_date).to_string(),
				intra_rate: to_real(extract_tag(rate, &interest.value), 0.0),
				price_scan: to_real(extract_tag(futures, &tags.price_scan), 0.0),
				vol_scan: to_real(extract_tag(futures, &tags.vol_scan), 0.0),
				risk_array: extract_risk_array(futures, &self.config.risk_array),
				..template.clone()
			};
			records.push(record);
		}
	}

	/*
	Option-on-futures blocks nest twice: series carry the contract-level fields, options within a series carry their own.
	The series interest rate is read with a single lookup of the value tag, unlike futures where it sits inside the rate element.
	*/
	fn parse_options(&self, block: &str, template: SpanRecord, records: &mut Vec<SpanRecord>) {
		let tags = &self.config.contract;
		let interest = &self.config.interest;
		let option_tags = &self.config.option;
		let block_template = SpanRecord {
			svf: to_real(extract_tag(block, &self.config.root.svf), 0.0),
			..template
		};
		for series in self.series.regions(block) {
			let series_template = SpanRecord {
				contract_id: to_integer(extract_tag(series, &tags.contract_id), 0),
				expiry: extract_tag(series, &tags.expiry).to_string(),
				settle_date: extract_tag(series, &tags.settle_date).to_string(),
				volatility: to_real(extract_tag(series, &tags.volatility), 0.0),
				intra_rate: to_real(extract_tag(series, &interest.value), 0.0),
				price_scan: to_real(extract_tag(series, &tags.price_scan), 0.0),
				vol_scan: to_real(extract_tag(series, &tags.vol_scan), 0.0),
				..block_template.clone()
			};
			for option in self.option.regions(series) {
				let record = SpanRecord {
					opt_contract_id: to_integer(extract_tag(option, &option_tags.contract_id), 0),
					option_type: extract_tag(option, &option_tags.option_type).to_string(),
					strike_price: to_real(extract_tag(option, &option_tags.strike_price), 0.0),
					option_value: to_real(extract_tag(option, &option_tags.option_value), 0.0),
					risk_array: extract_risk_array(option, &self.config.risk_array),
					..series_template.clone()
				};
				records.push(record);
			}
		}
	}
}
