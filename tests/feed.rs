use std::path::PathBuf;
use pretty_assertions::assert_eq;
use common::config::TagConfig;
use common::export::CsvSink;
use common::parser::SpanParser;
use common::read_feed;
use common::record::{RecordCounts, SegmentKind, SpanRecord};
use common::risk::RiskArray;
use common::sink::RecordSink;

fn load_sample() -> (TagConfig, String) {
	let config = TagConfig::load("config/tags-config.ini").unwrap();
	let content = read_feed(&PathBuf::from("tests/data/sample.spn")).unwrap();
	(config, content)
}

#[test]
fn shipped_configuration_matches_standard_vocabulary() {
	let (config, _) = load_sample();
	assert_eq!(config, TagConfig::standard());
}

#[test]
fn sample_feed_is_flattened_in_document_order() {
	let (config, content) = load_sample();
	let parser = SpanParser::new(&config).unwrap();
	let feed = parser.parse_document(content.as_str());
	assert_eq!(feed.blocks, 3);
	assert_eq!(feed.unrecognized, 0);
	assert_eq!(feed.counts, RecordCounts {
		physical: 1,
		futures: 2,
		options: 3
	});
	let segments: Vec<SegmentKind> = feed.records.iter().map(|x| x.segment).collect();
	assert_eq!(segments, vec![
		SegmentKind::Physical,
		SegmentKind::Futures,
		SegmentKind::Futures,
		SegmentKind::OptionOnFutures,
		SegmentKind::OptionOnFutures,
		SegmentKind::OptionOnFutures
	]);
	assert_eq!(feed.records[0], SpanRecord {
		segment: SegmentKind::Physical,
		pf_id: 1,
		pf_code: "GOLD".to_string(),
		currency: "INR".to_string(),
		cvf: 100.0,
		value_meth: "FUT".to_string(),
		price_meth: "STD".to_string(),
		setl_meth: "FUT".to_string(),
		contract_id: 7,
		expiry: "20251231".to_string(),
		volatility: 0.18,
		price_scan: 4275.0,
		vol_scan: 0.04,
		risk_array: RiskArray {
			r: 1,
			a: vec![10.0, 20.0],
			d: 0.5
		},
		..SpanRecord::default()
	});
}

#[test]
fn futures_and_options_carry_their_own_fields() {
	let (config, content) = load_sample();
	let parser = SpanParser::new(&config).unwrap();
	let records = parser.parse_document(content.as_str()).records;
	let futures = &records[1..3];
	assert_eq!(futures[0].contract_id, 11);
	assert_eq!(futures[0].intra_rate, 0.065);
	assert_eq!(futures[0].risk_array.to_string(), "1,-450.5,450.5,-901,0");
	assert_eq!(futures[1].contract_id, 12);
	assert_eq!(futures[1].settle_date, "20250424");
	assert_eq!(futures[1].pf_code, "NIFTY");
	let options = &records[3..];
	assert_eq!(options[0].contract_id, 31);
	assert_eq!(options[0].opt_contract_id, 301);
	assert_eq!(options[0].option_type, "C");
	assert_eq!(options[0].option_value, 512.25);
	assert_eq!(options[1].contract_id, 31);
	assert_eq!(options[1].opt_contract_id, 302);
	assert_eq!(options[1].risk_array.d, -0.48);
	assert_eq!(options[2].contract_id, 32);
	assert_eq!(options[2].expiry, "20250424");
	assert_eq!(options[2].intra_rate, 0.066);
	assert_eq!(options[2].strike_price, 22500.0);
	for option in options {
		assert_eq!(option.svf, 1.0);
		assert_eq!(option.value_meth, "PREM");
	}
}

#[tokio::test]
async fn sample_feed_exports_to_csv() {
	let (config, content) = load_sample();
	let parser = SpanParser::new(&config).unwrap();
	let feed = parser.parse_document(content.as_str());
	let directory = tempfile::tempdir().unwrap();
	let path = directory.path().join("span.csv");
	let mut sink = CsvSink::new(path.clone());
	let written = sink.write(&feed.records).await.unwrap();
	assert_eq!(written, feed.counts.total());
	let mut reader = csv::Reader::from_path(&path).unwrap();
	let risk_arrays: Vec<String> = reader.records()
		.map(|x| x.unwrap()[20].to_string())
		.collect();
	assert_eq!(risk_arrays, vec![
		"1,10,20,0.5",
		"1,-450.5,450.5,-901,0",
		"1,-452.5,452.5,0",
		"1,-120,130,0.52",
		"1,110,-100,-0.48",
		"1,-90,0.41"
	]);
}
