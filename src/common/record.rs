use std::fmt::Formatter;
use serde::Serialize;
use strum_macros::Display;
use crate::risk::RiskArray;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub enum SegmentKind {
	#[default]
	#[strum(serialize = "phypf")]
	Physical,
	#[strum(serialize = "futpf")]
	Futures,
	#[strum(serialize = "oofpf")]
	OptionOnFutures
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanRecord {
	pub segment: SegmentKind,
	pub pf_id: i32,
	pub pf_code: String,
	pub currency: String,
	pub cvf: f64,
	pub svf: f64,
	pub value_meth: String,
	pub price_meth: String,
	pub setl_meth: String,
	pub contract_id: i32,
	pub expiry: String,
	pub volatility: f64,
	pub settle_date: String,
	pub intra_rate: f64,
	pub price_scan: f64,
	pub vol_scan: f64,
	pub opt_contract_id: i32,
	pub option_type: String,
	pub strike_price: f64,
	pub option_value: f64,
	pub risk_array: RiskArray
}

pub const SPAN_ROW_COLUMNS: [&str; 21] = [
	"segment",
	"pf_id",
	"pf_code",
	"currency",
	"cvf",
	"svf",
	"value_meth",
	"price_meth",
	"setl_meth",
	"contract_id",
	"expiry",
	"volatility",
	"settle_date",
	"intra_rate",
	"price_scan",
	"vol_scan",
	"opt_contract_id",
	"option_type",
	"strike_price",
	"option_value",
	"risk_array"
];

/*
Flat projection of a record as it is stored, one field per column of SPAN_ROW_COLUMNS in the same order.
The risk array is serialized as "r,a1,...,an,d".
*/
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpanRow {
	pub segment: String,
	pub pf_id: i32,
	pub pf_code: String,
	pub currency: String,
	pub cvf: f64,
	pub svf: f64,
	pub value_meth: String,
	pub price_meth: String,
	pub setl_meth: String,
	pub contract_id: i32,
	pub expiry: String,
	pub volatility: f64,
	pub settle_date: String,
	pub intra_rate: f64,
	pub price_scan: f64,
	pub vol_scan: f64,
	pub opt_contract_id: i32,
	pub option_type: String,
	pub strike_price: f64,
	pub option_value: f64,
	pub risk_array: String
}

impl From<&SpanRecord> for SpanRow {
	fn from(record: &SpanRecord) -> SpanRow {
		SpanRow {
			segment: record.segment.to_string(),
			pf_id: record.pf_id,
			pf_code: record.pf_code.clone(),
			currency: record.currency.clone(),
			cvf: record.cvf,
			svf: record.svf,
			value_meth: record.value_meth.clone(),
			price_meth: record.price_meth.clone(),
			setl_meth: record.setl_meth.clone(),
			contract_id: record.contract_id,
			expiry: record.expiry.clone(),
			volatility: record.volatility,
			settle_date: record.settle_date.clone(),
			intra_rate: record.intra_rate,
			price_scan: record.price_scan,
			vol_scan: record.vol_scan,
			opt_contract_id: record.opt_contract_id,
			option_type: record.option_type.clone(),
			strike_price: record.strike_price,
			option_value: record.option_value,
			risk_array: record.risk_array.to_string()
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordCounts {
	pub physical: usize,
	pub futures: usize,
	pub options: usize
}

impl RecordCounts {
	pub fn add(&mut self, segment: SegmentKind) {
		match segment {
			SegmentKind::Physical => self.physical += 1,
			SegmentKind::Futures => self.futures += 1,
			SegmentKind::OptionOnFutures => self.options += 1
		}
	}

	pub fn total(&self) -> usize {
		self.physical + self.futures + self.options
	}
}

impl std::fmt::Display for RecordCounts {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(formatter, "phyCounter={}, futCounter={}, optCounter={}", self.physical, self.futures, self.options)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn segment_names_match_stored_values() {
		assert_eq!(SegmentKind::Physical.to_string(), "phypf");
		assert_eq!(SegmentKind::Futures.to_string(), "futpf");
		assert_eq!(SegmentKind::OptionOnFutures.to_string(), "oofpf");
	}

	#[test]
	fn row_flattens_record() {
		let record = SpanRecord {
			segment: SegmentKind::OptionOnFutures,
			pf_id: 12,
			pf_code: "ES".to_string(),
			svf: 50.0,
			opt_contract_id: 4,
			option_type: "C".to_string(),
			risk_array: RiskArray {
				r: 1,
				a: vec![10.0, 20.0],
				d: 0.5
			},
			..SpanRecord::default()
		};
		let row = SpanRow::from(&record);
		assert_eq!(row.segment, "oofpf");
		assert_eq!(row.pf_id, 12);
		assert_eq!(row.svf, 50.0);
		assert_eq!(row.opt_contract_id, 4);
		assert_eq!(row.risk_array, "1,10,20,0.5");
	}

	#[test]
	fn counts_by_segment() {
		let mut counts = RecordCounts::default();
		counts.add(SegmentKind::Physical);
		counts.add(SegmentKind::OptionOnFutures);
		counts.add(SegmentKind::OptionOnFutures);
		counts.add(SegmentKind::Futures);
		assert_eq!(counts.total(), 4);
		assert_eq!(counts.to_string(), "phyCounter=1, futCounter=1, optCounter=2");
	}
}
