use std::fmt::{Display, Formatter};
use crate::config::RiskArrayTags;
use crate::numeric::{to_integer, to_real};
use crate::tag::{close_tag, extract_tag, open_tag};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RiskArray {
	pub r: i32,
	pub a: Vec<f64>,
	pub d: f64
}

fn find_region<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
	let open = open_tag(tag);
	let close = close_tag(tag);
	let start = text.find(open.as_str())?;
	let content_start = start + open.len();
	let length = text[content_start..].find(close.as_str())?;
	let end = content_start + length + close.len();
	Some(&text[start..end])
}

pub fn extract_risk_array(text: &str, tags: &RiskArrayTags) -> RiskArray {
	let Some(region) = find_region(text, &tags.array) else {
		return RiskArray::default();
	};
	let r = to_integer(extract_tag(region, &tags.r), 0);
	let d = to_real(extract_tag(region, &tags.d), 0.0);
	let open = open_tag(&tags.a);
	let close = close_tag(&tags.a);
	let mut a = Vec::new();
	let mut position = 0;
	while let Some(offset) = region[position..].find(open.as_str()) {
		let value_start = position + offset + open.len();
		// An element without a closing tag truncates the list
		let Some(length) = region[value_start..].find(close.as_str()) else {
			break;
		};
		let value = &region[value_start..value_start + length];
		a.push(to_real(value, 0.0));
		position = value_start + length + close.len();
	}
	RiskArray {
		r,
		a,
		d
	}
}

// Persisted as "r,a1,a2,...,an,d"
impl Display for RiskArray {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(formatter, "{}", self.r)?;
		for value in &self.a {
			write!(formatter, ",{value}")?;
		}
		write!(formatter, ",{}", self.d)
	}
}
