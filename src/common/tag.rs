use regex::Regex;
use anyhow::{Context, Result};

pub fn open_tag(tag: &str) -> String {
	format!("<{tag}>")
}

pub fn close_tag(tag: &str) -> String {
	format!("</{tag}>")
}

pub fn has_open_tag(text: &str, tag: &str) -> bool {
	text.contains(open_tag(tag).as_str())
}

/*
Returns the text between the first <tag> and the first </tag> following it, or an empty string.
There is no notion of nesting: if a child element reuses the tag name of one of its ancestors, whichever open tag comes first wins.
*/
pub fn extract_tag<'a>(text: &'a str, tag: &str) -> &'a str {
	let open = open_tag(tag);
	let close = close_tag(tag);
	let Some(start) = text.find(open.as_str()) else {
		return "";
	};
	let content_start = start + open.len();
	match text[content_start..].find(close.as_str()) {
		Some(length) => &text[content_start..content_start + length],
		None => ""
	}
}

// Whole <tag>...</tag> regions including the enclosing tags, non-greedy and across line breaks
pub struct RegionPattern {
	tag: String,
	regex: Regex
}

impl RegionPattern {
	pub fn new(tag: &str) -> Result<RegionPattern> {
		let escaped = regex::escape(tag);
		let pattern = format!("(?s)<{escaped}>.*?</{escaped}>");
		let regex = Regex::new(pattern.as_str())
			.with_context(|| format!("Unable to build region pattern for tag \"{tag}\""))?;
		let region_pattern = RegionPattern {
			tag: tag.to_string(),
			regex
		};
		Ok(region_pattern)
	}

	pub fn tag(&self) -> &str {
		self.tag.as_str()
	}

	pub fn regions<'t>(&self, text: &'t str) -> Vec<&'t str> {
		self.regex
			.find_iter(text)
			.map(|x| x.as_str())
			.collect()
	}

	pub fn first<'t>(&self, text: &'t str) -> &'t str {
		match self.regex.find(text) {
			Some(region) => region.as_str(),
			None => ""
		}
	}
}
