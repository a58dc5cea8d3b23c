/*
Tolerant number parsing for feed values.
Missing tags arrive here as empty strings and malformed content is not an error either, both collapse into the default supplied by the caller.
Non-finite reals (nan, inf, infinity) count as malformed.
*/
pub fn to_real(text: &str, default: f64) -> f64 {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return default;
	}
	trimmed.parse::<f64>()
		.ok()
		.filter(|x| x.is_finite())
		.unwrap_or(default)
}

pub fn to_integer(text: &str, default: i32) -> i32 {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return default;
	}
	trimmed.parse::<i32>().unwrap_or(default)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_input_returns_default() {
		assert_eq!(to_real("", 0.0), 0.0);
		assert_eq!(to_real("", 2.5), 2.5);
		assert_eq!(to_integer("", 0), 0);
		assert_eq!(to_integer("   ", -1), -1);
	}

	#[test]
	fn parses_numbers_with_surrounding_whitespace() {
		assert_eq!(to_real(" 0.25\n", 0.0), 0.25);
		assert_eq!(to_real("-1.5E2", 0.0), -150.0);
		assert_eq!(to_integer("\t42 ", 0), 42);
		assert_eq!(to_integer("-7", 0), -7);
	}

	#[test]
	fn malformed_input_returns_default() {
		assert_eq!(to_real("abc", 1.0), 1.0);
		assert_eq!(to_real("1.2.3", 0.0), 0.0);
		assert_eq!(to_integer("7.5", 0), 0);
		assert_eq!(to_integer("99999999999", 3), 3);
	}

	#[test]
	fn non_finite_reals_return_default() {
		for text in ["nan", "NaN", "inf", "-inf", "+Infinity", "1e400"] {
			assert_eq!(to_real(text, 0.5), 0.5, "{text}");
		}
		assert_eq!(to_real("1e300", 0.0), 1e300);
	}
}
