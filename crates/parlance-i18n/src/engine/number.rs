//! CLDR number patterns.
//!
//! A pattern such as `#,##0.###` or `¤#,##0.00;(¤#,##0.00)` is compiled into
//! a [`NumberPattern`] and applied with a locale's [`NumberSymbols`].

use serde_json::Value;

use crate::error::{I18nError, Result};
use crate::number::{NumberFormatterOptions, NumberStyle, RoundingMode};

/// Localized number symbols (`symbols-numberSystem-*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumberSymbols {
	pub decimal: String,
	pub group: String,
	pub percent_sign: String,
	pub per_mille: String,
	pub minus_sign: String,
	pub plus_sign: String,
	pub exponential: String,
	pub infinity: String,
	pub nan: String,
}

impl Default for NumberSymbols {
	fn default() -> Self {
		Self {
			decimal: ".".to_string(),
			group: ",".to_string(),
			percent_sign: "%".to_string(),
			per_mille: "‰".to_string(),
			minus_sign: "-".to_string(),
			plus_sign: "+".to_string(),
			exponential: "E".to_string(),
			infinity: "∞".to_string(),
			nan: "NaN".to_string(),
		}
	}
}

impl NumberSymbols {
	pub(crate) fn from_cldr(symbols: &Value) -> Self {
		let defaults = Self::default();
		let get = |key: &str, fallback: String| {
			symbols
				.get(key)
				.and_then(Value::as_str)
				.map(str::to_string)
				.unwrap_or(fallback)
		};
		Self {
			decimal: get("decimal", defaults.decimal),
			group: get("group", defaults.group),
			percent_sign: get("percentSign", defaults.percent_sign),
			per_mille: get("perMille", defaults.per_mille),
			minus_sign: get("minusSign", defaults.minus_sign),
			plus_sign: get("plusSign", defaults.plus_sign),
			exponential: get("exponential", defaults.exponential),
			infinity: get("infinity", defaults.infinity),
			nan: get("nan", defaults.nan),
		}
	}
}

/// One affix element of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Affix {
	Literal(String),
	Percent,
	PerMille,
	Currency,
	Minus,
	Plus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Affixes {
	prefix: Vec<Affix>,
	suffix: Vec<Affix>,
}

/// A compiled number pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumberPattern {
	positive: Affixes,
	negative: Option<Affixes>,
	pub min_integer: usize,
	pub min_fraction: usize,
	pub max_fraction: usize,
	primary_group: Option<usize>,
	secondary_group: Option<usize>,
	exponent_digits: Option<usize>,
}

impl NumberPattern {
	pub(crate) fn parse(pattern: &str) -> Result<Self> {
		let (positive, negative) = split_subpatterns(pattern);
		let (positive_affixes, body) = parse_subpattern(pattern, positive)?;
		let negative = match negative {
			Some(source) => Some(parse_subpattern(pattern, source)?.0),
			None => None,
		};

		let (mantissa, exponent) = match body.split_once('E') {
			Some((m, e)) => (m, Some(e.chars().filter(|c| *c == '0').count().max(1))),
			None => (body.as_str(), None),
		};
		let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

		let groups: Vec<&str> = integer.split(',').collect();
		let (primary_group, secondary_group) = match groups.len() {
			0 | 1 => (None, None),
			2 => (Some(groups[1].len()), None),
			n => (Some(groups[n - 1].len()), Some(groups[n - 2].len())),
		};

		Ok(Self {
			positive: positive_affixes,
			negative,
			min_integer: integer.chars().filter(|c| *c == '0').count(),
			min_fraction: fraction.chars().filter(|c| *c == '0').count(),
			max_fraction: fraction.chars().filter(|c| *c == '0' || *c == '#').count(),
			primary_group,
			secondary_group,
			exponent_digits: exponent,
		})
	}

	fn multiplier(&self) -> f64 {
		let affixes = self.positive.prefix.iter().chain(&self.positive.suffix);
		let mut multiplier = 1.0;
		for affix in affixes {
			match affix {
				Affix::Percent => multiplier = 100.0,
				Affix::PerMille => multiplier = 1000.0,
				_ => {}
			}
		}
		multiplier
	}
}

fn split_subpatterns(pattern: &str) -> (&str, Option<&str>) {
	let mut quoted = false;
	for (idx, c) in pattern.char_indices() {
		match c {
			'\'' => quoted = !quoted,
			';' if !quoted => return (&pattern[..idx], Some(&pattern[idx + 1..])),
			_ => {}
		}
	}
	(pattern, None)
}

fn parse_subpattern(pattern: &str, source: &str) -> Result<(Affixes, String)> {
	let is_body = |c: char| matches!(c, '#' | '0'..='9' | ',' | '.' | 'E' | '@');
	let mut prefix = Vec::new();
	let mut suffix = Vec::new();
	let mut body = String::new();
	let mut literal = String::new();
	let mut in_body = false;
	let mut seen_body = false;
	let mut quoted = false;
	let mut chars = source.chars().peekable();

	let flush = |literal: &mut String, target: &mut Vec<Affix>| {
		if !literal.is_empty() {
			target.push(Affix::Literal(std::mem::take(literal)));
		}
	};

	while let Some(c) = chars.next() {
		if quoted {
			if c == '\'' {
				if chars.peek() == Some(&'\'') {
					chars.next();
					literal.push('\'');
				} else {
					quoted = false;
				}
			} else {
				literal.push(c);
			}
			continue;
		}
		if (in_body || !seen_body) && is_body(c) && !(c == 'E' && !in_body) {
			if !in_body {
				flush(&mut literal, &mut prefix);
			}
			in_body = true;
			seen_body = true;
			body.push(c);
			continue;
		}
		let target = if seen_body { &mut suffix } else { &mut prefix };
		in_body = false;
		let special = match c {
			'\'' => {
				if chars.peek() == Some(&'\'') {
					chars.next();
					literal.push('\'');
				} else {
					quoted = true;
				}
				None
			}
			'%' => Some(Affix::Percent),
			'‰' => Some(Affix::PerMille),
			'¤' => {
				while chars.peek() == Some(&'¤') {
					chars.next();
				}
				Some(Affix::Currency)
			}
			'-' => Some(Affix::Minus),
			'+' => Some(Affix::Plus),
			other => {
				literal.push(other);
				None
			}
		};
		if let Some(affix) = special {
			flush(&mut literal, target);
			target.push(affix);
		}
	}
	if quoted {
		return Err(I18nError::invalid_pattern(pattern, "unterminated quote"));
	}
	flush(&mut literal, if seen_body { &mut suffix } else { &mut prefix });
	if body.is_empty() {
		return Err(I18nError::invalid_pattern(pattern, "no digits"));
	}
	Ok((Affixes { prefix, suffix }, body))
}

/// A pattern plus options, ready to format numbers.
#[derive(Debug, Clone)]
pub(crate) struct NumberFormat {
	pattern: NumberPattern,
	symbols: NumberSymbols,
	currency: Option<String>,
	min_integer: usize,
	min_fraction: usize,
	max_fraction: usize,
	rounding: RoundingMode,
	grouping: bool,
}

impl NumberFormat {
	pub(crate) fn new(
		pattern: NumberPattern,
		symbols: NumberSymbols,
		options: &NumberFormatterOptions,
	) -> Self {
		let (min_fraction, max_fraction) = fraction_digits(
			pattern.min_fraction,
			pattern.max_fraction,
			options.minimum_fraction_digits,
			options.maximum_fraction_digits,
		);
		Self {
			min_integer: options.minimum_integer_digits.unwrap_or(pattern.min_integer),
			min_fraction,
			max_fraction,
			rounding: options.round,
			grouping: options.use_grouping,
			currency: None,
			pattern,
			symbols,
		}
	}

	/// Substitutes `¤` with `display`.
	pub(crate) fn with_currency(mut self, display: impl Into<String>) -> Self {
		self.currency = Some(display.into());
		self
	}

	/// A format without locale data, using Latin symbols and the root
	/// patterns of each style.
	pub(crate) fn fallback(options: &NumberFormatterOptions) -> Self {
		let source = match options.style {
			NumberStyle::Decimal => "#,##0.###",
			NumberStyle::Percent => "#,##0%",
			NumberStyle::Scientific => "#E0",
		};
		let pattern = NumberPattern::parse(source).unwrap_or_else(|_| unreachable!());
		Self::new(pattern, NumberSymbols::default(), options)
	}

	pub(crate) fn format(&self, value: f64) -> String {
		let negative = value.is_sign_negative() && value != 0.0;
		let body = if value.is_nan() {
			self.symbols.nan.clone()
		} else if value.is_infinite() {
			self.symbols.infinity.clone()
		} else {
			self.format_digits(value.abs() * self.pattern.multiplier())
		};
		let is_zero = body.chars().all(|c| !c.is_ascii_digit() || c == '0');

		let (affixes, implicit_minus) = match (&self.pattern.negative, negative && !is_zero) {
			(Some(neg), true) => (neg, false),
			(None, true) => (&self.pattern.positive, true),
			(_, false) => (&self.pattern.positive, false),
		};

		let mut out = String::new();
		if implicit_minus {
			out.push_str(&self.symbols.minus_sign);
		}
		self.push_affix(&mut out, &affixes.prefix, true);
		out.push_str(&body);
		self.push_affix(&mut out, &affixes.suffix, false);
		out
	}

	fn push_affix(&self, out: &mut String, affix: &[Affix], is_prefix: bool) {
		for element in affix {
			match element {
				Affix::Literal(text) => out.push_str(text),
				Affix::Percent => out.push_str(&self.symbols.percent_sign),
				Affix::PerMille => out.push_str(&self.symbols.per_mille),
				Affix::Minus => out.push_str(&self.symbols.minus_sign),
				Affix::Plus => out.push_str(&self.symbols.plus_sign),
				Affix::Currency => {
					let display = self.currency.as_deref().unwrap_or_default();
					let alphabetic = display.chars().last().is_some_and(char::is_alphabetic);
					// Currency codes and names are separated from the digits.
					if !is_prefix && alphabetic && !out.ends_with([' ', '\u{a0}']) {
						out.push('\u{a0}');
					}
					out.push_str(display);
					if is_prefix && alphabetic {
						out.push('\u{a0}');
					}
				}
			}
		}
	}

	fn format_digits(&self, value: f64) -> String {
		if let Some(exponent_digits) = self.pattern.exponent_digits {
			return self.format_scientific(value, exponent_digits);
		}
		let rounded = round(value, self.max_fraction, self.rounding);
		let fixed = format!("{:.*}", self.max_fraction, rounded);
		let (integer, fraction) = fixed.split_once('.').unwrap_or((&fixed, ""));
		self.join_digits(integer, fraction)
	}

	fn format_scientific(&self, value: f64, exponent_digits: usize) -> String {
		let exponent = if value == 0.0 {
			0
		} else {
			value.log10().floor() as i32
		};
		let mantissa = round(value / 10f64.powi(exponent), self.max_fraction, self.rounding);
		// Rounding can carry the mantissa to 10.
		let (mantissa, exponent) = if mantissa >= 10.0 {
			(mantissa / 10.0, exponent + 1)
		} else {
			(mantissa, exponent)
		};
		let fixed = format!("{:.*}", self.max_fraction, mantissa);
		let (integer, fraction) = fixed.split_once('.').unwrap_or((&fixed, ""));
		let mut out = self.join_digits(integer, fraction);
		out.push_str(&self.symbols.exponential);
		if exponent < 0 {
			out.push_str(&self.symbols.minus_sign);
		}
		out.push_str(&format!("{:0width$}", exponent.unsigned_abs(), width = exponent_digits));
		out
	}

	fn join_digits(&self, integer: &str, fraction: &str) -> String {
		let mut integer = integer.trim_start_matches('0').to_string();
		while integer.len() < self.min_integer {
			integer.insert(0, '0');
		}

		let mut fraction = fraction.to_string();
		while fraction.len() > self.min_fraction && fraction.ends_with('0') {
			fraction.pop();
		}

		let mut out = if self.grouping {
			group_digits(
				&integer,
				self.pattern.primary_group,
				self.pattern.secondary_group,
				&self.symbols.group,
			)
		} else {
			integer
		};
		if !fraction.is_empty() {
			out.push_str(&self.symbols.decimal);
			out.push_str(&fraction);
		}
		if out.is_empty() {
			out.push('0');
		}
		out
	}

	/// Parses text written in this format back into a number.
	pub(crate) fn parse(&self, input: &str) -> Result<f64> {
		let symbols = &self.symbols;
		let trimmed = input.trim();
		if trimmed.is_empty() {
			return Err(I18nError::parse(input, "empty input"));
		}
		if trimmed == symbols.nan {
			return Ok(f64::NAN);
		}

		let lead_end = trimmed
			.find(|c: char| c.is_numeric())
			.unwrap_or(trimmed.len());
		let lead = &trimmed[..lead_end];
		let negative = lead.contains(&symbols.minus_sign)
			|| lead.contains('-')
			|| (trimmed.starts_with('(') && trimmed.ends_with(')'));
		let mut multiplier = 1.0;
		if trimmed.contains(&symbols.percent_sign) {
			multiplier = 100.0;
		} else if trimmed.contains(&symbols.per_mille) {
			multiplier = 1000.0;
		}

		let magnitude = if trimmed.contains(&symbols.infinity) {
			f64::INFINITY
		} else {
			let mut canonical = String::new();
			let mut rest = trimmed;
			while let Some(c) = rest.chars().next() {
				if !symbols.group.is_empty() && rest.starts_with(&symbols.group) {
					rest = &rest[symbols.group.len()..];
				} else if rest.starts_with(&symbols.decimal) {
					canonical.push('.');
					rest = &rest[symbols.decimal.len()..];
				} else if rest.starts_with(&symbols.exponential) && !canonical.is_empty() {
					canonical.push('e');
					rest = &rest[symbols.exponential.len()..];
					if rest.starts_with(&symbols.minus_sign) {
						canonical.push('-');
						rest = &rest[symbols.minus_sign.len()..];
					}
				} else {
					if c.is_ascii_digit() {
						canonical.push(c);
					} else if let Some(digit) = c.to_digit(10) {
						canonical.push(char::from_digit(digit, 10).unwrap_or('0'));
					}
					rest = &rest[c.len_utf8()..];
				}
			}
			if !canonical.chars().any(|c| c.is_ascii_digit()) {
				return Err(I18nError::parse(input, "no digits"));
			}
			canonical
				.parse::<f64>()
				.map_err(|e| I18nError::parse(input, e.to_string()))?
				/ multiplier
		};

		Ok(if negative { -magnitude } else { magnitude })
	}
}

/// Applies option overrides to a pattern's fraction digit range.
pub(crate) fn fraction_digits(
	pattern_min: usize,
	pattern_max: usize,
	min: Option<usize>,
	max: Option<usize>,
) -> (usize, usize) {
	match (min, max) {
		(Some(min), Some(max)) => (min, max.max(min)),
		(Some(min), None) => (min, pattern_max.max(min)),
		(None, Some(max)) => (pattern_min.min(max), max),
		(None, None) => (pattern_min, pattern_max),
	}
}

fn round(value: f64, digits: usize, mode: RoundingMode) -> f64 {
	let scale = 10f64.powi(digits as i32);
	// Representation error such as 1.005 * 100 = 100.49999 is rounded off first.
	let scaled = (value * scale * 1e6).round() / 1e6;
	let rounded = match mode {
		RoundingMode::Round => scaled.round(),
		RoundingMode::Ceil => scaled.ceil(),
		RoundingMode::Floor => scaled.floor(),
		RoundingMode::Truncate => scaled.trunc(),
	};
	rounded / scale
}

fn group_digits(
	integer: &str,
	primary: Option<usize>,
	secondary: Option<usize>,
	separator: &str,
) -> String {
	let Some(primary) = primary.filter(|p| *p > 0) else {
		return integer.to_string();
	};
	let secondary = secondary.filter(|s| *s > 0).unwrap_or(primary);
	if integer.len() <= primary {
		return integer.to_string();
	}

	let (head, tail) = integer.split_at(integer.len() - primary);
	let mut groups = vec![tail.to_string()];
	let mut rest = head;
	while rest.len() > secondary {
		let (h, t) = rest.split_at(rest.len() - secondary);
		groups.push(t.to_string());
		rest = h;
	}
	if !rest.is_empty() {
		groups.push(rest.to_string());
	}
	groups.reverse();
	groups.join(separator)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn format(pattern: &str, options: &NumberFormatterOptions, value: f64) -> String {
		NumberFormat::new(
			NumberPattern::parse(pattern).unwrap(),
			NumberSymbols::default(),
			options,
		)
		.format(value)
	}

	#[rstest]
	#[case("#,##0.###", 1234567.891, "1,234,567.891")]
	#[case("#,##0.###", 0.5, "0.5")]
	#[case("#,##0.###", -1234.5, "-1,234.5")]
	#[case("#,##0.###", 1.23456, "1.235")]
	#[case("#,##,##0.###", 12345678.0, "1,23,45,678")]
	#[case("#,##0%", 0.256, "26%")]
	#[case("0.00", 3.0, "3.00")]
	#[case("000", 7.0, "007")]
	#[case("#E0", 12345.0, "1E4")]
	#[case("0.###E0", 12345.0, "1.235E4")]
	#[case("0.0E00", 0.00012, "1.2E-04")]
	fn test_format_patterns(#[case] pattern: &str, #[case] value: f64, #[case] expected: &str) {
		assert_eq!(format(pattern, &NumberFormatterOptions::default(), value), expected);
	}

	#[rstest]
	fn test_negative_subpattern() {
		let options = NumberFormatterOptions::default();
		assert_eq!(format("#,##0.00;(#,##0.00)", &options, -5.0), "(5.00)");
		assert_eq!(format("#,##0.00;(#,##0.00)", &options, 5.0), "5.00");
	}

	#[rstest]
	fn test_negative_zero_has_no_sign() {
		assert_eq!(format("0", &NumberFormatterOptions::default(), -0.2), "0");
	}

	#[rstest]
	#[case(RoundingMode::Round, "1.3")]
	#[case(RoundingMode::Ceil, "1.3")]
	#[case(RoundingMode::Floor, "1.2")]
	#[case(RoundingMode::Truncate, "1.2")]
	fn test_rounding_modes(#[case] mode: RoundingMode, #[case] expected: &str) {
		let options = NumberFormatterOptions::default()
			.maximum_fraction_digits(1)
			.round(mode);
		assert_eq!(format("#,##0.###", &options, 1.25), expected);
	}

	#[rstest]
	fn test_option_overrides() {
		// Arrange
		let options = NumberFormatterOptions::default()
			.minimum_integer_digits(3)
			.minimum_fraction_digits(2)
			.without_grouping();

		// Act
		let text = format("#,##0.###", &options, 1234.5);

		// Assert
		assert_eq!(text, "1234.50");
		assert_eq!(format("#,##0.###", &options, 5.0), "005.00");
	}

	#[rstest]
	#[case("'#'0", 5.0, "#5")]
	#[case("0' units'", 5.0, "5 units")]
	#[case("0''", 5.0, "5'")]
	fn test_quoted_literals(#[case] pattern: &str, #[case] value: f64, #[case] expected: &str) {
		assert_eq!(format(pattern, &NumberFormatterOptions::default(), value), expected);
	}

	#[rstest]
	fn test_currency_placeholder() {
		let pattern = NumberPattern::parse("¤#,##0.00").unwrap();
		let options = NumberFormatterOptions::default();
		let symbol = NumberFormat::new(pattern.clone(), NumberSymbols::default(), &options)
			.with_currency("$");
		let code = NumberFormat::new(pattern, NumberSymbols::default(), &options).with_currency("USD");
		assert_eq!(symbol.format(1234.5), "$1,234.50");
		assert_eq!(code.format(-1.0), "-USD\u{a0}1.00");
	}

	#[rstest]
	fn test_localized_symbols() {
		// Arrange
		let symbols = NumberSymbols::from_cldr(&serde_json::json!({
			"decimal": ",",
			"group": "\u{202f}",
			"minusSign": "-"
		}));
		let format = NumberFormat::new(
			NumberPattern::parse("#,##0.###").unwrap(),
			symbols,
			&NumberFormatterOptions::default(),
		);

		// Act
		let text = format.format(1234567.5);

		// Assert
		assert_eq!(text, "1\u{202f}234\u{202f}567,5");
		assert_eq!(format.parse(&text).unwrap(), 1234567.5);
	}

	#[rstest]
	#[case("1,234.5", 1234.5)]
	#[case("-12", -12.0)]
	#[case("(5.00)", -5.0)]
	#[case("45%", 0.45)]
	#[case("1.5E3", 1500.0)]
	fn test_parse(#[case] input: &str, #[case] expected: f64) {
		let format = NumberFormat::fallback(&NumberFormatterOptions::default());
		assert!((format.parse(input).unwrap() - expected).abs() < 1e-9);
	}

	#[rstest]
	#[case("")]
	#[case("abc")]
	fn test_parse_rejects(#[case] input: &str) {
		let format = NumberFormat::fallback(&NumberFormatterOptions::default());
		assert!(matches!(format.parse(input), Err(I18nError::Parse { .. })));
	}

	#[rstest]
	#[case("#,##0.###", (0, 3))]
	#[case("#,##0.00", (2, 2))]
	fn test_pattern_fraction_digits(#[case] pattern: &str, #[case] expected: (usize, usize)) {
		let parsed = NumberPattern::parse(pattern).unwrap();
		assert_eq!((parsed.min_fraction, parsed.max_fraction), expected);
	}

	#[rstest]
	fn test_pattern_without_digits_is_invalid() {
		assert!(NumberPattern::parse("%").is_err());
	}
}
