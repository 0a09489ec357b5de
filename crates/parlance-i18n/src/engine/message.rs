//! ICU MessageFormat compilation.
//!
//! Supported syntax:
//!
//! * `{name}` plain substitution
//! * `{name, number}` and `{name, number, integer|percent|decimal}`
//! * `{name, plural, offset:1 =0 {…} one {…} other {…}}` with `#`
//! * `{name, selectordinal, one {#st} other {#th}}`
//! * `{name, select, male {…} other {…}}`
//!
//! Apostrophes quote: `''` is a literal apostrophe and `'{…}'` is literal text.

use crate::args::{ArgValue, FormatArgs};
use crate::engine::number::NumberFormat;
use crate::engine::plural::{PluralCategory, PluralRules};
use crate::error::{I18nError, Result};

#[derive(Debug, Clone, PartialEq)]
enum NumberStyle {
	Decimal,
	Integer,
	Percent,
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
	Exact(f64),
	Category(PluralCategory),
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
	Text(String),
	Arg(String),
	Number {
		name: String,
		style: NumberStyle,
	},
	Plural {
		name: String,
		offset: f64,
		ordinal: bool,
		cases: Vec<(Selector, Vec<Part>)>,
	},
	Select {
		name: String,
		cases: Vec<(String, Vec<Part>)>,
	},
	Hash,
}

/// Locale data a compiled message formats with.
#[derive(Debug, Clone)]
pub(crate) struct MessageLocale {
	pub cardinal: PluralRules,
	pub ordinal: PluralRules,
	pub decimal: NumberFormat,
	pub integer: NumberFormat,
	pub percent: NumberFormat,
}

/// A parsed ICU message.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledMessage {
	parts: Vec<Part>,
}

impl CompiledMessage {
	pub(crate) fn parse(source: &str) -> Result<Self> {
		let mut parser = MessageParser {
			source,
			chars: source.chars().collect(),
			pos: 0,
		};
		let parts = parser.message(false)?;
		if parser.pos < parser.chars.len() {
			return Err(parser.error("unmatched '}'"));
		}
		Ok(Self { parts })
	}

	pub(crate) fn format(&self, args: &FormatArgs, locale: &MessageLocale) -> Result<String> {
		let mut out = String::new();
		write_parts(&self.parts, args, locale, None, &mut out)?;
		Ok(out)
	}
}

struct MessageParser<'a> {
	source: &'a str,
	chars: Vec<char>,
	pos: usize,
}

impl MessageParser<'_> {
	fn error(&self, reason: &str) -> I18nError {
		I18nError::invalid_message(self.source, format!("{} at offset {}", reason, self.pos))
	}

	fn peek(&self) -> Option<char> {
		self.chars.get(self.pos).copied()
	}

	fn skip_whitespace(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.pos += 1;
		}
	}

	fn expect(&mut self, expected: char) -> Result<()> {
		if self.peek() == Some(expected) {
			self.pos += 1;
			Ok(())
		} else {
			Err(self.error(&format!("expected '{}'", expected)))
		}
	}

	fn word(&mut self) -> String {
		let start = self.pos;
		while self
			.peek()
			.is_some_and(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | ','))
		{
			self.pos += 1;
		}
		self.chars[start..self.pos].iter().collect()
	}

	/// Parses message text up to an unconsumed `}` or the end of input.
	fn message(&mut self, in_plural: bool) -> Result<Vec<Part>> {
		let mut parts = Vec::new();
		let mut text = String::new();
		while let Some(c) = self.peek() {
			match c {
				'\'' => self.quoted(&mut text, in_plural),
				'{' => {
					if !text.is_empty() {
						parts.push(Part::Text(std::mem::take(&mut text)));
					}
					parts.push(self.argument(in_plural)?);
				}
				'}' => break,
				'#' if in_plural => {
					if !text.is_empty() {
						parts.push(Part::Text(std::mem::take(&mut text)));
					}
					parts.push(Part::Hash);
					self.pos += 1;
				}
				_ => {
					text.push(c);
					self.pos += 1;
				}
			}
		}
		if !text.is_empty() {
			parts.push(Part::Text(text));
		}
		Ok(parts)
	}

	fn quoted(&mut self, text: &mut String, in_plural: bool) {
		self.pos += 1;
		match self.peek() {
			Some('\'') => {
				text.push('\'');
				self.pos += 1;
			}
			Some('{' | '}' | '|') => self.quoted_literal(text),
			Some('#') if in_plural => self.quoted_literal(text),
			_ => text.push('\''),
		}
	}

	fn quoted_literal(&mut self, text: &mut String) {
		while let Some(c) = self.peek() {
			self.pos += 1;
			if c != '\'' {
				text.push(c);
			} else if self.peek() == Some('\'') {
				text.push('\'');
				self.pos += 1;
			} else {
				break;
			}
		}
	}

	fn argument(&mut self, in_plural: bool) -> Result<Part> {
		self.expect('{')?;
		self.skip_whitespace();
		let name = self.word();
		if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
			return Err(self.error("invalid argument name"));
		}
		self.skip_whitespace();
		if self.peek() == Some('}') {
			self.pos += 1;
			return Ok(Part::Arg(name));
		}
		self.expect(',')?;
		self.skip_whitespace();
		let kind = self.word();
		self.skip_whitespace();

		let part = match kind.as_str() {
			"number" => {
				let style = if self.peek() == Some(',') {
					self.pos += 1;
					self.skip_whitespace();
					let style = self.word();
					self.skip_whitespace();
					match style.as_str() {
						"integer" => NumberStyle::Integer,
						"percent" => NumberStyle::Percent,
						"decimal" => NumberStyle::Decimal,
						_ => return Err(self.error(&format!("unknown number style '{}'", style))),
					}
				} else {
					NumberStyle::Decimal
				};
				Part::Number { name, style }
			}
			"plural" | "selectordinal" => {
				self.expect(',')?;
				self.plural(name, kind == "selectordinal")?
			}
			"select" => {
				self.expect(',')?;
				self.select(name, in_plural)?
			}
			_ => return Err(self.error(&format!("unknown argument type '{}'", kind))),
		};
		self.skip_whitespace();
		self.expect('}')?;
		Ok(part)
	}

	fn case_body(&mut self, in_plural: bool) -> Result<Vec<Part>> {
		self.skip_whitespace();
		self.expect('{')?;
		let body = self.message(in_plural)?;
		self.expect('}')?;
		Ok(body)
	}

	fn plural(&mut self, name: String, ordinal: bool) -> Result<Part> {
		self.skip_whitespace();
		let mut offset = 0.0;
		let rest: String = self.chars[self.pos..].iter().take(7).collect();
		if rest == "offset:" {
			self.pos += 7;
			self.skip_whitespace();
			let value = self.word();
			offset = value
				.parse()
				.map_err(|_| self.error(&format!("invalid offset '{}'", value)))?;
		}

		let mut cases = Vec::new();
		loop {
			self.skip_whitespace();
			if self.peek() == Some('}') || self.peek().is_none() {
				break;
			}
			let key = self.word();
			let selector = match key.strip_prefix('=') {
				Some(exact) => Selector::Exact(
					exact
						.parse()
						.map_err(|_| self.error(&format!("invalid selector '{}'", key)))?,
				),
				None => Selector::Category(
					key.parse()
						.map_err(|_| self.error(&format!("invalid selector '{}'", key)))?,
				),
			};
			cases.push((selector, self.case_body(true)?));
		}
		if !cases
			.iter()
			.any(|(s, _)| *s == Selector::Category(PluralCategory::Other))
		{
			return Err(self.error("missing 'other' case"));
		}
		Ok(Part::Plural {
			name,
			offset,
			ordinal,
			cases,
		})
	}

	fn select(&mut self, name: String, in_plural: bool) -> Result<Part> {
		let mut cases = Vec::new();
		loop {
			self.skip_whitespace();
			if self.peek() == Some('}') || self.peek().is_none() {
				break;
			}
			let key = self.word();
			if key.is_empty() {
				return Err(self.error("empty select key"));
			}
			cases.push((key, self.case_body(in_plural)?));
		}
		if !cases.iter().any(|(key, _)| key == "other") {
			return Err(self.error("missing 'other' case"));
		}
		Ok(Part::Select { name, cases })
	}
}

fn arg<'a>(args: &'a FormatArgs, name: &str) -> Result<&'a ArgValue> {
	args.get(name)
		.ok_or_else(|| I18nError::MissingToken(name.to_string()))
}

fn number(value: &ArgValue) -> Result<f64> {
	match value {
		ArgValue::Number(n) => Ok(*n),
		ArgValue::String(s) => s
			.trim()
			.parse()
			.map_err(|_| I18nError::parse(s, "not a number")),
	}
}

fn write_parts(
	parts: &[Part],
	args: &FormatArgs,
	locale: &MessageLocale,
	hash: Option<f64>,
	out: &mut String,
) -> Result<()> {
	for part in parts {
		match part {
			Part::Text(text) => out.push_str(text),
			Part::Arg(name) => out.push_str(&arg(args, name)?.to_string()),
			Part::Hash => {
				if let Some(value) = hash {
					out.push_str(&locale.decimal.format(value));
				}
			}
			Part::Number { name, style } => {
				let value = number(arg(args, name)?)?;
				let format = match style {
					NumberStyle::Decimal => &locale.decimal,
					NumberStyle::Integer => &locale.integer,
					NumberStyle::Percent => &locale.percent,
				};
				out.push_str(&format.format(value));
			}
			Part::Plural {
				name,
				offset,
				ordinal,
				cases,
			} => {
				let value = number(arg(args, name)?)?;
				let shifted = value - offset;
				let exact = cases.iter().find(|(selector, _)| match selector {
					Selector::Exact(n) => *n == value,
					Selector::Category(_) => false,
				});
				let rules = if *ordinal {
					&locale.ordinal
				} else {
					&locale.cardinal
				};
				let category = rules.select(shifted);
				let body = exact
					.or_else(|| {
						cases
							.iter()
							.find(|(s, _)| *s == Selector::Category(category))
					})
					.or_else(|| {
						cases
							.iter()
							.find(|(s, _)| *s == Selector::Category(PluralCategory::Other))
					})
					.map(|(_, body)| body);
				if let Some(body) = body {
					write_parts(body, args, locale, Some(shifted), out)?;
				}
			}
			Part::Select { name, cases } => {
				let key = arg(args, name)?.to_string();
				let body = cases
					.iter()
					.find(|(k, _)| *k == key)
					.or_else(|| cases.iter().find(|(k, _)| k == "other"))
					.map(|(_, body)| body);
				if let Some(body) = body {
					write_parts(body, args, locale, hash, out)?;
				}
			}
		}
	}
	Ok(())
}
