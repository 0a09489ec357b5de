//! CLDR plural rules.
//!
//! Rules come from the `plurals-type-cardinal` / `plurals-type-ordinal`
//! supplemental documents, one condition per category:
//!
//! ```text
//! "pluralRule-count-one": "i = 1 and v = 0 @integer 1",
//! "pluralRule-count-other": " @integer 0, 2~16, 100, 1000, …"
//! ```
//!
//! Samples after `@` are ignored. Operands follow UTS #35:
//! `n` absolute value, `i` integer digits, `v`/`w` visible fraction digit
//! count with/without trailing zeros, `f`/`t` the fraction digits
//! with/without trailing zeros, `e`/`c` the compact exponent.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{I18nError, Result};

/// A CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
	/// `zero`
	Zero,
	/// `one`
	One,
	/// `two`
	Two,
	/// `few`
	Few,
	/// `many`
	Many,
	/// `other`
	Other,
}

impl PluralCategory {
	/// Every category, in CLDR order.
	pub const ALL: [PluralCategory; 6] = [
		Self::Zero,
		Self::One,
		Self::Two,
		Self::Few,
		Self::Many,
		Self::Other,
	];

	/// The CLDR keyword.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Zero => "zero",
			Self::One => "one",
			Self::Two => "two",
			Self::Few => "few",
			Self::Many => "many",
			Self::Other => "other",
		}
	}
}

impl fmt::Display for PluralCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PluralCategory {
	type Err = I18nError;

	fn from_str(s: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|c| c.as_str() == s)
			.ok_or_else(|| I18nError::parse(s, "unknown plural category"))
	}
}

/// Plural operands of a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Operands {
	n: f64,
	i: f64,
	v: f64,
	w: f64,
	f: f64,
	t: f64,
	e: f64,
}

impl Operands {
	/// Operands of `value` as written in its shortest decimal form.
	pub(crate) fn from_f64(value: f64) -> Self {
		Self::from_decimal(&format!("{}", value.abs()))
	}

	/// Operands of a plain decimal string such as `"1.50"`.
	pub(crate) fn from_decimal(decimal: &str) -> Self {
		let decimal = decimal.trim_start_matches('-');
		let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));
		let trimmed = frac_part.trim_end_matches('0');
		let digits = |s: &str| if s.is_empty() { 0.0 } else { s.parse::<f64>().unwrap_or(0.0) };
		Self {
			n: decimal.parse::<f64>().unwrap_or(0.0),
			i: digits(int_part),
			v: frac_part.len() as f64,
			w: trimmed.len() as f64,
			f: digits(frac_part),
			t: digits(trimmed),
			e: 0.0,
		}
	}

	fn get(&self, operand: char) -> f64 {
		match operand {
			'n' => self.n,
			'i' => self.i,
			'v' => self.v,
			'w' => self.w,
			'f' => self.f,
			't' => self.t,
			// `c` is the deprecated spelling of `e`
			'e' | 'c' => self.e,
			_ => 0.0,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
enum Range {
	Value(f64),
	Between(f64, f64),
}

impl Range {
	fn contains(&self, x: f64) -> bool {
		match *self {
			Self::Value(v) => x == v,
			Self::Between(low, high) => x.fract() == 0.0 && low <= x && x <= high,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
struct Relation {
	operand: char,
	modulus: Option<f64>,
	negated: bool,
	ranges: Vec<Range>,
}

impl Relation {
	fn matches(&self, operands: &Operands) -> bool {
		let mut x = operands.get(self.operand);
		if let Some(m) = self.modulus {
			x %= m;
		}
		self.ranges.iter().any(|r| r.contains(x)) != self.negated
	}
}

/// `or`-separated groups of `and`-joined relations. Empty means "always".
#[derive(Debug, Clone, Default, PartialEq)]
struct Condition(Vec<Vec<Relation>>);

impl Condition {
	fn matches(&self, operands: &Operands) -> bool {
		self.0.is_empty()
			|| self
				.0
				.iter()
				.any(|group| group.iter().all(|r| r.matches(operands)))
	}
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
	Word(String),
	Number(f64),
	Eq,
	NotEq,
	Percent,
	DotDot,
	Comma,
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
	let mut tokens = Vec::new();
	let mut chars = source.chars().peekable();
	while let Some(&c) = chars.peek() {
		match c {
			c if c.is_whitespace() => {
				chars.next();
			}
			'a'..='z' => {
				let mut word = String::new();
				while let Some(&c) = chars.peek().filter(|c| c.is_ascii_lowercase()) {
					word.push(c);
					chars.next();
				}
				tokens.push(Token::Word(word));
			}
			'0'..='9' => {
				let mut number = String::new();
				while let Some(&c) = chars.peek() {
					if c.is_ascii_digit() {
						number.push(c);
						chars.next();
					} else if c == '.' {
						// `..` is a range, a single `.` a decimal point
						let mut ahead = chars.clone();
						ahead.next();
						if ahead.peek() == Some(&'.') {
							break;
						}
						number.push(c);
						chars.next();
					} else {
						break;
					}
				}
				let value = number
					.parse()
					.map_err(|_| I18nError::invalid_pattern(source, "bad number"))?;
				tokens.push(Token::Number(value));
			}
			'=' => {
				chars.next();
				tokens.push(Token::Eq);
			}
			'!' => {
				chars.next();
				if chars.next() != Some('=') {
					return Err(I18nError::invalid_pattern(source, "expected '!='"));
				}
				tokens.push(Token::NotEq);
			}
			'%' => {
				chars.next();
				tokens.push(Token::Percent);
			}
			',' => {
				chars.next();
				tokens.push(Token::Comma);
			}
			'.' => {
				chars.next();
				if chars.next() != Some('.') {
					return Err(I18nError::invalid_pattern(source, "expected '..'"));
				}
				tokens.push(Token::DotDot);
			}
			other => {
				return Err(I18nError::invalid_pattern(
					source,
					format!("unexpected character '{}'", other),
				));
			}
		}
	}
	Ok(tokens)
}

struct RuleParser<'a> {
	source: &'a str,
	tokens: Vec<Token>,
	pos: usize,
}

impl<'a> RuleParser<'a> {
	fn new(source: &'a str) -> Result<Self> {
		Ok(Self {
			source,
			tokens: tokenize(source)?,
			pos: 0,
		})
	}

	fn error(&self, reason: &str) -> I18nError {
		I18nError::invalid_pattern(self.source, reason)
	}

	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn next(&mut self) -> Option<Token> {
		let token = self.tokens.get(self.pos).cloned();
		self.pos += 1;
		token
	}

	fn eat_word(&mut self, word: &str) -> bool {
		if matches!(self.peek(), Some(Token::Word(w)) if w == word) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn number(&mut self) -> Result<f64> {
		match self.next() {
			Some(Token::Number(n)) => Ok(n),
			_ => Err(self.error("expected a number")),
		}
	}

	fn condition(mut self) -> Result<Condition> {
		let mut groups = Vec::new();
		if self.peek().is_none() {
			return Ok(Condition(groups));
		}
		loop {
			let mut group = vec![self.relation()?];
			while self.eat_word("and") {
				group.push(self.relation()?);
			}
			groups.push(group);
			if !self.eat_word("or") {
				break;
			}
		}
		if self.peek().is_some() {
			return Err(self.error("trailing input"));
		}
		Ok(Condition(groups))
	}

	fn relation(&mut self) -> Result<Relation> {
		let operand = match self.next() {
			Some(Token::Word(w)) if w.len() == 1 && "nivwftec".contains(w.as_str()) => {
				w.chars().next().unwrap_or('n')
			}
			_ => return Err(self.error("expected an operand")),
		};

		let modulus = if self.eat_word("mod") || matches!(self.peek(), Some(Token::Percent)) {
			if matches!(self.peek(), Some(Token::Percent)) {
				self.pos += 1;
			}
			Some(self.number()?)
		} else {
			None
		};

		let negated = match self.next() {
			Some(Token::Eq) => false,
			Some(Token::NotEq) => true,
			Some(Token::Word(w)) if w == "is" => self.eat_word("not"),
			Some(Token::Word(w)) if w == "in" || w == "within" => false,
			Some(Token::Word(w)) if w == "not" => {
				if !(self.eat_word("in") || self.eat_word("within")) {
					return Err(self.error("expected 'in' after 'not'"));
				}
				true
			}
			_ => return Err(self.error("expected a comparison")),
		};

		let mut ranges = Vec::new();
		loop {
			let low = self.number()?;
			if matches!(self.peek(), Some(Token::DotDot)) {
				self.pos += 1;
				ranges.push(Range::Between(low, self.number()?));
			} else {
				ranges.push(Range::Value(low));
			}
			if !matches!(self.peek(), Some(Token::Comma)) {
				break;
			}
			self.pos += 1;
		}

		Ok(Relation {
			operand,
			modulus,
			negated,
			ranges,
		})
	}
}

/// Compiled plural rules of one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluralRules {
	rules: Vec<(PluralCategory, Condition)>,
}

impl PluralRules {
	/// Compiles the `pluralRule-count-*` entries of one language.
	///
	/// # Examples
	///
	/// ```
	/// use parlance_i18n::engine::{PluralCategory, PluralRules};
	/// use serde_json::json;
	///
	/// let rules = PluralRules::from_cldr(json!({
	///     "pluralRule-count-one": "i = 1 and v = 0 @integer 1",
	///     "pluralRule-count-other": " @integer 0, 2~16"
	/// }).as_object().unwrap()).unwrap();
	///
	/// assert_eq!(rules.select(1.0), PluralCategory::One);
	/// assert_eq!(rules.select(2.0), PluralCategory::Other);
	/// ```
	pub fn from_cldr(rules: &Map<String, Value>) -> Result<Self> {
		let mut compiled = Vec::new();
		for (key, value) in rules {
			let Some(category) = key.strip_prefix("pluralRule-count-") else {
				continue;
			};
			let category: PluralCategory = category.parse()?;
			if category == PluralCategory::Other {
				continue;
			}
			let source = value.as_str().unwrap_or_default();
			let condition = source.split('@').next().unwrap_or_default().trim();
			compiled.push((category, RuleParser::new(condition)?.condition()?));
		}
		compiled.sort_by_key(|(category, _)| *category);
		Ok(Self { rules: compiled })
	}

	/// The category of `value`.
	pub fn select(&self, value: f64) -> PluralCategory {
		self.select_operands(&Operands::from_f64(value))
	}

	/// The category of a formatted decimal such as `"1.0"`, whose visible
	/// fraction digits matter.
	pub fn select_decimal(&self, decimal: &str) -> PluralCategory {
		self.select_operands(&Operands::from_decimal(decimal))
	}

	pub(crate) fn select_operands(&self, operands: &Operands) -> PluralCategory {
		self.rules
			.iter()
			.find(|(_, condition)| condition.matches(operands))
			.map(|(category, _)| *category)
			.unwrap_or(PluralCategory::Other)
	}

	/// The categories these rules can produce, `other` included.
	pub fn categories(&self) -> Vec<PluralCategory> {
		let mut categories: Vec<_> = self.rules.iter().map(|(c, _)| *c).collect();
		categories.push(PluralCategory::Other);
		categories
	}
}
