//! Number, currency and plural front-ends.
//!
//! Each front-end takes the "locale or options" argument as
//! `impl Into<FormatterArgs<_>>`:
//!
//! ```
//! use parlance_i18n::{I18n, NumberFormatterOptions};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let i18n = I18n::default().with_root_locale("en");
//! i18n.load_cldr_data(&json!({
//!     "main": { "en": { "numbers": {
//!         "decimalFormats-numberSystem-latn": { "standard": "#,##0.###" },
//!         "percentFormats-numberSystem-latn": { "standard": "#,##0%" }
//!     } } }
//! })).await.unwrap();
//!
//! assert_eq!(i18n.format_number(1234.5, ()).unwrap(), "1,234.5");
//! assert_eq!(i18n.format_number(1234.5, "en").unwrap(), "1,234.5");
//! assert_eq!(
//!     i18n.format_number(0.25, NumberFormatterOptions::default().percent()).unwrap(),
//!     "25%"
//! );
//! # });
//! ```

use crate::args::{FormatterArgs, normalize_formatter_args};
use crate::context::I18n;
use crate::engine::{Formatter, Parser, PluralCategory, PluralGenerator};
use crate::error::Result;

/// Which CLDR number pattern to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumberStyle {
	/// `decimalFormats`, e.g. `#,##0.###`.
	#[default]
	Decimal,
	/// `percentFormats`, e.g. `#,##0%`.
	Percent,
	/// `scientificFormats`, e.g. `#E0`.
	Scientific,
}

/// How digits beyond the maximum fraction digits are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoundingMode {
	/// Half away from zero.
	#[default]
	Round,
	/// Toward positive infinity.
	Ceil,
	/// Toward negative infinity.
	Floor,
	/// Toward zero.
	Truncate,
}

/// Options for number formatters. Unset digit counts come from the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatterOptions {
	/// Pattern family.
	pub style: NumberStyle,
	/// Minimum integer digits, zero-padded.
	pub minimum_integer_digits: Option<usize>,
	/// Minimum fraction digits, zero-padded.
	pub minimum_fraction_digits: Option<usize>,
	/// Maximum fraction digits.
	pub maximum_fraction_digits: Option<usize>,
	/// Rounding of dropped digits.
	pub round: RoundingMode,
	/// Whether to insert grouping separators.
	pub use_grouping: bool,
}

impl Default for NumberFormatterOptions {
	fn default() -> Self {
		Self {
			style: NumberStyle::Decimal,
			minimum_integer_digits: None,
			minimum_fraction_digits: None,
			maximum_fraction_digits: None,
			round: RoundingMode::Round,
			use_grouping: true,
		}
	}
}

impl NumberFormatterOptions {
	/// Sets the style.
	pub fn style(mut self, style: NumberStyle) -> Self {
		self.style = style;
		self
	}

	/// Shorthand for the percent style.
	pub fn percent(self) -> Self {
		self.style(NumberStyle::Percent)
	}

	/// Shorthand for the scientific style.
	pub fn scientific(self) -> Self {
		self.style(NumberStyle::Scientific)
	}

	/// Sets the minimum integer digits.
	pub fn minimum_integer_digits(mut self, digits: usize) -> Self {
		self.minimum_integer_digits = Some(digits);
		self
	}

	/// Sets the minimum fraction digits.
	pub fn minimum_fraction_digits(mut self, digits: usize) -> Self {
		self.minimum_fraction_digits = Some(digits);
		self
	}

	/// Sets the maximum fraction digits.
	pub fn maximum_fraction_digits(mut self, digits: usize) -> Self {
		self.maximum_fraction_digits = Some(digits);
		self
	}

	/// Sets the rounding mode.
	pub fn round(mut self, mode: RoundingMode) -> Self {
		self.round = mode;
		self
	}

	/// Disables grouping separators.
	pub fn without_grouping(mut self) -> Self {
		self.use_grouping = false;
		self
	}
}

/// Options for number parsers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberParserOptions {
	/// Pattern family the input is written in.
	pub style: NumberStyle,
}

/// How the currency is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CurrencyStyle {
	/// `$1.00`
	#[default]
	Symbol,
	/// `($1.00)` for negative amounts
	Accounting,
	/// `USD 1.00`
	Code,
	/// `1.00 US dollars`
	Name,
}

/// Options for currency formatters. Fraction digits default to the
/// currency's own (`currencyData`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyFormatterOptions {
	/// Display style.
	pub style: CurrencyStyle,
	/// Minimum fraction digits.
	pub minimum_fraction_digits: Option<usize>,
	/// Maximum fraction digits.
	pub maximum_fraction_digits: Option<usize>,
	/// Rounding of dropped digits.
	pub round: RoundingMode,
}

impl CurrencyFormatterOptions {
	/// Sets the style.
	pub fn style(mut self, style: CurrencyStyle) -> Self {
		self.style = style;
		self
	}

	/// Sets the minimum fraction digits.
	pub fn minimum_fraction_digits(mut self, digits: usize) -> Self {
		self.minimum_fraction_digits = Some(digits);
		self
	}

	/// Sets the maximum fraction digits.
	pub fn maximum_fraction_digits(mut self, digits: usize) -> Self {
		self.maximum_fraction_digits = Some(digits);
		self
	}

	/// Sets the rounding mode.
	pub fn round(mut self, mode: RoundingMode) -> Self {
		self.round = mode;
		self
	}
}

/// Cardinal ("1 file") or ordinal ("1st") plural rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PluralType {
	/// Quantities.
	#[default]
	Cardinal,
	/// Positions.
	Ordinal,
}

/// Options for plural generators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluralGeneratorOptions {
	/// Rule set.
	pub plural_type: PluralType,
}

impl PluralGeneratorOptions {
	/// Ordinal rules.
	pub fn ordinal() -> Self {
		Self {
			plural_type: PluralType::Ordinal,
		}
	}
}

impl I18n {
	/// A number formatter.
	pub fn get_number_formatter<'a>(
		&self,
		args: impl Into<FormatterArgs<'a, NumberFormatterOptions>>,
	) -> Result<Formatter<f64>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine()
			.number_formatter(self.instance_locale(locale.as_deref()).as_deref(), &options)
	}

	/// Formats `value` as a number.
	pub fn format_number<'a>(
		&self,
		value: f64,
		args: impl Into<FormatterArgs<'a, NumberFormatterOptions>>,
	) -> Result<String> {
		(self.get_number_formatter(args)?)(value)
	}

	/// A number parser.
	pub fn get_number_parser<'a>(
		&self,
		args: impl Into<FormatterArgs<'a, NumberParserOptions>>,
	) -> Result<Parser<f64>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine()
			.number_parser(self.instance_locale(locale.as_deref()).as_deref(), &options)
	}

	/// Parses a localized number.
	pub fn parse_number<'a>(
		&self,
		input: &str,
		args: impl Into<FormatterArgs<'a, NumberParserOptions>>,
	) -> Result<f64> {
		(self.get_number_parser(args)?)(input)
	}

	/// A formatter for amounts of `currency`.
	pub fn get_currency_formatter<'a>(
		&self,
		currency: &str,
		args: impl Into<FormatterArgs<'a, CurrencyFormatterOptions>>,
	) -> Result<Formatter<f64>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine().currency_formatter(
			self.instance_locale(locale.as_deref()).as_deref(),
			currency,
			&options,
		)
	}

	/// Formats `value` as an amount of `currency`.
	pub fn format_currency<'a>(
		&self,
		value: f64,
		currency: &str,
		args: impl Into<FormatterArgs<'a, CurrencyFormatterOptions>>,
	) -> Result<String> {
		(self.get_currency_formatter(currency, args)?)(value)
	}

	/// A plural category selector.
	pub fn get_plural_generator<'a>(
		&self,
		args: impl Into<FormatterArgs<'a, PluralGeneratorOptions>>,
	) -> Result<PluralGenerator> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine()
			.plural_generator(self.instance_locale(locale.as_deref()).as_deref(), &options)
	}

	/// The plural category of `value`.
	pub fn pluralize<'a>(
		&self,
		value: f64,
		args: impl Into<FormatterArgs<'a, PluralGeneratorOptions>>,
	) -> Result<PluralCategory> {
		Ok((self.get_plural_generator(args)?)(value))
	}
}
