//! The globalization engine behind the i18n context.
//!
//! [`GlobalizeEngine`] is the seam between the bundle registry and the code
//! that actually knows CLDR: it receives CLDR documents and message maps, and
//! hands back compiled formatters and parsers. [`CldrEngine`] implements it
//! directly on CLDR JSON.
//!
//! Compiled formatters own the data they need and hold no engine lock, so
//! they can be cached and called from any thread.

mod date;
mod message;
mod number;
pub mod plural;
mod unit;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use serde_json::Value;

use crate::args::FormatArgs;
use crate::bundle::FrozenMessages;
use crate::date::{DateFormatterOptions, DateStyle, RelativeTimeFormatterOptions};
use crate::error::{I18nError, Result};
use crate::locale::{generate_locales, language, normalize_locale};
use crate::number::{
	CurrencyFormatterOptions, CurrencyStyle, NumberFormatterOptions, NumberParserOptions,
	NumberStyle, PluralGeneratorOptions, PluralType,
};
use crate::unit::UnitFormatterOptions;

use self::date::{CalendarNames, DatePattern};
use self::message::{CompiledMessage, MessageLocale};
use self::number::{NumberFormat, NumberPattern, NumberSymbols};
use self::unit::{RelativeTimePattern, UnitPattern};

pub use self::plural::{PluralCategory, PluralRules};

static NULL: Value = Value::Null;

/// Formats a value.
pub type Formatter<V> = Arc<dyn Fn(V) -> Result<String> + Send + Sync>;

/// Parses text into a value.
pub type Parser<V> = Arc<dyn Fn(&str) -> Result<V> + Send + Sync>;

/// Formats a message with named arguments.
pub type MessageFormatter = Arc<dyn Fn(&FormatArgs) -> Result<String> + Send + Sync>;

/// Maps a number to its plural category.
pub type PluralGenerator = Arc<dyn Fn(f64) -> PluralCategory + Send + Sync>;

/// Locale name used for messages that apply to every locale.
pub const ROOT_LOCALE: &str = "root";

/// A globalization engine.
///
/// Every `locale: Option<&str>` argument selects a locale-specific instance
/// when `Some`, and the engine's default locale (see
/// [`set_locale`](Self::set_locale)) when `None`.
pub trait GlobalizeEngine: Send + Sync {
	/// Accepts a CLDR JSON document.
	fn load(&self, data: &Value) -> Result<()>;

	/// Accepts the messages of a bundle for a locale (or [`ROOT_LOCALE`]).
	fn load_messages(&self, locale: &str, bundle_id: &str, messages: FrozenMessages) -> Result<()>;

	/// Sets the default locale.
	fn set_locale(&self, locale: &str);

	/// The default locale, if one was set.
	fn locale(&self) -> Option<String>;

	/// Compiles message `key` of bundle `bundle_id`.
	fn message_formatter(
		&self,
		locale: Option<&str>,
		bundle_id: &str,
		key: &str,
	) -> Result<MessageFormatter>;

	/// A number formatter.
	fn number_formatter(
		&self,
		locale: Option<&str>,
		options: &NumberFormatterOptions,
	) -> Result<Formatter<f64>>;

	/// A number parser.
	fn number_parser(&self, locale: Option<&str>, options: &NumberParserOptions)
	-> Result<Parser<f64>>;

	/// A formatter for amounts of `currency` (an ISO 4217 code).
	fn currency_formatter(
		&self,
		locale: Option<&str>,
		currency: &str,
		options: &CurrencyFormatterOptions,
	) -> Result<Formatter<f64>>;

	/// A plural category selector.
	fn plural_generator(
		&self,
		locale: Option<&str>,
		options: &PluralGeneratorOptions,
	) -> Result<PluralGenerator>;

	/// A date formatter.
	fn date_formatter(
		&self,
		locale: Option<&str>,
		options: &DateFormatterOptions,
	) -> Result<Formatter<NaiveDateTime>>;

	/// A date parser.
	fn date_parser(
		&self,
		locale: Option<&str>,
		options: &DateFormatterOptions,
	) -> Result<Parser<NaiveDateTime>>;

	/// A formatter for offsets such as "in 3 days".
	fn relative_time_formatter(
		&self,
		locale: Option<&str>,
		unit: &str,
		options: &RelativeTimeFormatterOptions,
	) -> Result<Formatter<f64>>;

	/// A formatter for quantities such as "5 kilometers".
	fn unit_formatter(
		&self,
		locale: Option<&str>,
		unit: &str,
		options: &UnitFormatterOptions,
	) -> Result<Formatter<f64>>;
}

/// The default [`GlobalizeEngine`], backed by CLDR JSON.
///
/// # Examples
///
/// ```
/// use parlance_i18n::engine::{CldrEngine, GlobalizeEngine};
/// use parlance_i18n::NumberFormatterOptions;
/// use serde_json::json;
///
/// let engine = CldrEngine::new();
/// engine.load(&json!({
///     "main": { "de": { "numbers": {
///         "symbols-numberSystem-latn": { "decimal": ",", "group": "." },
///         "decimalFormats-numberSystem-latn": { "standard": "#,##0.###" }
///     } } }
/// })).unwrap();
///
/// let format = engine.number_formatter(Some("de"), &NumberFormatterOptions::default()).unwrap();
/// assert_eq!(format(1234.5).unwrap(), "1.234,5");
/// ```
#[derive(Default)]
pub struct CldrEngine {
	data: RwLock<Value>,
	messages: RwLock<HashMap<String, HashMap<String, FrozenMessages>>>,
	default_locale: RwLock<Option<String>>,
}

impl CldrEngine {
	/// An engine with no data.
	pub fn new() -> Self {
		Self::default()
	}

	fn resolve_locale(&self, locale: Option<&str>) -> Result<String> {
		match locale {
			Some(locale) => Ok(normalize_locale(locale)),
			None => self
				.default_locale
				.read()
				.clone()
				.ok_or(I18nError::DefaultLocaleNotDefined),
		}
	}

	/// Runs `f` against the CLDR data of `locale`.
	fn with_locale<T>(
		&self,
		locale: Option<&str>,
		f: impl FnOnce(&LocaleData<'_>) -> Result<T>,
	) -> Result<T> {
		let locale = self.resolve_locale(locale)?;
		let data = self.data.read();
		f(&LocaleData::new(&data, locale))
	}
}

impl fmt::Debug for CldrEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let locales: Vec<String> = self
			.data
			.read()
			.get("main")
			.and_then(Value::as_object)
			.map(|main| main.keys().cloned().collect())
			.unwrap_or_default();
		f.debug_struct("CldrEngine")
			.field("locales", &locales)
			.field("default_locale", &*self.default_locale.read())
			.finish()
	}
}

impl GlobalizeEngine for CldrEngine {
	fn load(&self, data: &Value) -> Result<()> {
		merge(&mut self.data.write(), data);
		Ok(())
	}

	fn load_messages(&self, locale: &str, bundle_id: &str, messages: FrozenMessages) -> Result<()> {
		self.messages
			.write()
			.entry(locale.to_string())
			.or_default()
			.insert(bundle_id.to_string(), messages);
		Ok(())
	}

	fn set_locale(&self, locale: &str) {
		tracing::debug!(locale = %locale, "engine default locale changed");
		*self.default_locale.write() = Some(normalize_locale(locale));
	}

	fn locale(&self) -> Option<String> {
		self.default_locale.read().clone()
	}

	fn message_formatter(
		&self,
		locale: Option<&str>,
		bundle_id: &str,
		key: &str,
	) -> Result<MessageFormatter> {
		let locale = self.resolve_locale(locale)?;
		let source = {
			let messages = self.messages.read();
			let mut chain = generate_locales(&locale);
			chain.reverse();
			chain.push(ROOT_LOCALE.to_string());
			chain
				.iter()
				.filter_map(|candidate| messages.get(candidate)?.get(bundle_id)?.get(key))
				.next()
				.cloned()
				.ok_or_else(|| I18nError::MissingMessage {
					bundle_id: bundle_id.to_string(),
					key: key.to_string(),
				})?
		};
		let compiled = CompiledMessage::parse(&source)?;
		let message_locale = {
			let data = self.data.read();
			LocaleData::new(&data, locale).message_locale()?
		};
		Ok(Arc::new(move |args: &FormatArgs| {
			compiled.format(args, &message_locale)
		}))
	}

	fn number_formatter(
		&self,
		locale: Option<&str>,
		options: &NumberFormatterOptions,
	) -> Result<Formatter<f64>> {
		let format = self.with_locale(locale, |data| data.number_format(options.style, options))?;
		Ok(Arc::new(move |value: f64| Ok(format.format(value))))
	}

	fn number_parser(
		&self,
		locale: Option<&str>,
		options: &NumberParserOptions,
	) -> Result<Parser<f64>> {
		let number_options = NumberFormatterOptions {
			style: options.style,
			..NumberFormatterOptions::default()
		};
		let format =
			self.with_locale(locale, |data| data.number_format(options.style, &number_options))?;
		Ok(Arc::new(move |input: &str| format.parse(input)))
	}

	fn currency_formatter(
		&self,
		locale: Option<&str>,
		currency: &str,
		options: &CurrencyFormatterOptions,
	) -> Result<Formatter<f64>> {
		self.with_locale(locale, |data| data.currency_formatter(currency, options))
	}

	fn plural_generator(
		&self,
		locale: Option<&str>,
		options: &PluralGeneratorOptions,
	) -> Result<PluralGenerator> {
		let ordinal = options.plural_type == PluralType::Ordinal;
		let rules = self.with_locale(locale, |data| data.plural_rules(ordinal, true))?;
		Ok(Arc::new(move |value: f64| rules.select(value)))
	}

	fn date_formatter(
		&self,
		locale: Option<&str>,
		options: &DateFormatterOptions,
	) -> Result<Formatter<NaiveDateTime>> {
		let (pattern, names) = self.with_locale(locale, |data| data.date_pattern(options))?;
		let offset = options.utc_offset_minutes;
		Ok(Arc::new(move |value: NaiveDateTime| {
			Ok(pattern.format(&value, &names, offset))
		}))
	}

	fn date_parser(
		&self,
		locale: Option<&str>,
		options: &DateFormatterOptions,
	) -> Result<Parser<NaiveDateTime>> {
		let (pattern, names) = self.with_locale(locale, |data| data.date_pattern(options))?;
		Ok(Arc::new(move |input: &str| pattern.parse_value(input, &names)))
	}

	fn relative_time_formatter(
		&self,
		locale: Option<&str>,
		unit: &str,
		options: &RelativeTimeFormatterOptions,
	) -> Result<Formatter<f64>> {
		let (pattern, number, rules) = self.with_locale(locale, |data| {
			let fields = data.main("dates/fields")?;
			Ok((
				RelativeTimePattern::compile(fields, unit, options.form, &data.locale)?,
				data.lenient_number_format(&NumberFormatterOptions::default()),
				data.plural_rules(false, false)?,
			))
		})?;
		Ok(Arc::new(move |value: f64| {
			let text = number.format(value.abs());
			Ok(pattern.format(value, &text, rules.select(value.abs())))
		}))
	}

	fn unit_formatter(
		&self,
		locale: Option<&str>,
		unit: &str,
		options: &UnitFormatterOptions,
	) -> Result<Formatter<f64>> {
		let (pattern, number, rules) = self.with_locale(locale, |data| {
			let units = data.main("units")?;
			Ok((
				UnitPattern::compile(units, unit, options.form, &data.locale)?,
				data.lenient_number_format(&options.number),
				data.plural_rules(false, false)?,
			))
		})?;
		Ok(Arc::new(move |value: f64| {
			let text = number.format(value);
			Ok(pattern.format(&text, rules.select_decimal(&plain_decimal(&text))))
		}))
	}
}

/// Strips grouping and localized symbols so plural operands can be read
/// from a formatted number.
fn plain_decimal(formatted: &str) -> String {
	let digits: String = formatted
		.chars()
		.filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
		.collect();
	// The last separator is the decimal one only when it is not a grouping of three.
	match digits.rfind(['.', ',']) {
		Some(index) if digits.len() - index - 1 != 3 => {
			let (int, frac) = digits.split_at(index);
			format!("{}.{}", int.replace([',', '.'], ""), &frac[1..])
		}
		_ => digits.replace([',', '.'], ""),
	}
}

/// Recursively merges `source` into `target`; non-object values overwrite.
fn merge(target: &mut Value, source: &Value) {
	match (target, source) {
		(Value::Object(target), Value::Object(source)) => {
			for (key, value) in source {
				match target.get_mut(key) {
					Some(existing) => merge(existing, value),
					None => {
						target.insert(key.clone(), value.clone());
					}
				}
			}
		}
		(target, source) => *target = source.clone(),
	}
}

/// A read view of the CLDR data for one locale.
struct LocaleData<'a> {
	data: &'a Value,
	locale: String,
	/// Locales whose `main` data may serve `locale`, most specific first.
	candidates: Vec<String>,
}

impl<'a> LocaleData<'a> {
	fn new(data: &'a Value, locale: String) -> Self {
		let mut candidates: Vec<String> = Vec::new();
		let mut push_chain = |tag: &str| {
			for candidate in generate_locales(tag).into_iter().rev() {
				if !candidates.contains(&candidate) {
					candidates.push(candidate);
				}
			}
		};
		push_chain(&locale);
		let likely = &data["supplemental"]["likelySubtags"];
		for key in [locale.as_str(), language(&locale)] {
			if let Some(expanded) = likely.get(key).and_then(Value::as_str) {
				push_chain(expanded);
			}
		}
		push_chain(ROOT_LOCALE);
		Self {
			data,
			locale,
			candidates,
		}
	}

	/// The first node at `path` (slash-separated) under `main/{candidate}`.
	fn main(&self, path: &str) -> Result<&'a Value> {
		self.candidates
			.iter()
			.filter_map(|candidate| {
				let node = self.data.get("main")?.get(candidate)?;
				path.split('/').try_fold(node, |node, segment| node.get(segment))
			})
			.next()
			.ok_or_else(|| I18nError::missing_cldr(&self.locale, path))
	}

	fn supplemental(&self, name: &str) -> Option<&'a Value> {
		self.data.get("supplemental")?.get(name)
	}

	/// Plural rules of the locale. Without data every number is `other`
	/// unless `required` is set.
	fn plural_rules(&self, ordinal: bool, required: bool) -> Result<PluralRules> {
		let name = if ordinal {
			"plurals-type-ordinal"
		} else {
			"plurals-type-cardinal"
		};
		let rules = self.supplemental(name).and_then(|all| {
			[self.locale.as_str(), language(&self.locale)]
				.into_iter()
				.find_map(|key| all.get(key).and_then(Value::as_object))
		});
		match rules {
			Some(rules) => PluralRules::from_cldr(rules),
			None if required => Err(I18nError::missing_cldr(
				&self.locale,
				format!("supplemental/{}/{}", name, language(&self.locale)),
			)),
			None => Ok(PluralRules::default()),
		}
	}

	fn symbols(&self) -> NumberSymbols {
		self.main("numbers/symbols-numberSystem-latn")
			.map(NumberSymbols::from_cldr)
			.unwrap_or_default()
	}

	fn pattern(&self, key: &str, field: &str) -> Result<NumberPattern> {
		let path = format!("numbers/{}", key);
		let pattern = self
			.main(&path)?
			.get(field)
			.and_then(Value::as_str)
			.ok_or_else(|| I18nError::missing_cldr(&self.locale, format!("{}/{}", path, field)))?;
		NumberPattern::parse(pattern)
	}

	fn number_format(
		&self,
		style: NumberStyle,
		options: &NumberFormatterOptions,
	) -> Result<NumberFormat> {
		let key = match style {
			NumberStyle::Decimal => "decimalFormats-numberSystem-latn",
			NumberStyle::Percent => "percentFormats-numberSystem-latn",
			NumberStyle::Scientific => "scientificFormats-numberSystem-latn",
		};
		let pattern = self.pattern(key, "standard")?;
		Ok(NumberFormat::new(pattern, self.symbols(), options))
	}

	/// The decimal format of the locale, or a Latin `#,##0.###` when the
	/// locale has no number data.
	fn lenient_number_format(&self, options: &NumberFormatterOptions) -> NumberFormat {
		self.number_format(options.style, options)
			.unwrap_or_else(|_| NumberFormat::fallback(options))
	}

	fn message_locale(&self) -> Result<MessageLocale> {
		let defaults = NumberFormatterOptions::default();
		Ok(MessageLocale {
			cardinal: self.plural_rules(false, false)?,
			ordinal: self.plural_rules(true, false)?,
			decimal: self.lenient_number_format(&defaults),
			integer: self.lenient_number_format(&defaults.clone().maximum_fraction_digits(0)),
			percent: self.lenient_number_format(&defaults.percent()),
		})
	}

	/// Fraction digits of `currency` from `currencyData`, 2 by default.
	fn currency_digits(&self, currency: &str) -> usize {
		let fractions = self
			.supplemental("currencyData")
			.and_then(|data| data.get("fractions"));
		[currency, "DEFAULT"]
			.into_iter()
			.find_map(|code| {
				fractions?
					.get(code)?
					.get("_digits")?
					.as_str()?
					.parse()
					.ok()
			})
			.unwrap_or(2)
	}

	fn currency_formatter(
		&self,
		currency: &str,
		options: &CurrencyFormatterOptions,
	) -> Result<Formatter<f64>> {
		let currency = currency.to_ascii_uppercase();
		let digits = self.currency_digits(&currency);
		let number_options = NumberFormatterOptions {
			minimum_fraction_digits: Some(options.minimum_fraction_digits.unwrap_or(digits)),
			maximum_fraction_digits: Some(options.maximum_fraction_digits.unwrap_or(digits)),
			round: options.round,
			..NumberFormatterOptions::default()
		};
		let names = self.main(&format!("numbers/currencies/{}", currency)).ok();
		let name = |field: &str| {
			names
				.and_then(|n| n.get(field))
				.and_then(Value::as_str)
				.map(str::to_string)
		};
		let symbols = self.symbols();
		let key = "currencyFormats-numberSystem-latn";

		match options.style {
			CurrencyStyle::Symbol | CurrencyStyle::Code | CurrencyStyle::Accounting => {
				let field = if options.style == CurrencyStyle::Accounting {
					"accounting"
				} else {
					"standard"
				};
				let pattern = self.pattern(key, field)?;
				let display = match options.style {
					CurrencyStyle::Code => currency.clone(),
					_ => name("symbol").unwrap_or_else(|| currency.clone()),
				};
				let format = NumberFormat::new(pattern, symbols, &number_options).with_currency(display);
				Ok(Arc::new(move |value: f64| Ok(format.format(value))))
			}
			CurrencyStyle::Name => {
				let number = self.number_format(NumberStyle::Decimal, &number_options)?;
				let rules = self.plural_rules(false, false)?;
				let currency_formats = self.main(&format!("numbers/{}", key))?.clone();
				let display_names: Vec<(PluralCategory, String)> = PluralCategory::ALL
					.iter()
					.filter_map(|category| {
						let text = name(&format!("displayName-count-{}", category))
							.or_else(|| name("displayName"))?;
						Some((*category, text))
					})
					.collect();
				Ok(Arc::new(move |value: f64| {
					let text = number.format(value);
					let category = rules.select_decimal(&plain_decimal(&text));
					let pick = |prefix: &str| {
						currency_formats
							.get(format!("{}{}", prefix, category))
							.or_else(|| currency_formats.get(format!("{}other", prefix)))
							.and_then(Value::as_str)
							.map(str::to_string)
					};
					let pattern = pick("unitPattern-count-").unwrap_or_else(|| "{0} {1}".to_string());
					let display = display_names
						.iter()
						.find(|(c, _)| *c == category)
						.or_else(|| display_names.iter().find(|(c, _)| *c == PluralCategory::Other))
						.map(|(_, n)| n.as_str())
						.unwrap_or(currency.as_str());
					Ok(pattern.replace("{0}", &text).replace("{1}", display))
				}))
			}
		}
	}

	fn date_pattern(&self, options: &DateFormatterOptions) -> Result<(DatePattern, CalendarNames)> {
		let zones = self.main("dates/timeZoneNames").unwrap_or(&NULL);
		if let Some(raw) = &options.raw {
			let names = self
				.main("dates/calendars/gregorian")
				.map(|gregorian| CalendarNames::from_cldr(gregorian, zones))
				.unwrap_or_default();
			return Ok((DatePattern::parse(raw)?, names));
		}

		let gregorian = self.main("dates/calendars/gregorian")?;
		let names = CalendarNames::from_cldr(gregorian, zones);
		let named = |node: &str, style: DateStyle| {
			gregorian[node]
				.get(style.as_str())
				.and_then(Value::as_str)
				.map(str::to_string)
				.ok_or_else(|| {
					I18nError::missing_cldr(
						&self.locale,
						format!("dates/calendars/gregorian/{}/{}", node, style.as_str()),
					)
				})
		};
		let combine = |glue: DateStyle, date: &str, time: &str| -> Result<String> {
			Ok(named("dateTimeFormats", glue)?
				.replace("{1}", date)
				.replace("{0}", time))
		};

		let pattern = if let Some(skeleton) = &options.skeleton {
			self.skeleton_pattern(gregorian, skeleton, &combine)?
		} else if let Some(datetime) = options.datetime {
			combine(
				datetime,
				&named("dateFormats", datetime)?,
				&named("timeFormats", datetime)?,
			)?
		} else if let Some(date) = options.date {
			named("dateFormats", date)?
		} else if let Some(time) = options.time {
			named("timeFormats", time)?
		} else {
			self.skeleton_pattern(gregorian, DateFormatterOptions::DEFAULT_SKELETON, &combine)?
		};
		Ok((DatePattern::parse(&pattern)?, names))
	}

	/// Resolves a skeleton such as `yMMMd` or `yMdjm` through
	/// `availableFormats`, joining date and time halves with the medium
	/// `dateTimeFormats` glue when only the halves are listed.
	fn skeleton_pattern(
		&self,
		gregorian: &Value,
		skeleton: &str,
		combine: &dyn Fn(DateStyle, &str, &str) -> Result<String>,
	) -> Result<String> {
		let available = &gregorian["dateTimeFormats"]["availableFormats"];
		let lookup = |skeleton: &str| {
			available
				.get(skeleton)
				.and_then(Value::as_str)
				.map(str::to_string)
		};
		if let Some(pattern) = lookup(skeleton) {
			return Ok(pattern);
		}

		let is_time = |c: char| "hHkKjJCmsSaAbBzZOvVXx".contains(c);
		let date: String = skeleton.chars().filter(|c| !is_time(*c)).collect();
		let time: String = skeleton.chars().filter(|c| is_time(*c)).collect();
		let missing = || {
			I18nError::missing_cldr(
				&self.locale,
				format!("dates/calendars/gregorian/dateTimeFormats/availableFormats/{}", skeleton),
			)
		};
		match (date.is_empty(), time.is_empty()) {
			(false, false) => {
				let date = lookup(&date).ok_or_else(missing)?;
				let time = lookup(&time).ok_or_else(missing)?;
				combine(DateStyle::Medium, &date, &time)
			}
			_ => Err(missing()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn engine() -> CldrEngine {
		let engine = CldrEngine::new();
		engine
			.load(&json!({
				"supplemental": {
					"likelySubtags": { "en": "en-Latn-US", "fr": "fr-Latn-FR" },
					"plurals-type-cardinal": {
						"en": {
							"pluralRule-count-one": "i = 1 and v = 0",
							"pluralRule-count-other": ""
						},
						"fr": {
							"pluralRule-count-one": "i = 0,1",
							"pluralRule-count-other": ""
						}
					},
					"currencyData": { "fractions": {
						"JPY": { "_digits": "0" },
						"DEFAULT": { "_digits": "2" }
					} }
				},
				"main": {
					"en": {
						"numbers": {
							"symbols-numberSystem-latn": { "decimal": ".", "group": "," },
							"decimalFormats-numberSystem-latn": { "standard": "#,##0.###" },
							"percentFormats-numberSystem-latn": { "standard": "#,##0%" },
							"currencyFormats-numberSystem-latn": {
								"standard": "¤#,##0.00",
								"accounting": "¤#,##0.00;(¤#,##0.00)",
								"unitPattern-count-one": "{0} {1}",
								"unitPattern-count-other": "{0} {1}"
							},
							"currencies": {
								"USD": {
									"symbol": "$",
									"displayName": "US Dollar",
									"displayName-count-one": "US dollar",
									"displayName-count-other": "US dollars"
								},
								"JPY": { "symbol": "¥" }
							}
						}
					},
					"fr": {
						"numbers": {
							"symbols-numberSystem-latn": { "decimal": ",", "group": "\u{202f}" },
							"decimalFormats-numberSystem-latn": { "standard": "#,##0.###" }
						}
					}
				}
			}))
			.unwrap();
		engine
	}

	#[rstest]
	fn test_number_formatter_uses_locale_symbols(engine: CldrEngine) {
		let options = NumberFormatterOptions::default();
		let en = engine.number_formatter(Some("en-US"), &options).unwrap();
		let fr = engine.number_formatter(Some("fr-CA"), &options).unwrap();
		assert_eq!(en(1234.5).unwrap(), "1,234.5");
		assert_eq!(fr(1234.5).unwrap(), "1\u{202f}234,5");
	}

	#[rstest]
	fn test_default_locale_is_required(engine: CldrEngine) {
		// Arrange
		let options = NumberFormatterOptions::default();

		// Act
		let before = engine.number_formatter(None, &options);
		engine.set_locale("fr");
		let after = engine.number_formatter(None, &options).unwrap();

		// Assert
		assert!(matches!(before, Err(I18nError::DefaultLocaleNotDefined)));
		assert_eq!(after(0.5).unwrap(), "0,5");
		assert_eq!(engine.locale().as_deref(), Some("fr"));
	}

	#[rstest]
	fn test_missing_locale_data(engine: CldrEngine) {
		let result = engine.number_formatter(Some("de"), &NumberFormatterOptions::default());
		assert!(matches!(result, Err(I18nError::MissingCldrData { ref locale, .. }) if locale == "de"));
	}

	#[rstest]
	#[case(CurrencyStyle::Symbol, "USD", 1234.5, "$1,234.50")]
	#[case(CurrencyStyle::Code, "USD", 3.0, "USD\u{a0}3.00")]
	#[case(CurrencyStyle::Accounting, "USD", -5.0, "($5.00)")]
	#[case(CurrencyStyle::Name, "USD", 1.0, "1.00 US dollars")]
	#[case(CurrencyStyle::Symbol, "JPY", 1234.4, "¥1,234")]
	#[case(CurrencyStyle::Symbol, "EUR", 2.0, "EUR\u{a0}2.00")]
	fn test_currency_styles(
		engine: CldrEngine,
		#[case] style: CurrencyStyle,
		#[case] currency: &str,
		#[case] value: f64,
		#[case] expected: &str,
	) {
		let options = CurrencyFormatterOptions::default().style(style);
		let format = engine.currency_formatter(Some("en"), currency, &options).unwrap();
		assert_eq!(format(value).unwrap(), expected);
	}

	#[rstest]
	fn test_currency_name_singular(engine: CldrEngine) {
		let options = CurrencyFormatterOptions::default()
			.style(CurrencyStyle::Name)
			.maximum_fraction_digits(0)
			.minimum_fraction_digits(0);
		let format = engine.currency_formatter(Some("en"), "usd", &options).unwrap();
		assert_eq!(format(1.0).unwrap(), "1 US dollar");
	}

	#[rstest]
	fn test_message_lookup_walks_the_chain(engine: CldrEngine) {
		// Arrange
		let root: HashMap<String, String> = [("hi".to_string(), "Hi {name}".to_string())].into();
		let fr: HashMap<String, String> = [(
			"count".to_string(),
			"{n, plural, one {# fichier} other {# fichiers}}".to_string(),
		)]
		.into();
		engine.load_messages(ROOT_LOCALE, "b", Arc::new(root)).unwrap();
		engine.load_messages("fr", "b", Arc::new(fr)).unwrap();

		// Act
		let hi = engine.message_formatter(Some("fr-CA"), "b", "hi").unwrap();
		let count = engine.message_formatter(Some("fr-CA"), "b", "count").unwrap();

		// Assert
		assert_eq!(hi(&FormatArgs::from([("name", "Ana")])).unwrap(), "Hi Ana");
		assert_eq!(count(&FormatArgs::from([("n", 1.5)])).unwrap(), "1,5 fichier");
		assert_eq!(count(&FormatArgs::from([("n", 2)])).unwrap(), "2 fichiers");
		assert!(matches!(
			engine.message_formatter(Some("fr"), "b", "nope"),
			Err(I18nError::MissingMessage { .. })
		));
	}

	#[rstest]
	fn test_plural_generator(engine: CldrEngine) {
		let cardinal = engine
			.plural_generator(Some("en"), &PluralGeneratorOptions::default())
			.unwrap();
		assert_eq!(cardinal(1.0), PluralCategory::One);
		assert_eq!(cardinal(2.0), PluralCategory::Other);
		assert!(engine
			.plural_generator(Some("en"), &PluralGeneratorOptions::ordinal())
			.is_err());
	}

	#[rstest]
	fn test_load_merges_documents(engine: CldrEngine) {
		// Arrange
		let extra = json!({
			"main": { "en": { "numbers": {
				"scientificFormats-numberSystem-latn": { "standard": "#E0" }
			} } }
		});

		// Act
		engine.load(&extra).unwrap();
		let options = NumberFormatterOptions::default().style(NumberStyle::Scientific);
		let scientific = engine.number_formatter(Some("en"), &options).unwrap();
		let decimal = engine
			.number_formatter(Some("en"), &NumberFormatterOptions::default())
			.unwrap();

		// Assert
		assert_eq!(scientific(12345.0).unwrap(), "1E4");
		assert_eq!(decimal(1.5).unwrap(), "1.5");
	}

	#[rstest]
	fn test_raw_date_pattern_without_calendar_data(engine: CldrEngine) {
		let options = DateFormatterOptions::raw("y-MM-dd HH:mm");
		let format = engine.date_formatter(Some("en"), &options).unwrap();
		let value = NaiveDate::from_ymd_opt(2020, 2, 29)
			.unwrap()
			.and_hms_opt(8, 5, 0)
			.unwrap();
		assert_eq!(format(value).unwrap(), "2020-02-29 08:05");
	}

	#[rstest]
	#[case("1,234", "1234")]
	#[case("1.5", "1.5")]
	#[case("1\u{202f}234,5", "1234.5")]
	#[case("12.30 km", "12.30")]
	fn test_plain_decimal(#[case] formatted: &str, #[case] expected: &str) {
		assert_eq!(plain_decimal(formatted), expected);
	}
}
