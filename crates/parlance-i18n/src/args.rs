//! Message arguments and formatter argument normalization.

use std::collections::BTreeMap;
use std::fmt;

use crate::date::{DateFormatterOptions, RelativeTimeFormatterOptions};
use crate::locale::normalize_locale;
use crate::number::{
	CurrencyFormatterOptions, NumberFormatterOptions, NumberParserOptions, PluralGeneratorOptions,
};
use crate::unit::UnitFormatterOptions;

/// A value substituted into a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
	/// Text, used as-is and matched by `select`.
	String(String),
	/// A number, usable by `plural`, `selectordinal` and `number` arguments.
	Number(f64),
}

impl fmt::Display for ArgValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::String(s) => f.write_str(s),
			Self::Number(n) => write!(f, "{}", n),
		}
	}
}

impl From<&str> for ArgValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for ArgValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

macro_rules! impl_number_arg {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for ArgValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_number_arg!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Named arguments for a message formatter.
///
/// # Examples
///
/// ```
/// use parlance_i18n::{ArgValue, FormatArgs};
///
/// let args = FormatArgs::new().with("name", "Sam").with("count", 3);
/// assert_eq!(args.get("name"), Some(&ArgValue::from("Sam")));
/// assert_eq!(args.get("count"), Some(&ArgValue::Number(3.0)));
///
/// let same = FormatArgs::from([("name", "Sam")]);
/// assert_eq!(same.get("name").map(ToString::to_string).as_deref(), Some("Sam"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatArgs {
	values: BTreeMap<String, ArgValue>,
}

impl FormatArgs {
	/// No arguments.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces `key`.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
		self.values.insert(key.into(), value.into());
		self
	}

	/// Inserts `key` in place.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
		self.values.insert(key.into(), value.into());
	}

	/// The value of `key`.
	pub fn get(&self, key: &str) -> Option<&ArgValue> {
		self.values.get(key)
	}

	/// Whether no argument is set.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for FormatArgs
where
	K: Into<String>,
	V: Into<ArgValue>,
{
	fn from(pairs: [(K, V); N]) -> Self {
		pairs
			.into_iter()
			.fold(Self::new(), |args, (key, value)| args.with(key, value))
	}
}

impl<K, V> FromIterator<(K, V)> for FormatArgs
where
	K: Into<String>,
	V: Into<ArgValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		iter.into_iter()
			.fold(Self::new(), |args, (key, value)| args.with(key, value))
	}
}

/// The "locale or options" argument every formatter front-end accepts.
///
/// Built from `()`, a locale `&str`, an options value, or an
/// `(options, locale)` pair.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatterArgs<'a, O> {
	/// Default options for the root locale.
	Default,
	/// Default options for a locale.
	Locale(&'a str),
	/// Explicit options for the root locale.
	Options(O),
	/// Explicit options for a locale.
	OptionsAndLocale(O, &'a str),
}

impl<O> From<()> for FormatterArgs<'_, O> {
	fn from(_: ()) -> Self {
		Self::Default
	}
}

impl<'a, O> From<&'a str> for FormatterArgs<'a, O> {
	fn from(locale: &'a str) -> Self {
		Self::Locale(locale)
	}
}

impl<'a, O> From<Option<&'a str>> for FormatterArgs<'a, O> {
	fn from(locale: Option<&'a str>) -> Self {
		match locale {
			Some(locale) => Self::Locale(locale),
			None => Self::Default,
		}
	}
}

macro_rules! impl_formatter_args {
	($($options:ty),* $(,)?) => {
		$(
			impl<'a> From<$options> for FormatterArgs<'a, $options> {
				fn from(options: $options) -> Self {
					Self::Options(options)
				}
			}

			impl<'a> From<($options, &'a str)> for FormatterArgs<'a, $options> {
				fn from((options, locale): ($options, &'a str)) -> Self {
					Self::OptionsAndLocale(options, locale)
				}
			}
		)*
	};
}

impl_formatter_args!(
	NumberFormatterOptions,
	NumberParserOptions,
	CurrencyFormatterOptions,
	PluralGeneratorOptions,
	DateFormatterOptions,
	RelativeTimeFormatterOptions,
	UnitFormatterOptions,
);

/// [`FormatterArgs`] with the locale normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedArgs<O> {
	/// Normalized locale, `None` when absent or empty.
	pub locale: Option<String>,
	/// Explicit options, if any.
	pub options: Option<O>,
}

impl<O: Default> NormalizedArgs<O> {
	/// The explicit options, or the defaults.
	pub fn options_or_default(self) -> (Option<String>, O) {
		(self.locale, self.options.unwrap_or_default())
	}
}

/// Splits the front-end argument shapes into a locale and options.
///
/// # Examples
///
/// ```
/// use parlance_i18n::{normalize_formatter_args, NumberFormatterOptions};
///
/// let args = normalize_formatter_args::<NumberFormatterOptions>("en_US".into());
/// assert_eq!(args.locale.as_deref(), Some("en-US"));
/// assert!(args.options.is_none());
///
/// let args = normalize_formatter_args::<NumberFormatterOptions>(
///     (NumberFormatterOptions::default().percent(), "fr").into(),
/// );
/// assert_eq!(args.locale.as_deref(), Some("fr"));
/// assert!(args.options.is_some());
/// ```
pub fn normalize_formatter_args<O>(args: FormatterArgs<'_, O>) -> NormalizedArgs<O> {
	let (locale, options) = match args {
		FormatterArgs::Default => (None, None),
		FormatterArgs::Locale(locale) => (Some(locale), None),
		FormatterArgs::Options(options) => (None, Some(options)),
		FormatterArgs::OptionsAndLocale(options, locale) => (Some(locale), Some(options)),
	};
	NormalizedArgs {
		locale: locale.map(normalize_locale).filter(|l| !l.is_empty()),
		options,
	}
}
