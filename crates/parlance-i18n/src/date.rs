//! Date and relative-time front-ends.

use chrono::NaiveDateTime;

use crate::args::{FormatterArgs, normalize_formatter_args};
use crate::context::I18n;
use crate::engine::{Formatter, Parser};
use crate::error::Result;
use crate::unit::UnitForm;

/// Length of a named CLDR date or time format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
	/// "Saturday, February 29, 2020"
	Full,
	/// "February 29, 2020"
	Long,
	/// "Feb 29, 2020"
	Medium,
	/// "2/29/20"
	Short,
}

impl DateStyle {
	/// The CLDR key of this style.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Full => "full",
			Self::Long => "long",
			Self::Medium => "medium",
			Self::Short => "short",
		}
	}
}

/// Options for date formatters and parsers.
///
/// The first set field wins, in the order `raw`, `skeleton`, `datetime`,
/// `date`, `time`. With none set the [`DEFAULT_SKELETON`] is used.
///
/// [`DEFAULT_SKELETON`]: DateFormatterOptions::DEFAULT_SKELETON
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFormatterOptions {
	/// Named date format.
	pub date: Option<DateStyle>,
	/// Named time format.
	pub time: Option<DateStyle>,
	/// Named date and time formats joined by the matching glue pattern.
	pub datetime: Option<DateStyle>,
	/// `availableFormats` skeleton such as `yMMMd`.
	pub skeleton: Option<String>,
	/// Literal pattern such as `y-MM-dd`.
	pub raw: Option<String>,
	/// Offset rendered by zone fields, in minutes east of UTC.
	pub utc_offset_minutes: i32,
}

impl DateFormatterOptions {
	/// Skeleton used when no format is chosen.
	pub const DEFAULT_SKELETON: &'static str = "yMd";

	/// A named date format.
	pub fn date(style: DateStyle) -> Self {
		Self {
			date: Some(style),
			..Self::default()
		}
	}

	/// A named time format.
	pub fn time(style: DateStyle) -> Self {
		Self {
			time: Some(style),
			..Self::default()
		}
	}

	/// Named date and time formats.
	pub fn datetime(style: DateStyle) -> Self {
		Self {
			datetime: Some(style),
			..Self::default()
		}
	}

	/// A skeleton resolved through `availableFormats`.
	pub fn skeleton(skeleton: impl Into<String>) -> Self {
		Self {
			skeleton: Some(skeleton.into()),
			..Self::default()
		}
	}

	/// A literal pattern.
	pub fn raw(pattern: impl Into<String>) -> Self {
		Self {
			raw: Some(pattern.into()),
			..Self::default()
		}
	}

	/// Sets the offset rendered by zone fields.
	pub fn utc_offset(mut self, minutes: i32) -> Self {
		self.utc_offset_minutes = minutes;
		self
	}
}

/// Options for relative-time formatters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelativeTimeFormatterOptions {
	/// Which `dates/fields` variant to use.
	pub form: UnitForm,
}

impl RelativeTimeFormatterOptions {
	/// Options with the given form.
	pub fn form(form: UnitForm) -> Self {
		Self { form }
	}
}

impl I18n {
	/// A date formatter.
	pub fn get_date_formatter<'a>(
		&self,
		args: impl Into<FormatterArgs<'a, DateFormatterOptions>>,
	) -> Result<Formatter<NaiveDateTime>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine()
			.date_formatter(self.instance_locale(locale.as_deref()).as_deref(), &options)
	}

	/// Formats `value` as a date.
	pub fn format_date<'a>(
		&self,
		value: NaiveDateTime,
		args: impl Into<FormatterArgs<'a, DateFormatterOptions>>,
	) -> Result<String> {
		(self.get_date_formatter(args)?)(value)
	}

	/// A date parser.
	pub fn get_date_parser<'a>(
		&self,
		args: impl Into<FormatterArgs<'a, DateFormatterOptions>>,
	) -> Result<Parser<NaiveDateTime>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine()
			.date_parser(self.instance_locale(locale.as_deref()).as_deref(), &options)
	}

	/// Parses a localized date.
	pub fn parse_date<'a>(
		&self,
		input: &str,
		args: impl Into<FormatterArgs<'a, DateFormatterOptions>>,
	) -> Result<NaiveDateTime> {
		(self.get_date_parser(args)?)(input)
	}

	/// A formatter for offsets in `unit` (`day`, `hour`, ...).
	pub fn get_relative_time_formatter<'a>(
		&self,
		unit: &str,
		args: impl Into<FormatterArgs<'a, RelativeTimeFormatterOptions>>,
	) -> Result<Formatter<f64>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine().relative_time_formatter(
			self.instance_locale(locale.as_deref()).as_deref(),
			unit,
			&options,
		)
	}

	/// Formats `value` units from now, e.g. "in 3 days" or "yesterday".
	pub fn format_relative_time<'a>(
		&self,
		value: f64,
		unit: &str,
		args: impl Into<FormatterArgs<'a, RelativeTimeFormatterOptions>>,
	) -> Result<String> {
		(self.get_relative_time_formatter(unit, args)?)(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(DateFormatterOptions::date(DateStyle::Long), Some(DateStyle::Long), None)]
	#[case(DateFormatterOptions::time(DateStyle::Short), None, Some(DateStyle::Short))]
	#[case(DateFormatterOptions::default(), None, None)]
	fn test_named_constructors(
		#[case] options: DateFormatterOptions,
		#[case] date: Option<DateStyle>,
		#[case] time: Option<DateStyle>,
	) {
		assert_eq!(options.date, date);
		assert_eq!(options.time, time);
		assert_eq!(options.utc_offset_minutes, 0);
	}

	#[rstest]
	fn test_builders_keep_other_fields() {
		let options = DateFormatterOptions::skeleton("yMMMd").utc_offset(-300);
		assert_eq!(options.skeleton.as_deref(), Some("yMMMd"));
		assert_eq!(options.utc_offset_minutes, -300);
		assert!(options.raw.is_none());
	}
}
