//! Unit front-end.

use crate::args::{FormatterArgs, normalize_formatter_args};
use crate::context::I18n;
use crate::engine::Formatter;
use crate::error::Result;
use crate::number::NumberFormatterOptions;

/// Width of unit and relative-time names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnitForm {
	/// "5 kilometers"
	#[default]
	Long,
	/// "5 km"
	Short,
	/// "5km"
	Narrow,
}

impl UnitForm {
	/// The CLDR key of this form.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Long => "long",
			Self::Short => "short",
			Self::Narrow => "narrow",
		}
	}
}

/// Options for unit formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFormatterOptions {
	/// Name width.
	pub form: UnitForm,
	/// How the quantity itself is formatted.
	pub number: NumberFormatterOptions,
}

impl UnitFormatterOptions {
	/// Sets the form.
	pub fn form(mut self, form: UnitForm) -> Self {
		self.form = form;
		self
	}

	/// Sets the number options.
	pub fn number(mut self, number: NumberFormatterOptions) -> Self {
		self.number = number;
		self
	}
}

impl I18n {
	/// A formatter for quantities of `unit`, e.g. `kilometer` or
	/// `kilometer-per-hour`.
	pub fn get_unit_formatter<'a>(
		&self,
		unit: &str,
		args: impl Into<FormatterArgs<'a, UnitFormatterOptions>>,
	) -> Result<Formatter<f64>> {
		let (locale, options) = normalize_formatter_args(args.into()).options_or_default();
		self.engine().unit_formatter(
			self.instance_locale(locale.as_deref()).as_deref(),
			unit,
			&options,
		)
	}

	/// Formats `value` units of `unit`.
	pub fn format_unit<'a>(
		&self,
		value: f64,
		unit: &str,
		args: impl Into<FormatterArgs<'a, UnitFormatterOptions>>,
	) -> Result<String> {
		(self.get_unit_formatter(unit, args)?)(value)
	}
}
