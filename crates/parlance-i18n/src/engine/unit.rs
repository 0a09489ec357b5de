//! Unit and relative-time patterns keyed by plural category.

use serde_json::{Map, Value};

use crate::engine::plural::PluralCategory;
use crate::error::{I18nError, Result};
use crate::unit::UnitForm;

/// `{0} day` / `{0} days` style patterns keyed by plural category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CountPatterns {
	patterns: Vec<(PluralCategory, String)>,
}

impl CountPatterns {
	fn from_cldr(node: &Map<String, Value>, prefix: &str) -> Self {
		let patterns = node
			.iter()
			.filter_map(|(key, value)| {
				let category = key.strip_prefix(prefix)?.parse().ok()?;
				Some((category, value.as_str()?.to_string()))
			})
			.collect();
		Self { patterns }
	}

	fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	fn get(&self, category: PluralCategory) -> Option<&str> {
		let find = |wanted: PluralCategory| {
			self.patterns
				.iter()
				.find(|(c, _)| *c == wanted)
				.map(|(_, p)| p.as_str())
		};
		find(category).or_else(|| find(PluralCategory::Other))
	}

	fn apply(&self, category: PluralCategory, number: &str) -> String {
		self.get(category)
			.map(|pattern| pattern.replace("{0}", number))
			.unwrap_or_else(|| number.to_string())
	}
}

/// Finds `unit` in a `units/{form}` node: either the exact key (`length-meter`)
/// or a key whose last segments equal it (`meter` matches `length-meter`).
fn find_unit<'a>(units: &'a Map<String, Value>, unit: &str) -> Option<&'a Map<String, Value>> {
	let suffix = format!("-{}", unit);
	units
		.get(unit)
		.or_else(|| {
			units
				.iter()
				.find(|(key, _)| key.ends_with(&suffix))
				.map(|(_, value)| value)
		})
		.and_then(Value::as_object)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UnitKind {
	Simple(CountPatterns),
	Per {
		numerator: CountPatterns,
		per_unit_pattern: Option<String>,
		compound: String,
		denominator: String,
	},
}

/// A unit compiled from one locale's `units` data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnitPattern {
	kind: UnitKind,
}

impl UnitPattern {
	pub(crate) fn compile(units: &Value, unit: &str, form: UnitForm, locale: &str) -> Result<Self> {
		let path = format!("units/{}", form.as_str());
		let node = units
			.get(form.as_str())
			.and_then(Value::as_object)
			.ok_or_else(|| I18nError::missing_cldr(locale, path.clone()))?;
		let missing = || I18nError::missing_cldr(locale, format!("{}/{}", path, unit));

		if let Some(found) = find_unit(node, unit) {
			return Ok(Self {
				kind: UnitKind::Simple(CountPatterns::from_cldr(found, "unitPattern-count-")),
			});
		}

		let (numerator, denominator) = unit.split_once("-per-").ok_or_else(missing)?;
		let numerator = find_unit(node, numerator).ok_or_else(missing)?;
		let denominator = find_unit(node, denominator).ok_or_else(missing)?;
		let compound = node
			.get("per")
			.and_then(|per| per.get("compoundUnitPattern"))
			.and_then(Value::as_str)
			.unwrap_or("{0}/{1}")
			.to_string();
		let singular = CountPatterns::from_cldr(denominator, "unitPattern-count-")
			.get(PluralCategory::One)
			.map(|p| p.replace("{0}", "").trim().to_string())
			.unwrap_or_default();

		Ok(Self {
			kind: UnitKind::Per {
				numerator: CountPatterns::from_cldr(numerator, "unitPattern-count-"),
				per_unit_pattern: denominator
					.get("perUnitPattern")
					.and_then(Value::as_str)
					.map(str::to_string),
				compound,
				denominator: singular,
			},
		})
	}

	/// Renders an already formatted number of the given plural category.
	pub(crate) fn format(&self, number: &str, category: PluralCategory) -> String {
		match &self.kind {
			UnitKind::Simple(patterns) => patterns.apply(category, number),
			UnitKind::Per {
				numerator,
				per_unit_pattern,
				compound,
				denominator,
			} => {
				let quantity = numerator.apply(category, number);
				match per_unit_pattern {
					Some(pattern) => pattern.replace("{0}", &quantity),
					None => compound.replace("{0}", &quantity).replace("{1}", denominator),
				}
			}
		}
	}
}

/// Relative-time patterns of one `dates/fields` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelativeTimePattern {
	/// `relative-type--1`, `-0`, `-1`: "yesterday", "today", "tomorrow".
	named: Vec<(i64, String)>,
	future: CountPatterns,
	past: CountPatterns,
}

impl RelativeTimePattern {
	pub(crate) fn compile(fields: &Value, unit: &str, form: UnitForm, locale: &str) -> Result<Self> {
		let key = match form {
			UnitForm::Long => unit.to_string(),
			other => format!("{}-{}", unit, other.as_str()),
		};
		let node = fields
			.get(&key)
			.or_else(|| fields.get(unit))
			.and_then(Value::as_object)
			.ok_or_else(|| I18nError::missing_cldr(locale, format!("dates/fields/{}", key)))?;

		let named = node
			.iter()
			.filter_map(|(key, value)| {
				let offset = key.strip_prefix("relative-type-")?.parse().ok()?;
				Some((offset, value.as_str()?.to_string()))
			})
			.collect();
		let patterns = |direction: &str| {
			node.get(&format!("relativeTime-type-{}", direction))
				.and_then(Value::as_object)
				.map(|n| CountPatterns::from_cldr(n, "relativeTimePattern-count-"))
				.unwrap_or_default()
		};
		let future = patterns("future");
		let past = patterns("past");
		if future.is_empty() && past.is_empty() {
			return Err(I18nError::missing_cldr(
				locale,
				format!("dates/fields/{}/relativeTime-type-future", key),
			));
		}
		Ok(Self { named, future, past })
	}

	/// Renders `value` units from now; `number` is `|value|` formatted and
	/// `category` its plural category.
	pub(crate) fn format(&self, value: f64, number: &str, category: PluralCategory) -> String {
		if value.fract() == 0.0
			&& let Some((_, text)) = self.named.iter().find(|(offset, _)| *offset as f64 == value)
		{
			return text.clone();
		}
		if value < 0.0 || (value == 0.0 && value.is_sign_negative()) {
			self.past.apply(category, number)
		} else {
			self.future.apply(category, number)
		}
	}
}
