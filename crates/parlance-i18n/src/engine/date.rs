//! CLDR date patterns (`y-MM-dd`, `EEEE, MMMM d, y`, `h:mm a`).

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::Value;

use crate::error::{I18nError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
	Literal(String),
	Era(usize),
	Year(usize),
	Month(usize),
	StandaloneMonth(usize),
	Day(usize),
	DayOfYear(usize),
	Weekday(usize),
	DayPeriod(usize),
	Hour12(usize),
	Hour23(usize),
	Hour11(usize),
	Hour24(usize),
	Minute(usize),
	Second(usize),
	Fraction(usize),
	ZoneGmt(usize),
	ZoneIso(char, usize),
	Quarter(usize),
}

/// Localized calendar names (`dates/calendars/gregorian`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CalendarNames {
	months: [Vec<String>; 3],
	standalone_months: [Vec<String>; 3],
	days: [Vec<String>; 3],
	am: String,
	pm: String,
	eras: [String; 2],
	gmt_format: String,
	gmt_zero_format: String,
	hour_format: String,
}

const WIDTHS: [&str; 3] = ["abbreviated", "wide", "narrow"];
const DAY_KEYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

impl Default for CalendarNames {
	fn default() -> Self {
		let months = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
		let wide_months = months(&[
			"January",
			"February",
			"March",
			"April",
			"May",
			"June",
			"July",
			"August",
			"September",
			"October",
			"November",
			"December",
		]);
		let abbreviated: Vec<String> = wide_months.iter().map(|m| m[..3].to_string()).collect();
		let narrow: Vec<String> = wide_months.iter().map(|m| m[..1].to_string()).collect();
		let wide_days = months(&[
			"Sunday",
			"Monday",
			"Tuesday",
			"Wednesday",
			"Thursday",
			"Friday",
			"Saturday",
		]);
		let short_days: Vec<String> = wide_days.iter().map(|d| d[..3].to_string()).collect();
		let narrow_days: Vec<String> = wide_days.iter().map(|d| d[..1].to_string()).collect();
		let month_set = [abbreviated, wide_months, narrow];
		Self {
			standalone_months: month_set.clone(),
			months: month_set,
			days: [short_days, wide_days, narrow_days],
			am: "AM".to_string(),
			pm: "PM".to_string(),
			eras: ["BC".to_string(), "AD".to_string()],
			gmt_format: "GMT{0}".to_string(),
			gmt_zero_format: "GMT".to_string(),
			hour_format: "+HH:mm;-HH:mm".to_string(),
		}
	}
}

impl CalendarNames {
	/// Reads names from a `gregorian` calendar node and a `timeZoneNames` node,
	/// keeping English names for anything absent.
	pub(crate) fn from_cldr(gregorian: &Value, zones: &Value) -> Self {
		let mut names = Self::default();
		for (index, width) in WIDTHS.iter().enumerate() {
			if let Some(list) = month_list(&gregorian["months"]["format"][width]) {
				names.months[index] = list;
			}
			if let Some(list) = month_list(&gregorian["months"]["stand-alone"][width]) {
				names.standalone_months[index] = list;
			} else {
				names.standalone_months[index] = names.months[index].clone();
			}
			let days = &gregorian["days"]["format"][width];
			let list: Option<Vec<String>> = DAY_KEYS
				.iter()
				.map(|key| days.get(key).and_then(Value::as_str).map(str::to_string))
				.collect();
			if let Some(list) = list {
				names.days[index] = list;
			}
		}
		let periods = &gregorian["dayPeriods"]["format"]["abbreviated"];
		if let Some(am) = periods.get("am").and_then(Value::as_str) {
			names.am = am.to_string();
		}
		if let Some(pm) = periods.get("pm").and_then(Value::as_str) {
			names.pm = pm.to_string();
		}
		let eras = &gregorian["eras"]["eraAbbr"];
		for (index, key) in ["0", "1"].iter().enumerate() {
			if let Some(era) = eras.get(key).and_then(Value::as_str) {
				names.eras[index] = era.to_string();
			}
		}
		let string = |key: &str| zones.get(key).and_then(Value::as_str).map(str::to_string);
		if let Some(format) = string("gmtFormat") {
			names.gmt_format = format;
		}
		if let Some(format) = string("gmtZeroFormat") {
			names.gmt_zero_format = format;
		}
		if let Some(format) = string("hourFormat") {
			names.hour_format = format;
		}
		names
	}

	fn width(count: usize) -> usize {
		match count {
			3 => 0,
			4 => 1,
			_ => 2,
		}
	}

	fn gmt(&self, offset_minutes: i32) -> String {
		if offset_minutes == 0 {
			return self.gmt_zero_format.clone();
		}
		let (positive, negative) = self
			.hour_format
			.split_once(';')
			.unwrap_or(("+HH:mm", "-HH:mm"));
		let pattern = if offset_minutes > 0 { positive } else { negative };
		let hours = offset_minutes.unsigned_abs() / 60;
		let minutes = offset_minutes.unsigned_abs() % 60;
		let hour = pattern
			.replace("HH", &format!("{:02}", hours))
			.replace('H', &hours.to_string())
			.replace("mm", &format!("{:02}", minutes));
		self.gmt_format.replace("{0}", &hour)
	}
}

fn month_list(node: &Value) -> Option<Vec<String>> {
	(1..=12)
		.map(|m| node.get(m.to_string()).and_then(Value::as_str).map(str::to_string))
		.collect()
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DatePattern {
	fields: Vec<Field>,
}

impl DatePattern {
	pub(crate) fn parse(pattern: &str) -> Result<Self> {
		let chars: Vec<char> = pattern.chars().collect();
		let mut fields = Vec::new();
		let mut literal = String::new();
		let mut pos = 0;

		while pos < chars.len() {
			let c = chars[pos];
			if c == '\'' {
				pos += 1;
				if chars.get(pos) == Some(&'\'') {
					literal.push('\'');
					pos += 1;
					continue;
				}
				loop {
					match chars.get(pos) {
						None => return Err(I18nError::invalid_pattern(pattern, "unterminated quote")),
						Some('\'') if chars.get(pos + 1) == Some(&'\'') => {
							literal.push('\'');
							pos += 2;
						}
						Some('\'') => {
							pos += 1;
							break;
						}
						Some(other) => {
							literal.push(*other);
							pos += 1;
						}
					}
				}
				continue;
			}
			if !c.is_ascii_alphabetic() {
				literal.push(c);
				pos += 1;
				continue;
			}

			let mut count = 1;
			while chars.get(pos + count) == Some(&c) {
				count += 1;
			}
			pos += count;
			if !literal.is_empty() {
				fields.push(Field::Literal(std::mem::take(&mut literal)));
			}
			fields.push(match c {
				'G' => Field::Era(count),
				'y' | 'Y' | 'u' => Field::Year(count),
				'M' => Field::Month(count),
				'L' => Field::StandaloneMonth(count),
				'd' => Field::Day(count),
				'D' => Field::DayOfYear(count),
				'E' => Field::Weekday(count.max(3)),
				'e' | 'c' => Field::Weekday(if count < 3 { 3 } else { count }),
				'a' | 'b' | 'B' => Field::DayPeriod(count),
				'h' => Field::Hour12(count),
				'H' => Field::Hour23(count),
				'K' => Field::Hour11(count),
				'k' => Field::Hour24(count),
				'm' => Field::Minute(count),
				's' => Field::Second(count),
				'S' => Field::Fraction(count),
				'z' | 'O' | 'v' | 'V' => Field::ZoneGmt(count),
				'X' | 'x' | 'Z' => Field::ZoneIso(c, count),
				'Q' | 'q' => Field::Quarter(count),
				other => {
					return Err(I18nError::invalid_pattern(
						pattern,
						format!("unsupported field '{}'", other),
					));
				}
			});
		}
		if !literal.is_empty() {
			fields.push(Field::Literal(literal));
		}
		Ok(Self { fields })
	}

	pub(crate) fn format(
		&self,
		value: &NaiveDateTime,
		names: &CalendarNames,
		offset_minutes: i32,
	) -> String {
		let mut out = String::new();
		for field in &self.fields {
			match field {
				Field::Literal(text) => out.push_str(text),
				Field::Era(_) => {
					out.push_str(&names.eras[usize::from(value.year() > 0)]);
				}
				Field::Year(count) => {
					let year = value.year();
					if *count == 2 {
						out.push_str(&format!("{:02}", year.rem_euclid(100)));
					} else {
						out.push_str(&pad(year, *count));
					}
				}
				Field::Month(count) | Field::StandaloneMonth(count) => {
					let month = value.month0() as usize;
					let list = if matches!(field, Field::Month(_)) {
						&names.months
					} else {
						&names.standalone_months
					};
					if *count <= 2 {
						out.push_str(&pad(value.month(), *count));
					} else {
						out.push_str(&list[CalendarNames::width(*count)][month]);
					}
				}
				Field::Day(count) => out.push_str(&pad(value.day(), *count)),
				Field::DayOfYear(count) => out.push_str(&pad(value.ordinal(), *count)),
				Field::Weekday(count) => {
					let day = value.weekday().num_days_from_sunday() as usize;
					out.push_str(&names.days[CalendarNames::width(*count)][day]);
				}
				Field::DayPeriod(_) => {
					out.push_str(if value.hour() < 12 { &names.am } else { &names.pm });
				}
				Field::Hour12(count) => {
					let hour = match value.hour() % 12 {
						0 => 12,
						h => h,
					};
					out.push_str(&pad(hour, *count));
				}
				Field::Hour23(count) => out.push_str(&pad(value.hour(), *count)),
				Field::Hour11(count) => out.push_str(&pad(value.hour() % 12, *count)),
				Field::Hour24(count) => {
					let hour = if value.hour() == 0 { 24 } else { value.hour() };
					out.push_str(&pad(hour, *count));
				}
				Field::Minute(count) => out.push_str(&pad(value.minute(), *count)),
				Field::Second(count) => out.push_str(&pad(value.second(), *count)),
				Field::Fraction(count) => {
					let nanos = format!("{:09}", value.nanosecond() % 1_000_000_000);
					out.push_str(&nanos[..(*count).min(9)]);
				}
				Field::ZoneGmt(_) => out.push_str(&names.gmt(offset_minutes)),
				Field::ZoneIso(symbol, count) => {
					out.push_str(&iso_offset(*symbol, *count, offset_minutes));
				}
				Field::Quarter(count) => {
					let quarter = value.month0() / 3 + 1;
					if *count <= 2 {
						out.push_str(&pad(quarter, *count));
					} else {
						out.push_str(&format!("Q{}", quarter));
					}
				}
			}
		}
		out
	}

	/// Parses text written in this pattern. Missing fields default to
	/// 1970-01-01 00:00:00.
	pub(crate) fn parse_value(&self, input: &str, names: &CalendarNames) -> Result<NaiveDateTime> {
		let mut rest = input.trim();
		let (mut year, mut month, mut day) = (1970, 1, 1);
		let (mut hour, mut minute, mut second) = (0u32, 0u32, 0u32);
		let mut pm: Option<bool> = None;
		let mut twelve_hour = false;

		let fail = |reason: &str| I18nError::parse(input, reason.to_string());

		for field in &self.fields {
			match field {
				Field::Literal(text) => {
					let text = text.trim();
					rest = rest.trim_start();
					rest = rest
						.strip_prefix(text)
						.ok_or_else(|| fail(&format!("expected '{}'", text)))?;
				}
				Field::Year(count) => {
					let (value, r) = take_number(rest, if *count == 2 { 2 } else { 9 })
						.ok_or_else(|| fail("expected year"))?;
					year = if *count == 2 { 2000 + value as i32 } else { value as i32 };
					rest = r;
				}
				Field::Month(count) | Field::StandaloneMonth(count) => {
					if *count <= 2 {
						let (value, r) = take_number(rest, 2).ok_or_else(|| fail("expected month"))?;
						month = value;
						rest = r;
					} else {
						let list = &names.months[CalendarNames::width(*count)];
						let (index, r) =
							take_name(rest, list).ok_or_else(|| fail("expected month name"))?;
						month = index as u32 + 1;
						rest = r;
					}
				}
				Field::Day(_) => {
					let (value, r) = take_number(rest, 2).ok_or_else(|| fail("expected day"))?;
					day = value;
					rest = r;
				}
				Field::Weekday(count) => {
					let list = &names.days[CalendarNames::width(*count)];
					let (_, r) = take_name(rest, list).ok_or_else(|| fail("expected weekday"))?;
					rest = r;
				}
				Field::Hour12(_) | Field::Hour11(_) | Field::Hour23(_) | Field::Hour24(_) => {
					twelve_hour = matches!(field, Field::Hour12(_) | Field::Hour11(_));
					let (value, r) = take_number(rest, 2).ok_or_else(|| fail("expected hour"))?;
					hour = if matches!(field, Field::Hour24(_)) && value == 24 { 0 } else { value };
					rest = r;
				}
				Field::Minute(_) => {
					let (value, r) = take_number(rest, 2).ok_or_else(|| fail("expected minute"))?;
					minute = value;
					rest = r;
				}
				Field::Second(_) => {
					let (value, r) = take_number(rest, 2).ok_or_else(|| fail("expected second"))?;
					second = value;
					rest = r;
				}
				Field::DayPeriod(_) => {
					let periods = [names.am.clone(), names.pm.clone()];
					let (index, r) =
						take_name(rest, &periods).ok_or_else(|| fail("expected day period"))?;
					pm = Some(index == 1);
					rest = r;
				}
				Field::Fraction(_) | Field::DayOfYear(_) | Field::Quarter(_) => {
					let (_, r) = take_number(rest, 9).ok_or_else(|| fail("expected digits"))?;
					rest = r;
				}
				Field::Era(_) | Field::ZoneGmt(_) | Field::ZoneIso(..) => {
					let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
					rest = &rest[end..];
				}
			}
		}
		if !rest.trim().is_empty() {
			return Err(fail("unexpected trailing text"));
		}
		if twelve_hour {
			match pm {
				Some(true) if hour < 12 => hour += 12,
				Some(false) if hour == 12 => hour = 0,
				_ => {}
			}
		}

		let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| fail("invalid date"))?;
		let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| fail("invalid time"))?;
		Ok(NaiveDateTime::new(date, time))
	}
}

fn pad(value: impl std::fmt::Display, width: usize) -> String {
	format!("{:0>width$}", value.to_string(), width = width)
}

fn iso_offset(symbol: char, count: usize, offset_minutes: i32) -> String {
	if offset_minutes == 0 && symbol == 'X' {
		return "Z".to_string();
	}
	let sign = if offset_minutes < 0 { '-' } else { '+' };
	let hours = offset_minutes.unsigned_abs() / 60;
	let minutes = offset_minutes.unsigned_abs() % 60;
	match count {
		1 if minutes == 0 => format!("{}{:02}", sign, hours),
		1 | 2 => format!("{}{:02}{:02}", sign, hours, minutes),
		_ => format!("{}{:02}:{:02}", sign, hours, minutes),
	}
}

fn take_number(input: &str, max_digits: usize) -> Option<(u32, &str)> {
	let input = input.trim_start();
	let end = input
		.char_indices()
		.take_while(|(i, c)| c.is_ascii_digit() && *i < max_digits)
		.map(|(i, c)| i + c.len_utf8())
		.last()?;
	let value = input[..end].parse().ok()?;
	Some((value, &input[end..]))
}

/// Matches the longest name in `names` at the start of `input`.
fn take_name<'a>(input: &'a str, names: &[String]) -> Option<(usize, &'a str)> {
	let input = input.trim_start();
	names
		.iter()
		.enumerate()
		.filter(|(_, name)| {
			!name.is_empty()
				&& input
					.get(..name.len())
					.is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
		})
		.max_by_key(|(_, name)| name.len())
		.map(|(index, name)| (index, &input[name.len()..]))
}
