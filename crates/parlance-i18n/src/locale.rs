//! Locale tag utilities.
//!
//! Locale tags are plain strings such as `"fr-CA"`. They must start with a
//! 2-3 letter language subtag; further subtags are alphanumeric and separated
//! by `-`.

use once_cell::sync::Lazy;
use regex::Regex;

static LOCALE_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]+)*$").expect("valid locale regex"));

static SYSTEM_LOCALE: Lazy<String> = Lazy::new(|| {
	let raw = ["LC_ALL", "LC_MESSAGES", "LANG"]
		.iter()
		.filter_map(|name| std::env::var(name).ok())
		.find(|value| !value.trim().is_empty());
	system_locale_from(raw.as_deref())
});

/// Fallback used when the environment names no usable locale.
pub const FALLBACK_LOCALE: &str = "en";

/// Returns whether `locale` is a well-formed locale tag.
///
/// # Examples
///
/// ```
/// use parlance_i18n::validate_locale;
///
/// assert!(validate_locale("en"));
/// assert!(validate_locale("en-US"));
/// assert!(validate_locale("zh-Hant-TW"));
/// assert!(!validate_locale(""));
/// assert!(!validate_locale("1en"));
/// ```
pub fn validate_locale(locale: &str) -> bool {
	LOCALE_PATTERN.is_match(locale)
}

/// Canonicalizes a locale tag.
///
/// POSIX separators become `-`, encoding and modifier suffixes (`.UTF-8`,
/// `@euro`) are dropped, and trailing separators are removed. The result is
/// the key every registry uses, so `normalize_locale` is idempotent.
///
/// # Examples
///
/// ```
/// use parlance_i18n::normalize_locale;
///
/// assert_eq!(normalize_locale("en_US.UTF-8"), "en-US");
/// assert_eq!(normalize_locale("fr-"), "fr");
/// assert_eq!(normalize_locale("de_DE@euro"), "de-DE");
/// assert_eq!(normalize_locale("ja-JP"), "ja-JP");
/// ```
pub fn normalize_locale(locale: &str) -> String {
	let base = locale.split(['.', '@']).next().unwrap_or_default();
	let normalized = base
		.replace('_', "-")
		.trim_start()
		.trim_end_matches(|c: char| c == '-' || c.is_whitespace())
		.to_string();

	if !normalized.is_empty() && !validate_locale(&normalized) {
		tracing::warn!(locale = %normalized, "not a valid locale");
	}
	normalized
}

/// Returns the fallback chain for `locale`, from most general to most
/// specific, ending with the normalized locale itself.
///
/// # Examples
///
/// ```
/// use parlance_i18n::generate_locales;
///
/// assert_eq!(generate_locales("fr-CA"), vec!["fr", "fr-CA"]);
/// assert_eq!(generate_locales("en"), vec!["en"]);
/// assert_eq!(generate_locales("zh-Hant-TW"), vec!["zh", "zh-Hant", "zh-Hant-TW"]);
/// ```
pub fn generate_locales(locale: &str) -> Vec<String> {
	let normalized = normalize_locale(locale);
	let mut parts = normalized.split('-');
	let mut current = parts.next().unwrap_or_default().to_string();
	let mut chain = vec![current.clone()];
	for part in parts {
		current.push('-');
		current.push_str(part);
		chain.push(current.clone());
	}
	chain
}

/// The process locale, derived once from `LC_ALL`, `LC_MESSAGES` or `LANG`.
///
/// `C`, `POSIX` and malformed values fall back to [`FALLBACK_LOCALE`].
pub fn system_locale() -> &'static str {
	&SYSTEM_LOCALE
}

fn system_locale_from(raw: Option<&str>) -> String {
	let Some(raw) = raw else {
		return FALLBACK_LOCALE.to_string();
	};
	let normalized = normalize_locale(raw);
	if normalized.eq_ignore_ascii_case("c")
		|| normalized.eq_ignore_ascii_case("posix")
		|| !validate_locale(&normalized)
	{
		return FALLBACK_LOCALE.to_string();
	}
	normalized
}

/// The language subtag of `locale`.
pub(crate) fn language(locale: &str) -> &str {
	locale.split('-').next().unwrap_or(locale)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("en", true)]
	#[case("en-US", true)]
	#[case("haw-US", true)]
	#[case("sr-Latn-RS", true)]
	#[case("", false)]
	#[case("1en", false)]
	#[case("e", false)]
	#[case("engl", false)]
	#[case("en_US", false)]
	#[case("en-", false)]
	fn test_validate_locale(#[case] input: &str, #[case] expected: bool) {
		assert_eq!(validate_locale(input), expected);
	}

	#[rstest]
	#[case("en_US", "en-US")]
	#[case("en_US.UTF-8", "en-US")]
	#[case("en-US_", "en-US")]
	#[case("en -", "en")]
	#[case("sr_RS@latin", "sr-RS")]
	#[case("fr", "fr")]
	#[case("", "")]
	fn test_normalize_locale(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize_locale(input), expected);
	}

	#[rstest]
	#[case("en")]
	#[case("en_GB.ISO-8859-1")]
	#[case("zh_Hant_TW")]
	#[case("pt-BR-")]
	#[case("en -")]
	#[case(" de_AT _")]
	fn test_normalize_locale_is_idempotent(#[case] input: &str) {
		// Act
		let once = normalize_locale(input);
		let twice = normalize_locale(&once);

		// Assert
		assert_eq!(once, twice);
	}

	#[rstest]
	fn test_generate_locales_normalizes_input() {
		assert_eq!(generate_locales("pt_BR.UTF-8"), vec!["pt", "pt-BR"]);
	}

	#[rstest]
	#[case(None, "en")]
	#[case(Some("C"), "en")]
	#[case(Some("POSIX"), "en")]
	#[case(Some("C.UTF-8"), "en")]
	#[case(Some("fr_CA.UTF-8"), "fr-CA")]
	#[case(Some("1234"), "en")]
	fn test_system_locale_from(#[case] raw: Option<&str>, #[case] expected: &str) {
		assert_eq!(system_locale_from(raw), expected);
	}

	#[rstest]
	fn test_language_subtag() {
		assert_eq!(language("fr-CA"), "fr");
		assert_eq!(language("en"), "en");
	}
}
