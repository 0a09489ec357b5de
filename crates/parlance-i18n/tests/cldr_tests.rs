//! Integration tests for the CLDR load cache, ICU message formatting and the
//! number/date/unit front-ends.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use parlance_i18n::{
	Bundle, CldrGroup, CurrencyFormatterOptions, CurrencyStyle, DateFormatterOptions, DateStyle,
	FormatArgs, I18n, I18nError, NumberFormatterOptions, PluralCategory, PluralGeneratorOptions,
	RelativeTimeFormatterOptions, UnitForm, UnitFormatterOptions,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn supplemental() -> Value {
	json!({
		"supplemental": {
			"likelySubtags": { "en": "en-Latn-US", "fr": "fr-Latn-FR" },
			"plurals-type-cardinal": {
				"en": {
					"pluralRule-count-one": "i = 1 and v = 0 @integer 1",
					"pluralRule-count-other": " @integer 0, 2~16"
				},
				"fr": {
					"pluralRule-count-one": "i = 0,1 @integer 0, 1",
					"pluralRule-count-other": " @integer 2~17"
				}
			},
			"plurals-type-ordinal": {
				"en": {
					"pluralRule-count-one": "n % 10 = 1 and n % 100 != 11",
					"pluralRule-count-two": "n % 10 = 2 and n % 100 != 12",
					"pluralRule-count-few": "n % 10 = 3 and n % 100 != 13",
					"pluralRule-count-other": ""
				}
			},
			"currencyData": { "fractions": {
				"JPY": { "_digits": "0" },
				"DEFAULT": { "_digits": "2" }
			} }
		}
	})
}

fn main_en() -> Value {
	json!({
		"main": { "en": {
			"numbers": {
				"symbols-numberSystem-latn": { "decimal": ".", "group": ",", "percentSign": "%" },
				"decimalFormats-numberSystem-latn": { "standard": "#,##0.###" },
				"percentFormats-numberSystem-latn": { "standard": "#,##0%" },
				"currencyFormats-numberSystem-latn": { "standard": "¤#,##0.00" },
				"currencies": { "USD": { "symbol": "$" } }
			},
			"dates": {
				"calendars": { "gregorian": {
					"dateFormats": { "long": "MMMM d, y", "short": "M/d/yy" },
					"timeFormats": { "short": "h:mm a" },
					"dateTimeFormats": {
						"short": "{1}, {0}",
						"medium": "{1}, {0}",
						"availableFormats": { "yMd": "M/d/y", "yMMMd": "MMM d, y", "Hm": "HH:mm" }
					}
				} },
				"fields": {
					"day": {
						"relative-type--1": "yesterday",
						"relative-type-0": "today",
						"relative-type-1": "tomorrow",
						"relativeTime-type-future": {
							"relativeTimePattern-count-one": "in {0} day",
							"relativeTimePattern-count-other": "in {0} days"
						},
						"relativeTime-type-past": {
							"relativeTimePattern-count-one": "{0} day ago",
							"relativeTimePattern-count-other": "{0} days ago"
						}
					}
				}
			},
			"units": {
				"long": {
					"length-kilometer": {
						"unitPattern-count-one": "{0} kilometer",
						"unitPattern-count-other": "{0} kilometers"
					}
				},
				"short": {
					"length-kilometer": { "unitPattern-count-other": "{0} km" }
				}
			}
		} }
	})
}

fn main_fr() -> Value {
	json!({
		"main": { "fr": { "numbers": {
			"symbols-numberSystem-latn": { "decimal": ",", "group": "\u{202f}" },
			"decimalFormats-numberSystem-latn": { "standard": "#,##0.###" }
		} } }
	})
}

async fn loaded() -> I18n {
	let i18n = I18n::default().with_root_locale("en");
	for document in [supplemental(), main_en(), main_fr()] {
		i18n.load_cldr_data(&document).await.unwrap();
	}
	i18n
}

fn leap_day() -> NaiveDateTime {
	NaiveDate::from_ymd_opt(2020, 2, 29)
		.unwrap()
		.and_hms_opt(8, 5, 0)
		.unwrap()
}

#[fixture]
fn i18n() -> I18n {
	I18n::default().with_root_locale("en")
}

#[rstest]
#[tokio::test]
async fn test_supplemental_reset_keeps_main(i18n: I18n) {
	// Arrange
	i18n.load_cldr_data(&json!({
		"main": { "fr": { "numbers": {} } },
		"supplemental": { "likelySubtags": {} }
	}))
	.await
	.unwrap();
	assert!(i18n.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]));

	// Act
	i18n.reset_cldr(Some(CldrGroup::Supplemental));

	// Assert
	assert!(!i18n.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]));
	assert!(i18n.is_loaded(CldrGroup::Main, &["fr", "numbers"]));
}

#[rstest]
#[case(&["fr-CA", "numbers"], true)]
#[case(&["fr", "numbers"], true)]
#[case(&["de", "numbers"], false)]
#[case(&["1fr", "numbers"], false)]
#[case(&["fr-CA", "dates"], false)]
#[tokio::test]
async fn test_main_lookup_follows_fallback_chain(
	i18n: I18n,
	#[case] path: &[&str],
	#[case] expected: bool,
) {
	i18n.load_cldr_data(&json!({ "main": { "fr": { "numbers": {} } } }))
		.await
		.unwrap();

	assert_eq!(i18n.is_loaded(CldrGroup::Main, path), expected);
}

#[rstest]
#[tokio::test]
async fn test_unknown_cldr_keys_are_ignored(i18n: I18n) {
	let result = i18n
		.load_cldr_data(&json!({
			"main": { "fr": { "nonsense": {} } },
			"supplemental": { "nonsense": {} }
		}))
		.await;

	assert!(result.is_ok());
	assert!(!i18n.is_loaded(CldrGroup::Main, &["fr", "nonsense"]));
	assert!(!i18n.is_loaded(CldrGroup::Supplemental, &["nonsense"]));
}

#[rstest]
#[tokio::test]
async fn test_likely_subtags_set_engine_default_locale(i18n: I18n) {
	assert_eq!(i18n.engine().locale(), None);

	i18n.load_cldr_data(&supplemental()).await.unwrap();

	assert_eq!(i18n.engine().locale().as_deref(), Some("en"));
}

#[rstest]
#[tokio::test]
async fn test_switch_locale_moves_engine_once_likely_subtags_loaded(i18n: I18n) {
	// Arrange
	i18n.switch_locale("de");
	assert_eq!(i18n.engine().locale(), None);
	i18n.load_cldr_data(&supplemental()).await.unwrap();

	// Act
	i18n.switch_locale("fr");

	// Assert
	assert_eq!(i18n.engine().locale().as_deref(), Some("fr"));
}

#[rstest]
#[tokio::test]
async fn test_icu_plural_and_select_messages() {
	// Arrange
	let i18n = loaded().await;
	let bundle = Bundle::new([
		("files", "{count, plural, one {# file} other {# files}}"),
		("pronoun", "{gender, select, female {She} male {He} other {They}} left"),
	])
	.locale(
		"fr",
		[("files", "{count, plural, one {# fichier} other {# fichiers}}")],
	);
	i18n.i18n(&bundle, Some("fr")).await.unwrap();

	// Act
	let en_one = i18n.format_message(&bundle, "files", &FormatArgs::from([("count", 1)]), None);
	let en_many = i18n.format_message(&bundle, "files", &FormatArgs::from([("count", 1200)]), None);
	let fr = i18n.format_message(&bundle, "files", &FormatArgs::from([("count", 1.5)]), Some("fr"));
	let pronoun = i18n.format_message(
		&bundle,
		"pronoun",
		&FormatArgs::from([("gender", "female")]),
		Some("fr"),
	);

	// Assert
	assert_eq!(en_one.unwrap(), "1 file");
	assert_eq!(en_many.unwrap(), "1,200 files");
	assert_eq!(fr.unwrap(), "1,5 fichier");
	assert_eq!(pronoun.unwrap(), "She left");
}

#[rstest]
#[tokio::test]
async fn test_icu_formatter_cache_follows_registry() {
	// Arrange
	let i18n = loaded().await;
	let bundle = Bundle::new([("hello", "Hello {name}")]).locale("fr", [("hello", "Salut {name}")]);
	i18n.i18n(&bundle, Some("fr")).await.unwrap();

	// Act
	let first = i18n.get_message_formatter(&bundle, "hello", Some("fr")).unwrap();
	let second = i18n.get_message_formatter(&bundle, "hello", Some("fr")).unwrap();
	i18n.invalidate(Some(&bundle));
	let third = i18n.get_message_formatter(&bundle, "hello", Some("fr")).unwrap();

	// Assert
	assert!(Arc::ptr_eq(&first, &second));
	assert!(!Arc::ptr_eq(&first, &third));
	assert_eq!(
		third(&FormatArgs::from([("name", "Léa")])).unwrap(),
		"Salut Léa"
	);
}

#[rstest]
#[tokio::test]
async fn test_icu_formatter_not_cached_without_locale_entry() {
	// Arrange
	let i18n = loaded().await;
	let bundle = Bundle::new([("hello", "Hello")]);

	// Act
	let first = i18n.get_message_formatter(&bundle, "hello", Some("fr")).unwrap();
	let second = i18n.get_message_formatter(&bundle, "hello", Some("fr")).unwrap();

	// Assert
	assert!(!Arc::ptr_eq(&first, &second));
	assert_eq!(first(&FormatArgs::new()).unwrap(), "Hello");
}

#[rstest]
#[case(None, "1,234.5")]
#[case(Some("en-US"), "1,234.5")]
#[case(Some("fr"), "1\u{202f}234,5")]
#[case(Some("fr_CA"), "1\u{202f}234,5")]
#[tokio::test]
async fn test_format_number_by_locale(#[case] locale: Option<&str>, #[case] expected: &str) {
	let i18n = loaded().await;

	assert_eq!(i18n.format_number(1234.5, locale).unwrap(), expected);
}

#[rstest]
#[tokio::test]
async fn test_number_options() {
	// Arrange
	let i18n = loaded().await;

	// Act
	let percent = i18n.format_number(0.256, NumberFormatterOptions::default().percent());
	let padded = i18n.format_number(
		7.0,
		(
			NumberFormatterOptions::default()
				.minimum_integer_digits(3)
				.minimum_fraction_digits(1),
			"fr",
		),
	);
	let formatter = i18n
		.get_number_formatter(NumberFormatterOptions::default().maximum_fraction_digits(1))
		.unwrap();

	// Assert
	assert_eq!(percent.unwrap(), "26%");
	assert_eq!(padded.unwrap(), "007,0");
	assert_eq!(formatter(3.14159).unwrap(), "3.1");
	assert_eq!(formatter(-2.0).unwrap(), "-2");
}

#[rstest]
#[tokio::test]
async fn test_parse_number() {
	let i18n = loaded().await;

	assert_eq!(i18n.parse_number("1,234.5", ()).unwrap(), 1234.5);
	assert_eq!(i18n.parse_number("1\u{202f}234,5", "fr").unwrap(), 1234.5);
	assert!(i18n.parse_number("abc", ()).is_err());
}

#[rstest]
#[tokio::test]
async fn test_format_currency() {
	// Arrange
	let i18n = loaded().await;

	// Act
	let symbol = i18n.format_currency(1234.5, "USD", ());
	let code = i18n.format_currency(
		3.0,
		"USD",
		CurrencyFormatterOptions::default().style(CurrencyStyle::Code),
	);
	let yen = i18n.get_currency_formatter("JPY", ()).unwrap();

	// Assert
	assert_eq!(symbol.unwrap(), "$1,234.50");
	assert_eq!(code.unwrap(), "USD\u{a0}3.00");
	assert_eq!(yen(1234.4).unwrap(), "JPY\u{a0}1,234");
}

#[rstest]
#[case(1.0, PluralCategory::One)]
#[case(2.0, PluralCategory::Other)]
#[case(0.0, PluralCategory::Other)]
#[tokio::test]
async fn test_pluralize_cardinal(#[case] value: f64, #[case] expected: PluralCategory) {
	let i18n = loaded().await;

	assert_eq!(i18n.pluralize(value, ()).unwrap(), expected);
}

#[rstest]
#[tokio::test]
async fn test_pluralize_ordinal_and_locale() {
	// Arrange
	let i18n = loaded().await;

	// Act
	let ordinal = i18n.get_plural_generator(PluralGeneratorOptions::ordinal()).unwrap();
	let fr_zero = i18n.pluralize(0.0, "fr");
	let fr_ordinal = i18n.pluralize(1.0, (PluralGeneratorOptions::ordinal(), "fr"));

	// Assert
	assert_eq!(ordinal(1.0), PluralCategory::One);
	assert_eq!(ordinal(2.0), PluralCategory::Two);
	assert_eq!(ordinal(3.0), PluralCategory::Few);
	assert_eq!(ordinal(11.0), PluralCategory::Other);
	assert_eq!(fr_zero.unwrap(), PluralCategory::One);
	assert!(matches!(fr_ordinal, Err(I18nError::MissingCldrData { .. })));
}

#[rstest]
#[case(DateFormatterOptions::default(), "2/29/2020")]
#[case(DateFormatterOptions::date(DateStyle::Long), "February 29, 2020")]
#[case(DateFormatterOptions::datetime(DateStyle::Short), "2/29/20, 8:05 AM")]
#[case(DateFormatterOptions::skeleton("yMMMd"), "Feb 29, 2020")]
#[case(DateFormatterOptions::skeleton("yMdHm"), "2/29/2020, 08:05")]
#[case(DateFormatterOptions::raw("y-MM-dd'T'HH:mm"), "2020-02-29T08:05")]
#[tokio::test]
async fn test_format_date(#[case] options: DateFormatterOptions, #[case] expected: &str) {
	let i18n = loaded().await;

	assert_eq!(i18n.format_date(leap_day(), options).unwrap(), expected);
}

#[rstest]
#[tokio::test]
async fn test_date_errors() {
	let i18n = loaded().await;

	assert!(matches!(
		i18n.format_date(leap_day(), DateFormatterOptions::date(DateStyle::Full)),
		Err(I18nError::MissingCldrData { .. })
	));
	assert!(matches!(
		i18n.format_date(leap_day(), "fr"),
		Err(I18nError::MissingCldrData { ref locale, .. }) if locale == "fr"
	));
}

#[rstest]
#[tokio::test]
async fn test_parse_date() {
	// Arrange
	let i18n = loaded().await;
	let parser = i18n.get_date_parser(DateFormatterOptions::date(DateStyle::Long)).unwrap();

	// Act
	let parsed = parser("February 29, 2020");
	let short = i18n.parse_date("2/29/2020", ());

	// Assert
	assert_eq!(parsed.unwrap().date(), leap_day().date());
	assert_eq!(short.unwrap().date(), leap_day().date());
	assert!(parser("Smarch 1, 2020").is_err());
}

#[rstest]
#[case(-1.0, "yesterday")]
#[case(0.0, "today")]
#[case(1.0, "tomorrow")]
#[case(3.0, "in 3 days")]
#[case(-2.0, "2 days ago")]
#[tokio::test]
async fn test_format_relative_time(#[case] value: f64, #[case] expected: &str) {
	let i18n = loaded().await;

	assert_eq!(i18n.format_relative_time(value, "day", ()).unwrap(), expected);
}

#[rstest]
#[tokio::test]
async fn test_relative_time_errors() {
	let i18n = loaded().await;

	assert!(i18n.get_relative_time_formatter("fortnight", ()).is_err());
	assert!(
		i18n.get_relative_time_formatter("day", RelativeTimeFormatterOptions::form(UnitForm::Narrow))
			.is_ok()
	);
}

#[rstest]
#[tokio::test]
async fn test_format_unit() {
	// Arrange
	let i18n = loaded().await;

	// Act
	let one = i18n.format_unit(1.0, "kilometer", ());
	let many = i18n.format_unit(1234.5, "length-kilometer", ());
	let short = i18n.format_unit(5.0, "kilometer", UnitFormatterOptions::default().form(UnitForm::Short));
	let visible_fraction = i18n.format_unit(
		1.0,
		"kilometer",
		UnitFormatterOptions::default().number(NumberFormatterOptions::default().minimum_fraction_digits(1)),
	);

	// Assert
	assert_eq!(one.unwrap(), "1 kilometer");
	assert_eq!(many.unwrap(), "1,234.5 kilometers");
	assert_eq!(short.unwrap(), "5 km");
	assert_eq!(visible_fraction.unwrap(), "1.0 kilometers");
	assert!(i18n.format_unit(1.0, "furlong", ()).is_err());
}

#[rstest]
fn test_formatters_need_a_locale_with_data(i18n: I18n) {
	assert!(matches!(
		i18n.format_number(1.0, ()),
		Err(I18nError::MissingCldrData { .. })
	));
}
