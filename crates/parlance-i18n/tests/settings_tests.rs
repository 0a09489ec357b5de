//! Building an `I18n` context from settings files.

use std::fs;

use parlance_i18n::{CldrGroup, I18n, I18nError, I18nSettings, NumberFormatterOptions};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn test_from_settings_loads_cldr_documents() {
	// Arrange
	let dir = tempfile::tempdir().unwrap();
	let cldr = dir.path().join("cldr");
	fs::create_dir(&cldr).unwrap();
	fs::write(
		cldr.join("likely.json"),
		r#"{ "supplemental": { "likelySubtags": { "de": "de-Latn-DE" } } }"#,
	)
	.unwrap();
	fs::write(
		cldr.join("numbers.json"),
		r##"{ "main": { "de": { "numbers": {
			"symbols-numberSystem-latn": { "decimal": ",", "group": "." },
			"decimalFormats-numberSystem-latn": { "standard": "#,##0.###" }
		} } } }"##,
	)
	.unwrap();
	let config = dir.path().join("i18n.toml");
	fs::write(
		&config,
		format!("locale = \"de_DE\"\ncldr_paths = [{:?}]\n", cldr.display().to_string()),
	)
	.unwrap();

	// Act
	let settings = I18nSettings::from_toml_file(&config).unwrap();
	let i18n = I18n::from_settings(settings).await.unwrap();

	// Assert
	assert_eq!(i18n.locale(), "de-DE");
	assert!(i18n.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]));
	assert!(i18n.is_loaded(CldrGroup::Main, &["de-DE", "numbers"]));
	assert_eq!(i18n.engine().locale().as_deref(), Some("de-DE"));
	assert_eq!(
		i18n.format_number(1234.5, NumberFormatterOptions::default()).unwrap(),
		"1.234,5"
	);
}

#[rstest]
#[tokio::test]
async fn test_from_settings_reports_missing_files() {
	let dir = tempfile::tempdir().unwrap();
	let settings = I18nSettings {
		locale: Some("en".to_string()),
		cldr_paths: vec![dir.path().join("absent.json")],
	};

	let result = I18n::from_settings(settings).await;

	assert!(matches!(result, Err(I18nError::Io(_))));
}

#[rstest]
fn test_from_toml_file_reports_missing_file() {
	let dir = tempfile::tempdir().unwrap();

	let result = I18nSettings::from_toml_file(dir.path().join("missing.toml"));

	assert!(matches!(result, Err(I18nError::Io(_))));
}
