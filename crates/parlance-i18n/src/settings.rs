//! Settings for constructing an [`I18n`](crate::I18n) context.
//!
//! Settings come from TOML or from environment variables:
//!
//! ```toml
//! locale = "fr-CA"
//! cldr_paths = ["cldr/supplemental.json", "cldr/main"]
//! ```
//!
//! | variable               | field        |
//! |------------------------|--------------|
//! | `PARLANCE_LOCALE`      | `locale`     |
//! | `PARLANCE_CLDR_PATHS`  | `cldr_paths` (`:`-separated) |

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{I18nError, Result};

/// Default prefix for environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "PARLANCE_";

/// i18n context settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
	/// Initial root locale. The system locale is used when absent.
	pub locale: Option<String>,
	/// CLDR JSON documents, or directories of them, loaded at construction.
	pub cldr_paths: Vec<PathBuf>,
}

impl I18nSettings {
	/// Parses settings from TOML.
	///
	/// # Examples
	///
	/// ```
	/// use parlance_i18n::I18nSettings;
	///
	/// let settings = I18nSettings::from_toml_str(r#"locale = "de""#).unwrap();
	/// assert_eq!(settings.locale.as_deref(), Some("de"));
	/// assert!(settings.cldr_paths.is_empty());
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source).map_err(|e| I18nError::Settings(e.to_string()))
	}

	/// Reads a TOML settings file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
		let source = fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&source)
	}

	/// Reads `PARLANCE_LOCALE` and `PARLANCE_CLDR_PATHS`.
	pub fn from_env() -> Self {
		Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
	}

	/// Reads `{prefix}LOCALE` and `{prefix}CLDR_PATHS`.
	pub fn from_env_with_prefix(prefix: &str) -> Self {
		let locale = env::var(format!("{}LOCALE", prefix))
			.ok()
			.filter(|value| !value.trim().is_empty());
		let cldr_paths = env::var(format!("{}CLDR_PATHS", prefix))
			.map(|value| {
				value
					.split(':')
					.map(str::trim)
					.filter(|p| !p.is_empty())
					.map(PathBuf::from)
					.collect()
			})
			.unwrap_or_default();
		Self { locale, cldr_paths }
	}

	/// Reads every configured CLDR document, in configuration order.
	///
	/// Directories contribute their `*.json` files in file-name order.
	pub fn read_cldr_documents(&self) -> Result<Vec<Value>> {
		let mut documents = Vec::new();
		for path in &self.cldr_paths {
			if path.is_dir() {
				let mut files: Vec<PathBuf> = fs::read_dir(path)?
					.filter_map(|entry| entry.ok().map(|e| e.path()))
					.filter(|p| p.extension().is_some_and(|ext| ext == "json"))
					.collect();
				files.sort();
				for file in files {
					documents.push(read_json(&file)?);
				}
			} else {
				documents.push(read_json(path)?);
			}
		}
		Ok(documents)
	}
}

fn read_json(path: &Path) -> Result<Value> {
	tracing::debug!(path = %path.display(), "reading CLDR document");
	let source = fs::read_to_string(path)?;
	Ok(serde_json::from_str(&source)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_from_toml_str() {
		// Arrange
		let source = r#"
			locale = "fr-CA"
			cldr_paths = ["a.json", "cldr/main"]
		"#;

		// Act
		let settings = I18nSettings::from_toml_str(source).unwrap();

		// Assert
		assert_eq!(settings.locale.as_deref(), Some("fr-CA"));
		assert_eq!(
			settings.cldr_paths,
			vec![PathBuf::from("a.json"), PathBuf::from("cldr/main")]
		);
	}

	#[rstest]
	fn test_from_toml_str_rejects_bad_types() {
		let err = I18nSettings::from_toml_str("locale = 3").unwrap_err();
		assert!(matches!(err, I18nError::Settings(_)));
	}

	#[rstest]
	#[serial(env)]
	fn test_from_env_with_prefix() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::set_var("PARLANCE_TEST_LOCALE", "de-AT");
			env::set_var("PARLANCE_TEST_CLDR_PATHS", "/data/a.json: /data/b.json:");
		}

		let settings = I18nSettings::from_env_with_prefix("PARLANCE_TEST_");

		assert_eq!(settings.locale.as_deref(), Some("de-AT"));
		assert_eq!(
			settings.cldr_paths,
			vec![PathBuf::from("/data/a.json"), PathBuf::from("/data/b.json")]
		);

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::remove_var("PARLANCE_TEST_LOCALE");
			env::remove_var("PARLANCE_TEST_CLDR_PATHS");
		}
	}

	#[rstest]
	#[serial(env)]
	fn test_from_env_defaults_when_unset() {
		let settings = I18nSettings::from_env_with_prefix("PARLANCE_UNSET_");
		assert_eq!(settings, I18nSettings::default());
	}

	#[rstest]
	fn test_read_cldr_documents_from_dir_and_file() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let main = dir.path().join("main");
		fs::create_dir(&main).unwrap();
		fs::write(main.join("b.json"), r#"{ "main": { "fr": {} } }"#).unwrap();
		fs::write(main.join("a.json"), r#"{ "main": { "de": {} } }"#).unwrap();
		fs::write(main.join("notes.txt"), "ignored").unwrap();
		let supplemental = dir.path().join("supplemental.json");
		fs::write(&supplemental, r#"{ "supplemental": {} }"#).unwrap();
		let settings = I18nSettings {
			locale: None,
			cldr_paths: vec![supplemental, main],
		};

		// Act
		let documents = settings.read_cldr_documents().unwrap();

		// Assert
		assert_eq!(documents.len(), 3);
		assert!(documents[0].get("supplemental").is_some());
		assert!(documents[1]["main"].get("de").is_some());
		assert!(documents[2]["main"].get("fr").is_some());
	}

	#[rstest]
	fn test_read_cldr_documents_reports_bad_json() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.json");
		fs::write(&path, "{ nope").unwrap();
		let settings = I18nSettings {
			locale: None,
			cldr_paths: vec![path],
		};
		assert!(matches!(settings.read_cldr_documents(), Err(I18nError::Json(_))));
	}
}
