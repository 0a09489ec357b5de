//! Error types for message bundles and formatting.

use parlance_loader::LoadError;
use thiserror::Error;

/// Result type for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Errors raised by the i18n context, the CLDR engine and settings loading.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum I18nError {
	/// Simple-mode formatting was requested for a bundle with no cached messages.
	#[error("The bundle has not been registered.")]
	BundleNotRegistered,

	/// A `{token}` in a message had no matching option.
	#[error("Missing property {0}")]
	MissingToken(String),

	/// The bundle has no message under the requested key.
	#[error("No message '{key}' in bundle {bundle_id}")]
	MissingMessage {
		/// Bundle identifier.
		bundle_id: String,
		/// Message key.
		key: String,
	},

	/// CLDR data needed by a formatter has not been loaded.
	#[error("CLDR data missing for locale '{locale}': {path}")]
	MissingCldrData {
		/// Locale the lookup was made for.
		locale: String,
		/// Slash-separated CLDR path.
		path: String,
	},

	/// No locale was given and the engine has no default locale.
	#[error("Default locale has not been defined")]
	DefaultLocaleNotDefined,

	/// An ICU message could not be compiled.
	#[error("Invalid message '{message}': {reason}")]
	InvalidMessage {
		/// The message source.
		message: String,
		/// What went wrong.
		reason: String,
	},

	/// A CLDR number/date pattern or plural rule could not be compiled.
	#[error("Invalid pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The pattern source.
		pattern: String,
		/// What went wrong.
		reason: String,
	},

	/// A value could not be parsed.
	#[error("Cannot parse '{input}': {reason}")]
	Parse {
		/// The rejected input.
		input: String,
		/// What went wrong.
		reason: String,
	},

	/// Invalid settings.
	#[error("Settings error: {0}")]
	Settings(String),

	/// I/O failure while reading CLDR documents.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Malformed JSON.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A locale partial failed to load through the module loader.
	#[error(transparent)]
	Loader(#[from] LoadError),
}

impl I18nError {
	pub(crate) fn invalid_message(message: &str, reason: impl Into<String>) -> Self {
		Self::InvalidMessage {
			message: message.to_string(),
			reason: reason.into(),
		}
	}

	pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
		Self::InvalidPattern {
			pattern: pattern.to_string(),
			reason: reason.into(),
		}
	}

	pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
		Self::Parse {
			input: input.to_string(),
			reason: reason.into(),
		}
	}

	pub(crate) fn missing_cldr(locale: &str, path: impl Into<String>) -> Self {
		Self::MissingCldrData {
			locale: locale.to_string(),
			path: path.into(),
		}
	}
}
