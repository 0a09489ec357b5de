//! Module loader error types.
//!
//! Every failure of a load pipeline is reported through the returned future;
//! none of these are raised synchronously.

use thiserror::Error;

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Module loader errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LoadError {
	/// No host loading strategy is configured.
	#[error("Unknown loader")]
	UnknownLoader,

	/// Requested id has no entry in the static module map.
	#[error("Missing module: {0}")]
	MissingModule(String),

	/// A relative id walked above the base path.
	#[error("Path cannot go beyond root directory: {0}")]
	PathBeyondRoot(String),

	/// A synchronous `require` failed.
	#[error("failed to require '{id}': {message}")]
	Require {
		/// Module identifier passed to `require`.
		id: String,
		/// Failure reported by the host.
		message: String,
	},

	/// The host loader emitted an `error` event.
	#[error("loader error: {0}")]
	Loader(String),

	/// The host loader dropped the request without completing it.
	#[error("module request for [{0}] was dropped before completion")]
	Abandoned(String),

	/// A plugin failed to load its resource.
	#[error("plugin '{plugin}' failed to load '{resource}': {message}")]
	Plugin {
		/// Plugin module identifier.
		plugin: String,
		/// Resource identifier handed to the plugin.
		resource: String,
		/// Error message.
		message: String,
	},

	/// Generic error with a custom message.
	#[error("{0}")]
	Custom(String),
}

impl LoadError {
	/// Creates a `Require` error for `id`.
	pub fn require(id: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Require {
			id: id.into(),
			message: message.into(),
		}
	}

	/// Creates a `Plugin` error.
	pub fn plugin(
		plugin: impl Into<String>,
		resource: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		Self::Plugin {
			plugin: plugin.into(),
			resource: resource.into(),
			message: message.into(),
		}
	}
}
