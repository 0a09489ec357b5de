//! # Parlance
//!
//! Locale-aware message bundles, CLDR-backed formatting and a module loader
//! that understands `plugin!resource` identifiers.
//!
//! ## Feature Flags
//!
//! - `i18n` - message bundles, CLDR load cache and formatting front-ends
//!   ([`parlance_i18n`])
//! - `loader` - module loading with plugin resolution ([`parlance_loader`])
//! - `full` (default) - both of the above
//!
//! ## Quick Example
//!
//! ```
//! use parlance::prelude::*;
//! use std::collections::HashMap;
//!
//! let mut modules = HashMap::new();
//! modules.insert(
//!     "nls/de".to_string(),
//!     Module::plain(HashMap::from([("hello".to_string(), "Hallo".to_string())])),
//! );
//! let loader = ModuleLoader::new(CommonJsStrategy::from_modules(modules));
//!
//! let bundle = Bundle::new([("hello", "Hello")]).module_locale("de", loader, "nls/de");
//! let i18n = I18n::default().with_root_locale("en");
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let messages = runtime.block_on(i18n.i18n(&bundle, Some("de-CH"))).unwrap();
//! assert_eq!(messages["hello"], "Hallo");
//! ```

#![warn(missing_docs)]

#[cfg(feature = "i18n")]
pub use parlance_i18n as i18n;

#[cfg(feature = "loader")]
pub use parlance_loader as loader;

// Re-export the context and its option types
#[cfg(feature = "i18n")]
pub use parlance_i18n::{
	Bundle, FormatArgs, I18n, I18nError, I18nSettings, generate_locales, normalize_locale,
	system_locale, validate_locale,
};

// Re-export the loader entry points
#[cfg(feature = "loader")]
pub use parlance_loader::{LoadError, LoadPlugin, Module, ModuleLoader, is_plugin, use_default};

/// Re-export commonly used types.
pub mod prelude {
	#[cfg(feature = "i18n")]
	pub use parlance_i18n::prelude::*;

	#[cfg(feature = "loader")]
	pub use parlance_loader::prelude::*;
}
