//! Locale-aware message bundles and CLDR-backed formatting.
//!
//! This crate provides the i18n core:
//!
//! - **Bundles**: default messages plus per-locale overrides, eagerly given
//!   or loaded on demand (optionally through a `parlance-loader` module id)
//! - **Message cache**: per bundle, per locale, with most-specific-first
//!   fallback and observer notification on locale switches
//! - **CLDR tracking**: which CLDR packages have been loaded for which locales
//! - **Formatting**: ICU-style messages, numbers, currencies, plurals, dates,
//!   relative times and units through a pluggable [`GlobalizeEngine`]
//!
//! # Quick Start
//!
//! ```
//! use parlance_i18n::{Bundle, FormatArgs, I18n};
//!
//! # futures::executor::block_on(async {
//! let i18n = I18n::default().with_root_locale("en");
//! let greetings = Bundle::new([("hello", "Hello {name}")])
//!     .locale("de", [("hello", "Hallo {name}")]);
//!
//! let messages = i18n.i18n(&greetings, Some("de-AT")).await.unwrap();
//! assert_eq!(messages["hello"], "Hallo {name}");
//!
//! let text = i18n
//!     .format_message(&greetings, "hello", &FormatArgs::from([("name", "Ana")]), Some("de-AT"))
//!     .unwrap();
//! assert_eq!(text, "Hallo Ana");
//! # });
//! ```
//!
//! # Locale resolution
//!
//! ```text
//! "de-AT"  ──generate_locales──▶  ["de", "de-AT"]  ──▶  cache hit?  ──▶  messages
//!                                                          │ no
//!                                                          ▼
//!                                              load supported locales,
//!                                              merge over the defaults
//! ```
//!
//! [`GlobalizeEngine`]: engine::GlobalizeEngine

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod args;
pub mod bundle;
pub mod cldr;
pub mod context;
pub mod date;
pub mod engine;
pub mod error;
pub mod locale;
pub mod number;
pub mod observer;
pub mod settings;
pub mod unit;

pub use args::{ArgValue, FormatArgs, FormatterArgs, NormalizedArgs, normalize_formatter_args};
pub use bundle::{
	Bundle, BundleDef, FrozenMessages, LocaleFuture, LocaleLoader, LocaleModule, Messages,
	ensure_bundle_id, get_supported_locales, load_locale_bundles, module_locale_loader,
};
pub use cldr::{CldrGroup, CldrLoadCache, MAIN_PACKAGES, SUPPLEMENTAL_PACKAGES};
pub use context::I18n;
pub use date::{DateFormatterOptions, DateStyle, RelativeTimeFormatterOptions};
pub use engine::{
	CldrEngine, Formatter, GlobalizeEngine, MessageFormatter, Parser, PluralCategory,
	PluralGenerator, ROOT_LOCALE,
};
pub use error::{I18nError, Result};
pub use locale::{FALLBACK_LOCALE, generate_locales, normalize_locale, system_locale, validate_locale};
pub use number::{
	CurrencyFormatterOptions, CurrencyStyle, NumberFormatterOptions, NumberParserOptions,
	NumberStyle, PluralGeneratorOptions, PluralType, RoundingMode,
};
pub use observer::{LocaleCallback, LocaleObserverHandle};
pub use settings::{DEFAULT_ENV_PREFIX, I18nSettings};
pub use unit::{UnitForm, UnitFormatterOptions};

/// Re-export commonly used types.
pub mod prelude {
	pub use crate::args::{ArgValue, FormatArgs};
	pub use crate::bundle::{Bundle, BundleDef, FrozenMessages};
	pub use crate::context::I18n;
	pub use crate::date::{DateFormatterOptions, DateStyle};
	pub use crate::error::{I18nError, Result};
	pub use crate::number::{CurrencyFormatterOptions, NumberFormatterOptions};
	pub use crate::unit::{UnitForm, UnitFormatterOptions};
}
