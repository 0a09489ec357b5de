//! Module loading with `plugin!resource` identifiers.
//!
//! The loader sits between callers and whatever module system the host
//! provides. Hosts plug in through a [`LoaderStrategy`]:
//!
//! - [`CommonJsStrategy`]: synchronous `require(id)`
//! - [`AmdStrategy`]: callback-style `require(ids, callback)` with an error event
//! - [`StaticModuleMap`]: a bundler-generated id map with lazy chunks
//!
//! An identifier of the form `plugin!resource` loads `plugin` first. When its
//! default export is a [`LoadPlugin`], the plugin loads `resource` and its
//! result takes the identifier's place in the output.
//!
//! # Quick Start
//!
//! ```
//! use parlance_loader::prelude::*;
//! use std::collections::HashMap;
//!
//! struct Text;
//!
//! #[async_trait]
//! impl LoadPlugin for Text {
//!     async fn load(&self, resource_id: &str, _loader: &ModuleLoader) -> LoadResult<Module> {
//!         Ok(Module::plain(format!("<contents of {}>", resource_id)))
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let mut modules = HashMap::new();
//! modules.insert("text".to_string(), Module::plugin(Text));
//! modules.insert("config".to_string(), Module::plain(3_u8));
//!
//! let loader = ModuleLoader::new(CommonJsStrategy::from_modules(modules));
//! let loaded = loader.load(["config", "text!tpl.html"]).await.unwrap();
//!
//! assert_eq!(loaded[0].downcast_ref::<u8>(), Some(&3));
//! assert_eq!(
//!     loaded[1].downcast_ref::<String>().map(String::as_str),
//!     Some("<contents of tpl.html>")
//! );
//! # });
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────┐
//! │        ModuleLoader         │
//! │  - split on first '!'       │
//! │  - plugin substitution      │
//! │  - order-preserving join    │
//! └──────────────┬──────────────┘
//!                │
//!     ┌──────────┼───────────┐
//!     │          │           │
//! ┌───▼────┐ ┌───▼──┐ ┌──────▼─────┐
//! │CommonJS│ │ AMD  │ │ Static map │
//! └────────┘ └──────┘ └────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod loader;
pub mod module;
pub mod plugin;
pub mod strategy;

pub use error::{LoadError, LoadResult};
pub use loader::ModuleLoader;
pub use module::{Exports, Module, ModuleRequest, is_plugin, use_default};
pub use plugin::{LoadPlugin, Resolver};
pub use strategy::{
	AmdCallback, AmdRequire, AmdStrategy, CommonJsStrategy, ErrorHandler, ErrorSubscription,
	LoaderStrategy, RequireFn, ResolveFn, StaticModuleEntry, StaticModuleMap, StaticRuntime,
	resolve_relative,
};

/// Re-export commonly used types.
pub mod prelude {
	pub use crate::error::{LoadError, LoadResult};
	pub use crate::loader::ModuleLoader;
	pub use crate::module::{Module, is_plugin, use_default};
	pub use crate::plugin::LoadPlugin;
	pub use crate::strategy::{
		AmdRequire, AmdStrategy, CommonJsStrategy, LoaderStrategy, StaticModuleMap, StaticRuntime,
	};

	pub use async_trait::async_trait;
}

pub use async_trait::async_trait;
