//! Host loading strategies.
//!
//! A strategy adapts one kind of host module system to the loader:
//!
//! - **CommonJS**: synchronous `require(id)` plus optional `require.resolve`
//! - **AMD**: callback-style `require(ids, callback)` with an `error` event
//! - **Static map**: a bundler-generated id map plus a runtime loader

mod amd;
mod commonjs;
mod static_map;

use async_trait::async_trait;

use crate::error::LoadResult;
use crate::module::Module;

pub use amd::{AmdCallback, AmdRequire, AmdStrategy, ErrorHandler, ErrorSubscription};
pub use commonjs::{CommonJsStrategy, RequireFn, ResolveFn};
pub use static_map::{StaticModuleEntry, StaticModuleMap, StaticRuntime, resolve_relative};

/// Loads the module halves of a batch of identifiers.
#[async_trait]
pub trait LoaderStrategy: Send + Sync {
	/// Short strategy name used in logs.
	fn name(&self) -> &'static str;

	/// Loads every id in `ids`, preserving order.
	async fn require(&self, ids: &[String]) -> LoadResult<Vec<Module>>;

	/// Resolves a resource identifier for plugins without their own
	/// `normalize`. Identity by default.
	fn resolve(&self, id: &str) -> String {
		id.to_string()
	}
}
