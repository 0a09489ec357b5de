//! Loader plugins.
//!
//! A module requested as `plugin!resource` is loaded first; when its default
//! export is a [`LoadPlugin`], the plugin receives the resource identifier and
//! its result replaces the module in the load output.

use async_trait::async_trait;

use crate::error::LoadResult;
use crate::loader::ModuleLoader;
use crate::module::Module;

/// Host resolver used to turn resource identifiers into absolute ones.
pub type Resolver<'a> = &'a (dyn Fn(&str) -> String + Send + Sync);

/// A module able to load resources addressed as `plugin!resource`.
///
/// # Example
///
/// ```
/// use parlance_loader::{LoadPlugin, LoadResult, Module, ModuleLoader};
/// use async_trait::async_trait;
///
/// struct Upper;
///
/// #[async_trait]
/// impl LoadPlugin for Upper {
///     async fn load(&self, resource_id: &str, _loader: &ModuleLoader) -> LoadResult<Module> {
///         Ok(Module::plain(resource_id.to_uppercase()))
///     }
/// }
/// ```
#[async_trait]
pub trait LoadPlugin: Send + Sync {
	/// Normalizes `resource_id` before loading.
	///
	/// Defaults to the host resolver.
	fn normalize(&self, resource_id: &str, resolver: Resolver<'_>) -> String {
		resolver(resource_id)
	}

	/// Loads `resource_id`.
	///
	/// `loader` is the loader that resolved this plugin, so plugins can
	/// request further modules (including other plugin resources).
	async fn load(&self, resource_id: &str, loader: &ModuleLoader) -> LoadResult<Module>;
}
