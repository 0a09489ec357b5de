//! The module loader.
//!
//! Each call to [`ModuleLoader::load`] is a one-shot pipeline:
//!
//! 1. split every id on the first `!` into a module id and a resource id
//! 2. load the module ids through the host strategy
//! 3. for every position that carried a resource id and whose module is a
//!    plugin, replace the result with the plugin's own `load`
//! 4. await everything and resolve in input order

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, try_join_all};

use crate::error::{LoadError, LoadResult};
use crate::module::{Module, ModuleRequest};
use crate::strategy::LoaderStrategy;

/// Loads modules through a host strategy, resolving `plugin!resource` ids.
///
/// Cloning is cheap; clones share the strategy.
#[derive(Clone)]
pub struct ModuleLoader {
	strategy: Option<Arc<dyn LoaderStrategy>>,
}

impl ModuleLoader {
	/// Creates a loader over `strategy`.
	pub fn new<S: LoaderStrategy + 'static>(strategy: S) -> Self {
		Self {
			strategy: Some(Arc::new(strategy)),
		}
	}

	/// Creates a loader over a shared strategy.
	pub fn from_arc(strategy: Arc<dyn LoaderStrategy>) -> Self {
		Self {
			strategy: Some(strategy),
		}
	}

	/// Creates a loader with no host strategy; every load fails with
	/// [`LoadError::UnknownLoader`].
	pub fn unconfigured() -> Self {
		Self { strategy: None }
	}

	/// Whether a host strategy is configured.
	pub fn is_configured(&self) -> bool {
		self.strategy.is_some()
	}

	/// Loads `ids` through the configured strategy.
	///
	/// # Examples
	///
	/// ```
	/// use parlance_loader::{CommonJsStrategy, Module, ModuleLoader};
	/// use std::collections::HashMap;
	///
	/// # futures::executor::block_on(async {
	/// let mut modules = HashMap::new();
	/// modules.insert("answer".to_string(), Module::plain(42_u32));
	/// let loader = ModuleLoader::new(CommonJsStrategy::from_modules(modules));
	///
	/// let loaded = loader.load(["answer"]).await.unwrap();
	/// assert_eq!(loaded[0].downcast_ref::<u32>(), Some(&42));
	/// # });
	/// ```
	pub fn load<I, S>(&self, ids: I) -> BoxFuture<'_, LoadResult<Vec<Module>>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let ids = collect_ids(ids);
		match self.strategy.clone() {
			Some(strategy) => self.run(strategy, ids).boxed(),
			None => futures::future::ready(Err(LoadError::UnknownLoader)).boxed(),
		}
	}

	/// Loads `ids` through `context` instead of the configured strategy.
	///
	/// Plugins resolved by this call still receive `self`, so their nested
	/// loads go through the configured strategy.
	pub fn load_with<I, S>(
		&self,
		context: Arc<dyn LoaderStrategy>,
		ids: I,
	) -> BoxFuture<'_, LoadResult<Vec<Module>>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let ids = collect_ids(ids);
		self.run(context, ids).boxed()
	}

	async fn run(
		&self,
		strategy: Arc<dyn LoaderStrategy>,
		ids: Vec<String>,
	) -> LoadResult<Vec<Module>> {
		let requests: Vec<ModuleRequest> = ids.iter().map(|id| ModuleRequest::parse(id)).collect();
		let module_ids: Vec<String> = requests.iter().map(|r| r.module_id.clone()).collect();

		tracing::debug!(strategy = strategy.name(), ids = ?ids, "loading modules");
		let modules = strategy.require(&module_ids).await?;

		let resolver = |id: &str| strategy.resolve(id);
		let pending = modules.into_iter().zip(requests).map(|(module, request)| {
			let resolver = &resolver;
			async move {
				let Some(resource_id) = request.resource_id else {
					return Ok(module);
				};
				let Some(plugin) = module.as_plugin().cloned() else {
					return Ok(module);
				};
				let resource_id = plugin.normalize(&resource_id, resolver);
				tracing::debug!(
					plugin = %request.module_id,
					resource = %resource_id,
					"delegating to loader plugin"
				);
				plugin.load(&resource_id, self).await.inspect_err(|err| {
					tracing::warn!(plugin = %request.module_id, error = %err, "plugin load failed");
				})
			}
		});

		try_join_all(pending).await
	}
}

impl Default for ModuleLoader {
	fn default() -> Self {
		Self::unconfigured()
	}
}

impl std::fmt::Debug for ModuleLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ModuleLoader")
			.field("strategy", &self.strategy.as_ref().map(|s| s.name()))
			.finish()
	}
}

fn collect_ids<I, S>(ids: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	ids.into_iter().map(|id| id.as_ref().to_string()).collect()
}
