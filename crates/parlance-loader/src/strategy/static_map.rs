//! Bundler-generated static module map.
//!
//! Module identifiers are looked up in a map produced at build time. Each
//! entry names the runtime module id and whether it lives in a lazily loaded
//! chunk. Relative identifiers are resolved against a base path and may not
//! climb above it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, try_join_all};
use serde::Deserialize;

use super::LoaderStrategy;
use crate::error::{LoadError, LoadResult};
use crate::module::Module;

/// One entry of the static module map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaticModuleEntry {
	/// Runtime module id.
	pub id: String,
	/// Whether the module lives in a lazily loaded chunk.
	#[serde(default)]
	pub lazy: bool,
}

/// The bundler runtime that materializes module ids.
pub trait StaticRuntime: Send + Sync {
	/// Synchronously requires an eagerly bundled module.
	fn require(&self, module_id: &str) -> LoadResult<Module>;

	/// Loads a module from a lazy chunk.
	fn require_lazy(&self, module_id: &str) -> BoxFuture<'static, LoadResult<Module>> {
		let result = self.require(module_id);
		Box::pin(async move { result })
	}
}

/// Strategy over a static module map.
#[derive(Clone)]
pub struct StaticModuleMap {
	modules: HashMap<String, StaticModuleEntry>,
	base_path: String,
	runtime: Arc<dyn StaticRuntime>,
}

impl StaticModuleMap {
	/// Creates a strategy over `modules`, materialized by `runtime`.
	pub fn new<R: StaticRuntime + 'static>(
		modules: HashMap<String, StaticModuleEntry>,
		runtime: R,
	) -> Self {
		Self {
			modules,
			base_path: String::new(),
			runtime: Arc::new(runtime),
		}
	}

	/// Sets the directory relative identifiers are resolved against.
	pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = base_path.into().trim_matches('/').to_string();
		self
	}

	/// Parses a JSON module map (`{ "literal id": { "id": ..., "lazy": ... } }`).
	pub fn parse_map(json: &str) -> Result<HashMap<String, StaticModuleEntry>, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Returns the base path.
	pub fn base_path(&self) -> &str {
		&self.base_path
	}
}

impl std::fmt::Debug for StaticModuleMap {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticModuleMap")
			.field("modules", &self.modules.len())
			.field("base_path", &self.base_path)
			.finish()
	}
}

/// Resolves `mid` against `base` when it starts with `./` or `../`.
///
/// # Examples
///
/// ```
/// use parlance_loader::resolve_relative;
///
/// assert_eq!(resolve_relative("src/widgets", "./button").unwrap(), "src/widgets/button");
/// assert_eq!(resolve_relative("src/widgets", "../i18n/nls").unwrap(), "src/i18n/nls");
/// assert_eq!(resolve_relative("src/widgets", "dojo/core").unwrap(), "dojo/core");
/// assert!(resolve_relative("src", "../../x").is_err());
/// ```
pub fn resolve_relative(base: &str, mid: &str) -> LoadResult<String> {
	if !(mid.starts_with("./") || mid.starts_with("../")) {
		return Ok(mid.to_string());
	}

	let mut rest = mid.strip_prefix("./").unwrap_or(mid);
	let mut up = 0;
	while let Some(stripped) = rest.strip_prefix("../") {
		up += 1;
		rest = stripped;
	}

	let mut chunks: Vec<&str> = base.split('/').filter(|c| !c.is_empty()).collect();
	if up > chunks.len() {
		return Err(LoadError::PathBeyondRoot(mid.to_string()));
	}
	chunks.truncate(chunks.len() - up);
	chunks.push(rest);
	Ok(chunks.join("/"))
}

#[async_trait]
impl LoaderStrategy for StaticModuleMap {
	fn name(&self) -> &'static str {
		"static"
	}

	async fn require(&self, ids: &[String]) -> LoadResult<Vec<Module>> {
		let mut pending: Vec<BoxFuture<'static, LoadResult<Module>>> = Vec::with_capacity(ids.len());
		for mid in ids {
			let resolved = resolve_relative(&self.base_path, mid)?;
			let entry = self
				.modules
				.get(&resolved)
				.ok_or(LoadError::MissingModule(resolved))?;
			if entry.lazy {
				pending.push(self.runtime.require_lazy(&entry.id));
			} else {
				let result = self.runtime.require(&entry.id);
				pending.push(Box::pin(async move { result }));
			}
		}
		try_join_all(pending).await
	}
}
