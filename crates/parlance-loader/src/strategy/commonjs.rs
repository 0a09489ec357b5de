//! CommonJS-style synchronous `require`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::LoaderStrategy;
use crate::error::{LoadError, LoadResult};
use crate::module::Module;

/// Synchronous `require(id)`.
pub type RequireFn = dyn Fn(&str) -> LoadResult<Module> + Send + Sync;

/// `require.resolve(id)`.
pub type ResolveFn = dyn Fn(&str) -> String + Send + Sync;

/// Strategy wrapping a synchronous `require`.
///
/// The first failing `require` turns the whole batch into an error.
#[derive(Clone)]
pub struct CommonJsStrategy {
	require: Arc<RequireFn>,
	resolve: Option<Arc<ResolveFn>>,
}

impl CommonJsStrategy {
	/// Creates a strategy from a `require` function.
	pub fn new<F>(require: F) -> Self
	where
		F: Fn(&str) -> LoadResult<Module> + Send + Sync + 'static,
	{
		Self {
			require: Arc::new(require),
			resolve: None,
		}
	}

	/// Creates a strategy serving modules from a fixed table.
	///
	/// # Examples
	///
	/// ```
	/// use parlance_loader::{CommonJsStrategy, Module};
	/// use std::collections::HashMap;
	///
	/// let mut modules = HashMap::new();
	/// modules.insert("config".to_string(), Module::plain(42_u32));
	/// let strategy = CommonJsStrategy::from_modules(modules);
	/// ```
	pub fn from_modules(modules: HashMap<String, Module>) -> Self {
		Self::new(move |id| {
			modules
				.get(id)
				.cloned()
				.ok_or_else(|| LoadError::require(id, "Cannot find module"))
		})
	}

	/// Sets the `require.resolve` used to normalize plugin resources.
	pub fn with_resolve<F>(mut self, resolve: F) -> Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.resolve = Some(Arc::new(resolve));
		self
	}
}

impl std::fmt::Debug for CommonJsStrategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommonJsStrategy")
			.field("resolve", &self.resolve.is_some())
			.finish()
	}
}

#[async_trait]
impl LoaderStrategy for CommonJsStrategy {
	fn name(&self) -> &'static str {
		"commonjs"
	}

	async fn require(&self, ids: &[String]) -> LoadResult<Vec<Module>> {
		ids.iter().map(|id| (self.require)(id)).collect()
	}

	fn resolve(&self, id: &str) -> String {
		match &self.resolve {
			Some(resolve) => resolve(id),
			None => id.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn strategy() -> CommonJsStrategy {
		let mut modules = HashMap::new();
		modules.insert("a".to_string(), Module::plain("A"));
		modules.insert("b".to_string(), Module::plain("B"));
		CommonJsStrategy::from_modules(modules)
	}

	#[rstest]
	#[tokio::test]
	async fn test_require_preserves_order() {
		// Act
		let modules = strategy()
			.require(&["b".to_string(), "a".to_string()])
			.await
			.unwrap();

		// Assert
		assert_eq!(modules[0].downcast_ref::<&str>(), Some(&"B"));
		assert_eq!(modules[1].downcast_ref::<&str>(), Some(&"A"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_require_failure_rejects_batch() {
		// Act
		let result = strategy()
			.require(&["a".to_string(), "nope".to_string()])
			.await;

		// Assert
		let err = result.unwrap_err();
		assert!(matches!(err, LoadError::Require { ref id, .. } if id == "nope"));
	}

	#[rstest]
	fn test_resolve_defaults_to_identity() {
		assert_eq!(strategy().resolve("./x"), "./x");
		let resolving = strategy().with_resolve(|id| format!("/root/{}", id));
		assert_eq!(resolving.resolve("x"), "/root/x");
	}
}
