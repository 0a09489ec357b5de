//! AMD-style asynchronous `require(ids, callback)`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::oneshot;
use parking_lot::Mutex;

use super::LoaderStrategy;
use crate::error::{LoadError, LoadResult};
use crate::module::Module;

/// Completion callback handed to an AMD `require`.
pub type AmdCallback = Box<dyn FnOnce(Vec<Module>) + Send>;

/// Listener for the loader's `error` event.
pub type ErrorHandler = Arc<dyn Fn(LoadError) + Send + Sync>;

/// A registered `error` listener.
pub trait ErrorSubscription: Send {
	/// Removes the listener.
	fn remove(self: Box<Self>);
}

/// An AMD host loader.
pub trait AmdRequire: Send + Sync {
	/// Requests `ids` and invokes `callback` with the modules in order.
	fn require(&self, ids: Vec<String>, callback: AmdCallback);

	/// Subscribes to the loader's `error` event.
	///
	/// Returns `None` when the host has no error event.
	fn on_error(&self, _handler: ErrorHandler) -> Option<Box<dyn ErrorSubscription>> {
		None
	}

	/// `require.toUrl(id)`, when supported.
	fn to_url(&self, _id: &str) -> Option<String> {
		None
	}
}

/// Strategy wrapping an AMD loader.
#[derive(Clone)]
pub struct AmdStrategy {
	require: Arc<dyn AmdRequire>,
}

impl AmdStrategy {
	/// Creates a strategy over `require`.
	pub fn new<R: AmdRequire + 'static>(require: R) -> Self {
		Self {
			require: Arc::new(require),
		}
	}

	/// Creates a strategy over a shared loader.
	pub fn from_arc(require: Arc<dyn AmdRequire>) -> Self {
		Self { require }
	}
}

type Completion = Arc<Mutex<Option<oneshot::Sender<LoadResult<Vec<Module>>>>>>;

fn complete(slot: &Completion, result: LoadResult<Vec<Module>>) {
	if let Some(sender) = slot.lock().take() {
		// Receiver gone means the caller stopped waiting.
		let _ = sender.send(result);
	}
}

#[async_trait]
impl LoaderStrategy for AmdStrategy {
	fn name(&self) -> &'static str {
		"amd"
	}

	async fn require(&self, ids: &[String]) -> LoadResult<Vec<Module>> {
		let (sender, receiver) = oneshot::channel();
		let slot: Completion = Arc::new(Mutex::new(Some(sender)));

		let subscription = {
			let slot = Arc::clone(&slot);
			self.require
				.on_error(Arc::new(move |err| complete(&slot, Err(err))))
		};

		{
			let slot = Arc::clone(&slot);
			self.require.require(
				ids.to_vec(),
				Box::new(move |modules| complete(&slot, Ok(modules))),
			);
		}
		// Only the callback and the error listener may complete the request.
		drop(slot);

		let result = receiver
			.await
			.unwrap_or_else(|_| Err(LoadError::Abandoned(ids.join(", "))));

		if let Some(subscription) = subscription {
			subscription.remove();
		}

		result
	}

	fn resolve(&self, id: &str) -> String {
		self.require.to_url(id).unwrap_or_else(|| id.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// In-memory AMD host that reports unknown ids through its error event.
	#[derive(Default)]
	struct Host {
		modules: HashMap<String, Module>,
		handlers: Arc<Mutex<Vec<(usize, ErrorHandler)>>>,
		next: AtomicUsize,
	}

	struct Subscription {
		id: usize,
		handlers: Arc<Mutex<Vec<(usize, ErrorHandler)>>>,
	}

	impl ErrorSubscription for Subscription {
		fn remove(self: Box<Self>) {
			self.handlers.lock().retain(|(id, _)| *id != self.id);
		}
	}

	impl AmdRequire for Host {
		fn require(&self, ids: Vec<String>, callback: AmdCallback) {
			let found: Option<Vec<Module>> =
				ids.iter().map(|id| self.modules.get(id).cloned()).collect();
			match found {
				Some(modules) => callback(modules),
				None => {
					let handlers: Vec<ErrorHandler> =
						self.handlers.lock().iter().map(|(_, h)| h.clone()).collect();
					for handler in handlers {
						handler(LoadError::Loader(format!("scriptError: {}", ids.join(","))));
					}
				}
			}
		}

		fn on_error(&self, handler: ErrorHandler) -> Option<Box<dyn ErrorSubscription>> {
			let id = self.next.fetch_add(1, Ordering::SeqCst);
			self.handlers.lock().push((id, handler));
			Some(Box::new(Subscription {
				id,
				handlers: Arc::clone(&self.handlers),
			}))
		}

		fn to_url(&self, id: &str) -> Option<String> {
			Some(format!("/app/{}", id))
		}
	}

	struct Silent;

	impl AmdRequire for Silent {
		fn require(&self, _ids: Vec<String>, _callback: AmdCallback) {}
	}

	fn host() -> (AmdStrategy, Arc<Mutex<Vec<(usize, ErrorHandler)>>>) {
		let mut host = Host::default();
		host.modules.insert("a".to_string(), Module::plain(1_u8));
		let handlers = Arc::clone(&host.handlers);
		(AmdStrategy::new(host), handlers)
	}

	#[rstest]
	#[tokio::test]
	async fn test_require_resolves_and_unsubscribes() {
		// Arrange
		let (strategy, handlers) = host();

		// Act
		let modules = strategy.require(&["a".to_string()]).await.unwrap();

		// Assert
		assert_eq!(modules[0].downcast_ref::<u8>(), Some(&1));
		assert!(handlers.lock().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_error_event_rejects_and_unsubscribes() {
		// Arrange
		let (strategy, handlers) = host();

		// Act
		let result = strategy.require(&["missing".to_string()]).await;

		// Assert
		assert!(matches!(result, Err(LoadError::Loader(ref m)) if m.contains("missing")));
		assert!(handlers.lock().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_dropped_callback_is_abandoned() {
		// Arrange
		let strategy = AmdStrategy::new(Silent);

		// Act
		let result = strategy.require(&["x".to_string()]).await;

		// Assert
		assert_eq!(result.unwrap_err(), LoadError::Abandoned("x".to_string()));
	}

	#[rstest]
	fn test_resolve_uses_to_url() {
		let (strategy, _) = host();
		assert_eq!(strategy.resolve("tpl.html"), "/app/tpl.html");
		assert_eq!(AmdStrategy::new(Silent).resolve("tpl.html"), "tpl.html");
	}
}
