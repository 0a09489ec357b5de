//! Root-locale change notification.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Callback invoked with the new root locale.
pub type LocaleCallback = Arc<dyn Fn(&str) + Send + Sync>;

struct ObserverInfo {
	id: u64,
	callback: LocaleCallback,
}

#[derive(Default)]
struct ObserverList {
	next_id: u64,
	observers: Vec<ObserverInfo>,
}

/// The list of root-locale observers.
#[derive(Clone, Default)]
pub(crate) struct LocaleObservers {
	list: Arc<RwLock<ObserverList>>,
}

impl LocaleObservers {
	pub(crate) fn register(&self, callback: LocaleCallback) -> LocaleObserverHandle {
		let mut list = self.list.write();
		let id = list.next_id;
		list.next_id += 1;
		list.observers.push(ObserverInfo { id, callback });
		LocaleObserverHandle {
			id,
			list: Arc::downgrade(&self.list),
		}
	}

	/// Calls every observer with `locale`.
	///
	/// Callbacks run outside the lock, so they may register or remove
	/// observers themselves.
	pub(crate) fn notify(&self, locale: &str) {
		let callbacks: Vec<LocaleCallback> = self
			.list
			.read()
			.observers
			.iter()
			.map(|o| Arc::clone(&o.callback))
			.collect();
		for callback in callbacks {
			callback(locale);
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.list.read().observers.len()
	}

	#[cfg(test)]
	fn clear(&self) {
		self.list.write().observers.clear();
	}
}

/// Registration returned by [`I18n::observe_locale`](crate::I18n::observe_locale).
///
/// Dropping the handle keeps the observer registered; call
/// [`remove`](Self::remove) to stop notifications.
pub struct LocaleObserverHandle {
	id: u64,
	list: Weak<RwLock<ObserverList>>,
}

impl LocaleObserverHandle {
	/// Unregisters the observer. Returns whether it was still registered.
	pub fn remove(self) -> bool {
		let Some(list) = self.list.upgrade() else {
			return false;
		};
		let mut list = list.write();
		let before = list.observers.len();
		list.observers.retain(|o| o.id != self.id);
		list.observers.len() < before
	}
}

impl fmt::Debug for LocaleObserverHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocaleObserverHandle")
			.field("id", &self.id)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;

	fn recorder() -> (Arc<Mutex<Vec<String>>>, LocaleCallback) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		(seen, Arc::new(move |locale: &str| sink.lock().push(locale.to_string())))
	}

	#[test]
	fn test_notify_reaches_every_observer() {
		// Arrange
		let observers = LocaleObservers::default();
		let (first, a) = recorder();
		let (second, b) = recorder();
		let _ha = observers.register(a);
		let _hb = observers.register(b);

		// Act
		observers.notify("fr");

		// Assert
		assert_eq!(*first.lock(), vec!["fr"]);
		assert_eq!(*second.lock(), vec!["fr"]);
	}

	#[test]
	fn test_remove_stops_notifications() {
		// Arrange
		let observers = LocaleObservers::default();
		let (seen, callback) = recorder();
		let handle = observers.register(callback);
		observers.notify("fr");

		// Act
		let removed = handle.remove();
		observers.notify("de");

		// Assert
		assert!(removed);
		assert_eq!(*seen.lock(), vec!["fr"]);
		assert_eq!(observers.len(), 0);
	}

	#[test]
	fn test_remove_after_clear_reports_false() {
		let observers = LocaleObservers::default();
		let (_, callback) = recorder();
		let handle = observers.register(callback);
		observers.clear();
		assert!(!handle.remove());
	}
}
