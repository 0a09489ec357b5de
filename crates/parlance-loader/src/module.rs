//! Loaded module values and module identifiers.
//!
//! A loaded module is a tagged union: plain exports, a loader plugin, or an
//! ES-module namespace whose `default` export wraps one of the others.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::plugin::LoadPlugin;

/// Type-erased module exports.
pub type Exports = Arc<dyn Any + Send + Sync>;

/// A module produced by a loader strategy or a plugin.
#[derive(Clone)]
pub enum Module {
	/// Ordinary exports.
	Plain(Exports),
	/// A module that can load resources named after `!`.
	Plugin(Arc<dyn LoadPlugin>),
	/// An ES-module namespace exposing a `default` export.
	Esm {
		/// The default export.
		default: Box<Module>,
	},
}

impl Module {
	/// Wraps a plain exports value.
	pub fn plain<T: Any + Send + Sync>(value: T) -> Self {
		Self::Plain(Arc::new(value))
	}

	/// Wraps a loader plugin.
	pub fn plugin<P: LoadPlugin + 'static>(plugin: P) -> Self {
		Self::Plugin(Arc::new(plugin))
	}

	/// Wraps `default` as the default export of an ES-module namespace.
	pub fn esm(default: Module) -> Self {
		Self::Esm {
			default: Box::new(default),
		}
	}

	/// Returns the plugin behind this module's default export, if any.
	pub fn as_plugin(&self) -> Option<&Arc<dyn LoadPlugin>> {
		match use_default(self) {
			Self::Plugin(plugin) => Some(plugin),
			_ => None,
		}
	}

	/// Downcasts the default export (or the module itself) to `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		match use_default(self) {
			Self::Plain(exports) => exports.downcast_ref::<T>(),
			_ => None,
		}
	}
}

impl fmt::Debug for Module {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Plain(_) => f.write_str("Module::Plain(..)"),
			Self::Plugin(_) => f.write_str("Module::Plugin(..)"),
			Self::Esm { default } => f.debug_struct("Module::Esm").field("default", default).finish(),
		}
	}
}

/// Returns the default export of `module`, or `module` itself when it has none.
pub fn use_default(module: &Module) -> &Module {
	match module {
		Module::Esm { default } => use_default(default),
		other => other,
	}
}

/// Whether `module` (or its default export) is a loader plugin.
pub fn is_plugin(module: &Module) -> bool {
	module.as_plugin().is_some()
}

/// A module identifier split into its module and resource halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
	/// Identifier handed to the host loader.
	pub module_id: String,
	/// Opaque resource identifier handed to the plugin, when present.
	pub resource_id: Option<String>,
}

impl ModuleRequest {
	/// Splits `id` on the first `!`.
	///
	/// # Examples
	///
	/// ```
	/// use parlance_loader::ModuleRequest;
	///
	/// let request = ModuleRequest::parse("text!./template.html!raw");
	/// assert_eq!(request.module_id, "text");
	/// assert_eq!(request.resource_id.as_deref(), Some("./template.html!raw"));
	///
	/// let plain = ModuleRequest::parse("widgets/button");
	/// assert_eq!(plain.resource_id, None);
	/// ```
	pub fn parse(id: &str) -> Self {
		match id.split_once('!') {
			Some((module_id, resource_id)) => Self {
				module_id: module_id.to_string(),
				resource_id: Some(resource_id.to_string()),
			},
			None => Self {
				module_id: id.to_string(),
				resource_id: None,
			},
		}
	}
}
