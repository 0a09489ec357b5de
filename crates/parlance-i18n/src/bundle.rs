//! Message bundles and locale partial loading.
//!
//! A [`Bundle`] holds a set of default messages and, per locale, a loader
//! for a partial message map that overrides some of them. Partials may be
//! available immediately, produced by an async function, or loaded as a
//! module through [`parlance_loader::ModuleLoader`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, try_join_all};
use parlance_loader::{LoadError, ModuleLoader};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::locale::{generate_locales, normalize_locale};

/// A message map, keyed by message key.
pub type Messages = HashMap<String, String>;

/// An immutable, shared message map as stored in the registry.
pub type FrozenMessages = Arc<Messages>;

/// Result of a locale loader: a plain message map or a module namespace
/// whose `default` export is the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleModule {
	/// A plain message map.
	Messages(Messages),
	/// A module exposing the map as its default export.
	Esm {
		/// The default export.
		default: Messages,
	},
}

impl LocaleModule {
	/// Unwraps the default export, if any.
	pub fn into_messages(self) -> Messages {
		match self {
			Self::Messages(messages) | Self::Esm { default: messages } => messages,
		}
	}
}

impl From<Messages> for LocaleModule {
	fn from(messages: Messages) -> Self {
		Self::Messages(messages)
	}
}

/// Future returned by a [`LocaleLoader`].
pub type LocaleFuture = BoxFuture<'static, Result<LocaleModule>>;

/// Produces the partial messages of one locale.
#[derive(Clone)]
pub struct LocaleLoader(Arc<dyn Fn() -> LocaleFuture + Send + Sync>);

impl LocaleLoader {
	/// A loader whose partial is available immediately.
	pub fn ready(messages: Messages) -> Self {
		let messages = Arc::new(messages);
		Self(Arc::new(move || {
			futures::future::ready(Ok(LocaleModule::Messages((*messages).clone()))).boxed()
		}))
	}

	/// A loader backed by an async function.
	pub fn from_fn<F, Fut>(load: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<LocaleModule>> + Send + 'static,
	{
		Self(Arc::new(move || load().boxed()))
	}

	/// Invokes the loader.
	pub fn load(&self) -> LocaleFuture {
		(self.0)()
	}
}

impl fmt::Debug for LocaleLoader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("LocaleLoader(..)")
	}
}

/// A loader that fetches the partial as module `module_id`.
///
/// The module's default export must be a [`Messages`] map or a JSON object
/// of strings.
pub fn module_locale_loader(loader: ModuleLoader, module_id: impl Into<String>) -> LocaleLoader {
	let module_id: String = module_id.into();
	LocaleLoader::from_fn(move || load_module_messages(loader.clone(), module_id.clone()))
}

async fn load_module_messages(loader: ModuleLoader, module_id: String) -> Result<LocaleModule> {
	let modules = loader.load([module_id.as_str()]).await?;
	let module = modules
		.into_iter()
		.next()
		.ok_or_else(|| LoadError::MissingModule(module_id.clone()))?;

	if let Some(messages) = module.downcast_ref::<Messages>() {
		return Ok(LocaleModule::Messages(messages.clone()));
	}
	if let Some(Value::Object(object)) = module.downcast_ref::<Value>() {
		let messages = object
			.iter()
			.filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
			.collect();
		return Ok(LocaleModule::Messages(messages));
	}
	Err(LoadError::Custom(format!("module '{}' does not export messages", module_id)).into())
}

/// A set of default messages plus per-locale partial loaders.
///
/// The id is the bundle's identity in every registry; clones share it.
///
/// # Examples
///
/// ```
/// use parlance_i18n::Bundle;
///
/// let bundle = Bundle::new([("hello", "Hello"), ("bye", "Goodbye")])
///     .with_id("greetings")
///     .locale("fr", [("hello", "Bonjour")]);
///
/// assert_eq!(bundle.id(), "greetings");
/// assert_eq!(bundle.messages()["hello"], "Hello");
/// assert_eq!(bundle.supported_locales().collect::<Vec<_>>(), vec!["fr"]);
/// ```
#[derive(Clone)]
pub struct Bundle {
	id: String,
	messages: FrozenMessages,
	locales: BTreeMap<String, LocaleLoader>,
}

impl Bundle {
	/// Creates a bundle with a fresh UUID v4 id.
	pub fn new<I, K, V>(messages: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			id: Uuid::new_v4().to_string(),
			messages: Arc::new(collect_messages(messages)),
			locales: BTreeMap::new(),
		}
	}

	/// Replaces the id.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();
		self
	}

	/// Adds a partial that is available immediately.
	pub fn locale<I, K, V>(self, locale: &str, messages: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.with_loader(locale, LocaleLoader::ready(collect_messages(messages)))
	}

	/// Adds a partial produced by an async function.
	pub fn lazy_locale<F, Fut>(self, locale: &str, load: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<LocaleModule>> + Send + 'static,
	{
		self.with_loader(locale, LocaleLoader::from_fn(load))
	}

	/// Adds a partial loaded as a module through `loader`.
	pub fn module_locale(
		self,
		locale: &str,
		loader: ModuleLoader,
		module_id: impl Into<String>,
	) -> Self {
		self.with_loader(locale, module_locale_loader(loader, module_id))
	}

	/// Adds an arbitrary locale loader. The locale key is normalized.
	pub fn with_loader(mut self, locale: &str, loader: LocaleLoader) -> Self {
		self.locales.insert(normalize_locale(locale), loader);
		self
	}

	/// The bundle id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The default messages.
	pub fn messages(&self) -> &FrozenMessages {
		&self.messages
	}

	/// The per-locale partial loaders.
	pub fn locales(&self) -> &BTreeMap<String, LocaleLoader> {
		&self.locales
	}

	/// Locales with a partial loader.
	pub fn supported_locales(&self) -> impl Iterator<Item = &str> {
		self.locales.keys().map(String::as_str)
	}
}

impl fmt::Debug for Bundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Bundle")
			.field("id", &self.id)
			.field("messages", &self.messages.len())
			.field("locales", &self.locales.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// A serializable bundle definition, typically read from JSON or TOML.
///
/// ```json
/// { "messages": { "hello": "Hello" }, "locales": { "fr": { "hello": "Bonjour" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BundleDef {
	/// Explicit id; one is generated when absent.
	#[serde(default)]
	pub id: Option<String>,
	/// Default messages.
	pub messages: Messages,
	/// Static partials per locale.
	#[serde(default)]
	pub locales: HashMap<String, Messages>,
}

/// Turns `def` into a [`Bundle`], keeping its id or assigning a new one.
///
/// Returns the bundle together with its id; `def` is consumed and never
/// modified in place.
///
/// # Examples
///
/// ```
/// use parlance_i18n::{BundleDef, ensure_bundle_id};
///
/// let def: BundleDef = serde_json::from_str(r#"{ "messages": { "a": "A" } }"#).unwrap();
/// let (bundle, id) = ensure_bundle_id(def.clone());
/// assert_eq!(bundle.id(), id);
///
/// let named = BundleDef { id: Some("named".into()), ..def };
/// assert_eq!(ensure_bundle_id(named).1, "named");
/// ```
pub fn ensure_bundle_id(def: BundleDef) -> (Bundle, String) {
	let mut bundle = Bundle::new(def.messages);
	if let Some(id) = def.id {
		bundle = bundle.with_id(id);
	}
	for (locale, messages) in def.locales {
		bundle = bundle.locale(&locale, messages);
	}
	let id = bundle.id().to_string();
	(bundle, id)
}

/// Filters the fallback chain of `target` down to `supported`, preserving
/// general → specific order.
///
/// # Examples
///
/// ```
/// use parlance_i18n::get_supported_locales;
///
/// assert_eq!(get_supported_locales("fr-CA", ["fr", "de"]), vec!["fr"]);
/// assert_eq!(get_supported_locales("fr-CA", ["fr-CA", "fr"]), vec!["fr", "fr-CA"]);
/// assert!(get_supported_locales("en", ["fr"]).is_empty());
/// ```
pub fn get_supported_locales<'a>(
	target: &str,
	supported: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
	let supported: Vec<&str> = supported.into_iter().collect();
	generate_locales(target)
		.into_iter()
		.filter(|locale| supported.contains(&locale.as_str()))
		.collect()
}

/// Runs the loaders for `chain` concurrently and returns their messages in
/// `chain` order, with `{ default }` shapes unwrapped.
pub async fn load_locale_bundles(
	locales: &BTreeMap<String, LocaleLoader>,
	chain: &[String],
) -> Result<Vec<Messages>> {
	let pending = chain
		.iter()
		.filter_map(|locale| locales.get(locale))
		.map(LocaleLoader::load);
	let modules = try_join_all(pending).await?;
	Ok(modules.into_iter().map(LocaleModule::into_messages).collect())
}

fn collect_messages<I, K, V>(messages: I) -> Messages
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	messages
		.into_iter()
		.map(|(k, v)| (k.into(), v.into()))
		.collect()
}
