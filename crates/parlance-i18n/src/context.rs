//! The i18n context: bundle registry, formatter cache, CLDR load cache and
//! root locale.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;

use crate::args::FormatArgs;
use crate::bundle::{Bundle, FrozenMessages, Messages, get_supported_locales, load_locale_bundles};
use crate::cldr::{CldrGroup, CldrLoadCache};
use crate::engine::{CldrEngine, GlobalizeEngine, MessageFormatter, ROOT_LOCALE};
use crate::error::{I18nError, Result};
use crate::locale::{normalize_locale, system_locale};
use crate::observer::{LocaleObserverHandle, LocaleObservers};
use crate::settings::I18nSettings;

static TOKEN_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid token regex"));

static GLOBAL: Lazy<I18n> = Lazy::new(I18n::default);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FormatterKey {
	locale: String,
	bundle_id: String,
	key: String,
}

/// An i18n context.
///
/// Holds every piece of state the message API needs: the registry of
/// message maps per bundle and locale, compiled ICU formatters, the CLDR
/// load cache, the root locale and its observers. Contexts are independent;
/// [`I18n::global`] is a process-wide one.
///
/// # Examples
///
/// ```
/// use parlance_i18n::{Bundle, FormatArgs, I18n};
///
/// # futures::executor::block_on(async {
/// let i18n = I18n::default().with_root_locale("en");
/// let bundle = Bundle::new([("greet", "Hello {name}")])
///     .locale("fr", [("greet", "Bonjour {name}")]);
///
/// let messages = i18n.i18n(&bundle, Some("fr")).await.unwrap();
/// assert_eq!(messages["greet"], "Bonjour {name}");
///
/// let text = i18n
///     .format_message(&bundle, "greet", &FormatArgs::from([("name", "Sam")]), Some("fr"))
///     .unwrap();
/// assert_eq!(text, "Bonjour Sam");
/// # });
/// ```
pub struct I18n {
	engine: Arc<dyn GlobalizeEngine>,
	cldr: RwLock<CldrLoadCache>,
	bundles: RwLock<HashMap<String, HashMap<String, FrozenMessages>>>,
	formatters: RwLock<HashMap<FormatterKey, MessageFormatter>>,
	root_locale: RwLock<String>,
	observers: LocaleObservers,
}

impl Default for I18n {
	fn default() -> Self {
		Self::new(Arc::new(CldrEngine::new()))
	}
}

impl fmt::Debug for I18n {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("I18n")
			.field("root_locale", &*self.root_locale.read())
			.field("bundles", &self.bundles.read().len())
			.field("formatters", &self.formatters.read().len())
			.field("observers", &self.observers.len())
			.finish()
	}
}

impl I18n {
	/// Creates a context around `engine`. The root locale starts as the
	/// [system locale](crate::system_locale).
	pub fn new(engine: Arc<dyn GlobalizeEngine>) -> Self {
		Self {
			engine,
			cldr: RwLock::new(CldrLoadCache::new()),
			bundles: RwLock::new(HashMap::new()),
			formatters: RwLock::new(HashMap::new()),
			root_locale: RwLock::new(system_locale().to_string()),
			observers: LocaleObservers::default(),
		}
	}

	/// The process-wide context, created on first use with a [`CldrEngine`].
	pub fn global() -> &'static I18n {
		&GLOBAL
	}

	/// Builds a context from settings, loading every configured CLDR
	/// document.
	pub async fn from_settings(settings: I18nSettings) -> Result<Self> {
		let mut i18n = Self::default();
		if let Some(locale) = settings.locale.as_deref() {
			i18n = i18n.with_root_locale(locale);
		}
		for document in settings.read_cldr_documents()? {
			i18n.load_cldr_data(&document).await?;
		}
		Ok(i18n)
	}

	/// Sets the initial root locale without notifying observers.
	pub fn with_root_locale(self, locale: &str) -> Self {
		*self.root_locale.write() = normalize_locale(locale);
		self
	}

	/// The globalization engine.
	pub fn engine(&self) -> &Arc<dyn GlobalizeEngine> {
		&self.engine
	}

	/// The current root locale.
	pub fn locale(&self) -> String {
		self.root_locale.read().clone()
	}

	/// Registers CLDR data with the load cache and hands it to the engine.
	///
	/// The first time `likelySubtags` becomes available the engine's default
	/// locale is set to the root locale.
	pub async fn load_cldr_data(&self, data: &Value) -> Result<()> {
		self.engine.load(data)?;
		self.cldr.write().register(data);

		let root = self.locale();
		if self.engine.locale().is_none()
			&& !root.is_empty()
			&& self.is_loaded(CldrGroup::Supplemental, &["likelySubtags"])
		{
			self.engine.set_locale(&root);
		}
		Ok(())
	}

	/// Whether the CLDR package at `path` has been loaded.
	/// See [`CldrLoadCache::is_loaded`].
	pub fn is_loaded(&self, group: CldrGroup, path: &[&str]) -> bool {
		self.cldr.read().is_loaded(group, path)
	}

	/// Forgets loaded CLDR packages of one group, or both.
	pub fn reset_cldr(&self, group: Option<CldrGroup>) {
		self.cldr.write().reset(group);
	}

	fn has_icu_data(&self) -> bool {
		self.is_loaded(CldrGroup::Supplemental, &["likelySubtags"])
			&& self.is_loaded(CldrGroup::Supplemental, &["plurals-type-cardinal"])
	}

	/// Stores `messages` for `bundle_id` under `locale` (`"root"` when
	/// `None`) and forwards them to the engine.
	pub fn load_messages(
		&self,
		bundle_id: &str,
		messages: FrozenMessages,
		locale: Option<&str>,
	) -> Result<()> {
		let locale = locale.unwrap_or(ROOT_LOCALE);
		self.engine
			.load_messages(locale, bundle_id, Arc::clone(&messages))?;
		self.bundles
			.write()
			.entry(bundle_id.to_string())
			.or_default()
			.insert(locale.to_string(), messages);
		Ok(())
	}

	/// Returns the cached messages of `bundle` for `locale` without loading.
	///
	/// A bundle seen for the first time has its defaults registered under
	/// `"root"`. The defaults are returned when the bundle has no partial in
	/// the locale's fallback chain. For a registered bundle the entry of the
	/// most specific supported locale is returned; `None` means the caller
	/// has to load.
	pub fn get_cached_messages(&self, bundle: &Bundle, locale: &str) -> Option<FrozenMessages> {
		let id = bundle.id();
		let locale = normalize_locale(locale);
		let cached = self
			.bundles
			.read()
			.get(id)
			.map(|entries| entries.get(&locale).cloned());

		match &cached {
			None => {
				if let Err(err) = self.load_messages(id, Arc::clone(bundle.messages()), None) {
					tracing::warn!(bundle = %id, error = %err, "engine rejected default messages");
				}
			}
			Some(Some(hit)) => return Some(Arc::clone(hit)),
			Some(None) => {}
		}

		let supported = get_supported_locales(&locale, bundle.supported_locales());
		let Some(most_specific) = supported.last() else {
			return Some(Arc::clone(bundle.messages()));
		};
		if cached.is_some() {
			return self.bundles.read().get(id)?.get(most_specific).cloned();
		}
		None
	}

	/// Resolves the messages of `bundle` for `locale` (the root locale when
	/// `None` or empty), loading and merging locale partials on a cache miss.
	///
	/// Partials are merged over the defaults from the most general locale to
	/// the most specific; the cache entry is refreshed after every step.
	/// Concurrent calls for the same locale each load and each write the
	/// cache.
	pub async fn i18n(&self, bundle: &Bundle, locale: Option<&str>) -> Result<FrozenMessages> {
		let current = locale
			.map(normalize_locale)
			.filter(|l| !l.is_empty())
			.unwrap_or_else(|| self.locale());
		if let Some(cached) = self.get_cached_messages(bundle, &current) {
			tracing::debug!(bundle = %bundle.id(), locale = %current, "message cache hit");
			return Ok(cached);
		}

		tracing::debug!(bundle = %bundle.id(), locale = %current, "loading locale partials");
		let supported = get_supported_locales(&current, bundle.supported_locales());
		let partials = load_locale_bundles(bundle.locales(), &supported).await?;

		let mut merged: Messages = bundle.messages().as_ref().clone();
		let mut result = Arc::clone(bundle.messages());
		for (step, partial) in partials.into_iter().enumerate() {
			merged.extend(partial);
			result = Arc::new(merged.clone());
			self.load_messages(bundle.id(), Arc::clone(&result), Some(&current))?;
			tracing::trace!(bundle = %bundle.id(), locale = %current, step, "merged partial");
		}
		Ok(result)
	}

	/// Seeds the cache with the defaults of `bundle` overridden by `messages`.
	pub fn set_locale_messages(&self, bundle: &Bundle, messages: Messages, locale: &str) -> Result<()> {
		let mut merged = bundle.messages().as_ref().clone();
		merged.extend(messages);
		self.load_messages(bundle.id(), Arc::new(merged), Some(&normalize_locale(locale)))
	}

	/// A formatter for message `key` of `bundle`.
	///
	/// With `likelySubtags` and cardinal plural rules loaded, the message is
	/// compiled as ICU MessageFormat by the engine. Otherwise `{token}`
	/// placeholders are substituted; this requires the bundle to be
	/// registered and fails at format time for tokens missing from the
	/// arguments.
	pub fn get_message_formatter(
		&self,
		bundle: &Bundle,
		key: &str,
		locale: Option<&str>,
	) -> Result<MessageFormatter> {
		let root = self.locale();
		let locale = locale
			.map(normalize_locale)
			.filter(|l| !l.is_empty())
			.unwrap_or(root.clone());
		if self.has_icu_data() {
			self.icu_message_formatter(bundle, key, locale, &root)
		} else {
			self.simple_message_formatter(bundle, key, &locale)
		}
	}

	fn icu_message_formatter(
		&self,
		bundle: &Bundle,
		key: &str,
		locale: String,
		root: &str,
	) -> Result<MessageFormatter> {
		let cache_key = FormatterKey {
			locale,
			bundle_id: bundle.id().to_string(),
			key: key.to_string(),
		};
		if let Some(formatter) = self.formatters.read().get(&cache_key) {
			return Ok(Arc::clone(formatter));
		}

		// Registers the defaults of a bundle seen for the first time.
		self.get_cached_messages(bundle, &cache_key.locale);

		let instance = (cache_key.locale != root).then_some(cache_key.locale.as_str());
		let formatter = self.engine.message_formatter(instance, bundle.id(), key)?;

		let has_entry = self
			.bundles
			.read()
			.get(bundle.id())
			.is_some_and(|entries| entries.contains_key(&cache_key.locale));
		if has_entry {
			self.formatters
				.write()
				.insert(cache_key, Arc::clone(&formatter));
		}
		Ok(formatter)
	}

	fn simple_message_formatter(
		&self,
		bundle: &Bundle,
		key: &str,
		locale: &str,
	) -> Result<MessageFormatter> {
		let messages = self
			.bundles
			.read()
			.get(bundle.id())
			.and_then(|entries| entries.get(locale).or_else(|| entries.get(ROOT_LOCALE)))
			.cloned()
			.ok_or(I18nError::BundleNotRegistered)?;
		let template = messages
			.get(key)
			.cloned()
			.ok_or_else(|| I18nError::MissingMessage {
				bundle_id: bundle.id().to_string(),
				key: key.to_string(),
			})?;
		Ok(Arc::new(move |args: &FormatArgs| substitute_tokens(&template, args)))
	}

	/// Formats message `key` of `bundle` with `args`.
	pub fn format_message(
		&self,
		bundle: &Bundle,
		key: &str,
		args: &FormatArgs,
		locale: Option<&str>,
	) -> Result<String> {
		(self.get_message_formatter(bundle, key, locale)?)(args)
	}

	/// Drops the registry entries of `bundle`, or of every bundle, along with
	/// their compiled formatters.
	pub fn invalidate(&self, bundle: Option<&Bundle>) {
		match bundle {
			Some(bundle) => {
				self.bundles.write().remove(bundle.id());
				self.formatters
					.write()
					.retain(|key, _| key.bundle_id != bundle.id());
			}
			None => {
				self.bundles.write().clear();
				self.formatters.write().clear();
			}
		}
	}

	/// Calls `callback` with the new root locale on every change.
	pub fn observe_locale<F>(&self, callback: F) -> LocaleObserverHandle
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.observers.register(Arc::new(callback))
	}

	/// Changes the root locale and notifies observers.
	///
	/// Nothing happens when the normalized locale equals the current one.
	/// The engine's default locale follows only once `likelySubtags` is
	/// loaded.
	pub fn switch_locale(&self, locale: &str) {
		let locale = normalize_locale(locale);
		{
			let mut root = self.root_locale.write();
			if *root == locale {
				return;
			}
			*root = locale.clone();
		}
		if !locale.is_empty() && self.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]) {
			self.engine.set_locale(&locale);
		}
		tracing::debug!(locale = %locale, "root locale changed");
		self.observers.notify(&locale);
	}

	/// Clears the bundle registry, the formatter cache and the CLDR load
	/// cache, and resets the root locale to the system locale.
	pub fn teardown(&self) {
		self.bundles.write().clear();
		self.formatters.write().clear();
		self.cldr.write().reset(None);
		*self.root_locale.write() = system_locale().to_string();
	}

	/// The locale to request from the engine: `None` (the default instance)
	/// for the root locale, unless the engine has no default locale yet.
	pub(crate) fn instance_locale(&self, locale: Option<&str>) -> Option<String> {
		let root = self.locale();
		match locale {
			Some(locale) if locale != root => Some(locale.to_string()),
			_ if self.engine.locale().is_some() => None,
			_ => Some(root),
		}
	}
}

fn substitute_tokens(template: &str, args: &FormatArgs) -> Result<String> {
	let mut out = String::with_capacity(template.len());
	let mut last = 0;
	for captures in TOKEN_PATTERN.captures_iter(template) {
		let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
			continue;
		};
		let value = args
			.get(name.as_str())
			.ok_or_else(|| I18nError::MissingToken(name.as_str().to_string()))?;
		out.push_str(&template[last..whole.start()]);
		out.push_str(&value.to_string());
		last = whole.end();
	}
	out.push_str(&template[last..]);
	Ok(out)
}
