//! Tracking of which CLDR packages have been loaded.
//!
//! The cache answers "is ICU-quality formatting available yet" without
//! asking the engine. It has two partitions:
//!
//! - `main`: per locale, a tree mirroring [`MAIN_PACKAGES`]
//! - `supplemental`: a flat flag per name in [`SUPPLEMENTAL_PACKAGES`]
//!
//! Flags only move from `false` to `true`; [`CldrLoadCache::reset`] restores
//! the initial shape.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::locale::{generate_locales, validate_locale};

/// CLDR main packages tracked per locale.
pub const MAIN_PACKAGES: &[&str] = &[
	"dates/calendars/gregorian",
	"dates/fields",
	"dates/timeZoneNames",
	"numbers",
	"numbers/currencies",
	"units",
];

/// CLDR supplemental packages tracked globally.
pub const SUPPLEMENTAL_PACKAGES: &[&str] = &[
	"currencyData",
	"likelySubtags",
	"numberingSystems",
	"plurals-type-cardinal",
	"plurals-type-ordinal",
	"timeData",
	"weekData",
];

/// A partition of the CLDR load cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CldrGroup {
	/// Locale-specific data.
	Main,
	/// Locale-independent data.
	Supplemental,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PackageNode {
	loaded: bool,
	children: BTreeMap<String, PackageNode>,
}

impl PackageNode {
	fn package_tree() -> Self {
		let mut root = Self::default();
		for package in MAIN_PACKAGES {
			let mut node = &mut root;
			for segment in package.split('/') {
				node = node.children.entry(segment.to_string()).or_default();
			}
		}
		root
	}

	/// Flips every node that `data` has a key for.
	fn register(&mut self, data: &Value) {
		let Some(object) = data.as_object() else {
			return;
		};
		for (key, child) in self.children.iter_mut() {
			if let Some(value) = object.get(key) {
				child.loaded = true;
				child.register(value);
			}
		}
	}

	fn is_loaded<'a>(&self, mut segments: impl Iterator<Item = &'a str>) -> bool {
		match segments.next() {
			None => true,
			Some(segment) => self
				.children
				.get(segment)
				.is_some_and(|child| child.loaded && child.is_loaded(segments)),
		}
	}
}

/// Which CLDR packages have been registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CldrLoadCache {
	main: HashMap<String, PackageNode>,
	supplemental: BTreeMap<String, bool>,
}

impl Default for CldrLoadCache {
	fn default() -> Self {
		Self::new()
	}
}

impl CldrLoadCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self {
			main: HashMap::new(),
			supplemental: supplemental_flags(),
		}
	}

	/// Returns whether the package at `path` is loaded.
	///
	/// For [`CldrGroup::Main`] the first segment is a locale; the rest of the
	/// path must be loaded for some locale in its fallback chain. Invalid
	/// locales are never loaded. Segments may themselves contain `/`.
	///
	/// # Examples
	///
	/// ```
	/// use parlance_i18n::{CldrGroup, CldrLoadCache};
	/// use serde_json::json;
	///
	/// let mut cache = CldrLoadCache::new();
	/// cache.register(&json!({ "main": { "fr": { "numbers": {} } } }));
	///
	/// assert!(cache.is_loaded(CldrGroup::Main, &["fr-CA", "numbers"]));
	/// assert!(!cache.is_loaded(CldrGroup::Main, &["fr-CA", "numbers/currencies"]));
	/// assert!(!cache.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]));
	/// ```
	pub fn is_loaded(&self, group: CldrGroup, path: &[&str]) -> bool {
		let segments = || path.iter().flat_map(|p| p.split('/'));
		match group {
			CldrGroup::Main => {
				let Some((locale, rest)) = path.split_first() else {
					return !self.main.is_empty();
				};
				if !validate_locale(locale) {
					return false;
				}
				let rest_segments = || rest.iter().flat_map(|p| p.split('/'));
				generate_locales(locale).iter().any(|candidate| {
					self.main
						.get(candidate)
						.is_some_and(|tree| tree.is_loaded(rest_segments()))
				})
			}
			CldrGroup::Supplemental => {
				let mut segments = segments();
				match (segments.next(), segments.next()) {
					(None, _) => self.supplemental.values().any(|loaded| *loaded),
					(Some(name), None) => self.supplemental.get(name).copied().unwrap_or(false),
					(Some(_), Some(_)) => false,
				}
			}
		}
	}

	/// Registers every recognised package in a CLDR document of the shape
	/// `{ "main": { locale: {...} }, "supplemental": {...} }`.
	///
	/// Unrecognised keys and invalid locales are ignored.
	pub fn register(&mut self, data: &Value) {
		if let Some(main) = data.get("main").and_then(Value::as_object) {
			for (locale, packages) in main {
				if !validate_locale(locale) {
					tracing::trace!(locale = %locale, "skipping CLDR data for invalid locale");
					continue;
				}
				self.main
					.entry(locale.clone())
					.or_insert_with(PackageNode::package_tree)
					.register(packages);
			}
		}

		if let Some(supplemental) = data.get("supplemental").and_then(Value::as_object) {
			for key in supplemental.keys() {
				if let Some(flag) = self.supplemental.get_mut(key) {
					*flag = true;
				}
			}
		}
	}

	/// Restores one partition, or both, to the initial shape.
	pub fn reset(&mut self, group: Option<CldrGroup>) {
		match group {
			Some(CldrGroup::Main) => self.main.clear(),
			Some(CldrGroup::Supplemental) => self.supplemental = supplemental_flags(),
			None => *self = Self::new(),
		}
	}

	/// Locales with a main package tree.
	pub fn locales(&self) -> impl Iterator<Item = &str> {
		self.main.keys().map(String::as_str)
	}
}

fn supplemental_flags() -> BTreeMap<String, bool> {
	SUPPLEMENTAL_PACKAGES
		.iter()
		.map(|name| (name.to_string(), false))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn cache() -> CldrLoadCache {
		let mut cache = CldrLoadCache::new();
		cache.register(&json!({
			"main": {
				"fr": {
					"numbers": { "currencies": {} },
					"dates": { "calendars": { "gregorian": {} } },
					"unknown": { "ignored": true }
				},
				"not a locale": { "numbers": {} }
			},
			"supplemental": {
				"likelySubtags": {},
				"made-up": {}
			}
		}));
		cache
	}

	#[rstest]
	#[case(&["fr", "numbers"], true)]
	#[case(&["fr-CA", "numbers"], true)]
	#[case(&["fr-CA", "numbers", "currencies"], true)]
	#[case(&["fr-CA", "numbers/currencies"], true)]
	#[case(&["fr", "dates/calendars/gregorian"], true)]
	#[case(&["fr", "dates"], true)]
	#[case(&["fr", "dates/fields"], false)]
	#[case(&["fr", "units"], false)]
	#[case(&["fr", "unknown"], false)]
	#[case(&["en", "numbers"], false)]
	#[case(&["1fr", "numbers"], false)]
	fn test_main_fallback_chain(
		cache: CldrLoadCache,
		#[case] path: &[&str],
		#[case] expected: bool,
	) {
		assert_eq!(cache.is_loaded(CldrGroup::Main, path), expected);
	}

	#[rstest]
	fn test_invalid_locale_is_not_registered(cache: CldrLoadCache) {
		assert!(!cache.locales().any(|l| l == "not a locale"));
	}

	#[rstest]
	#[case("likelySubtags", true)]
	#[case("plurals-type-cardinal", false)]
	#[case("made-up", false)]
	fn test_supplemental_flags(
		cache: CldrLoadCache,
		#[case] name: &str,
		#[case] expected: bool,
	) {
		assert_eq!(cache.is_loaded(CldrGroup::Supplemental, &[name]), expected);
	}

	#[rstest]
	fn test_reset_supplemental_keeps_main(mut cache: CldrLoadCache) {
		// Act
		cache.reset(Some(CldrGroup::Supplemental));

		// Assert
		assert!(!cache.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]));
		assert!(cache.is_loaded(CldrGroup::Main, &["fr", "numbers"]));
	}

	#[rstest]
	fn test_reset_main_keeps_supplemental(mut cache: CldrLoadCache) {
		// Act
		cache.reset(Some(CldrGroup::Main));

		// Assert
		assert!(!cache.is_loaded(CldrGroup::Main, &["fr", "numbers"]));
		assert!(cache.is_loaded(CldrGroup::Supplemental, &["likelySubtags"]));
	}

	#[rstest]
	fn test_reset_all(mut cache: CldrLoadCache) {
		// Act
		cache.reset(None);

		// Assert
		assert_eq!(cache, CldrLoadCache::new());
	}

	#[rstest]
	fn test_flags_are_monotonic(mut cache: CldrLoadCache) {
		// Act
		cache.register(&json!({ "main": { "fr": { "units": {} } } }));

		// Assert
		assert!(cache.is_loaded(CldrGroup::Main, &["fr", "numbers"]));
		assert!(cache.is_loaded(CldrGroup::Main, &["fr", "units"]));
	}

	#[rstest]
	fn test_new_tree_has_every_package_unloaded() {
		// Arrange
		let mut cache = CldrLoadCache::new();

		// Act
		cache.register(&json!({ "main": { "de": {} } }));

		// Assert
		for package in MAIN_PACKAGES {
			assert!(!cache.is_loaded(CldrGroup::Main, &["de", package]));
		}
		assert!(cache.is_loaded(CldrGroup::Main, &["de"]));
	}
}
