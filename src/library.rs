//! Saved-icon library over a key-value store.
//!
//! The whole library lives under one key, [`LIBRARY_KEY`], as a JSON array of
//! [`SavedIcon`] records. Any store that can get and set a string per key can
//! back it: browser `localStorage`, a file, or the in-memory [`MemoryStore`].
//!
//! # Example
//!
//! ```
//! use iconmaker::{IconLibrary, IconSpec, MemoryStore};
//!
//! let mut library = IconLibrary::new(MemoryStore::default());
//! let spec = IconSpec::from_hex("golden star", "#6366f1", "#ffd700", 256).unwrap();
//!
//! let saved = library.save("Favorite", &spec, "data:image/png;base64,AAAA").unwrap();
//! assert_eq!(library.search("STAR").unwrap(), vec![saved.clone()]);
//!
//! library.delete(&saved.id).unwrap();
//! assert!(library.load().unwrap().is_empty());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::HexColor;
use crate::error::{LibraryError, SpecError};
use crate::icon::IconSpec;

/// Store key holding the serialized library.
pub const LIBRARY_KEY: &str = "iconLibrary";

// ============================================================================
// SavedIcon
// ============================================================================

/// One library entry.
///
/// # JSON Format
///
/// ```json
/// {
///   "id": "5f0c6f0e-8a53-4a7c-9d3b-0d7b8e0b1c2a",
///   "name": "Favorite",
///   "description": "golden star",
///   "imageUrl": "data:image/png;base64,...",
///   "backgroundColor": "#6366f1",
///   "foregroundColor": "#ffd700",
///   "size": 256,
///   "createdAt": "2024-05-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SavedIcon {
    pub id: String,
    pub name: String,
    pub description: String,

    /// The rendered image, usually a PNG data URL.
    pub image_url: String,

    pub background_color: HexColor,
    pub foreground_color: HexColor,
    pub size: u32,
    pub created_at: DateTime<Utc>,
}

impl SavedIcon {
    /// Creates a record with a fresh v4 id and the current time.
    pub fn new(name: impl Into<String>, spec: &IconSpec, image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: spec.description.clone(),
            image_url: image_url.into(),
            background_color: spec.background_color,
            foreground_color: spec.foreground_color,
            size: spec.size,
            created_at: Utc::now(),
        }
    }

    /// The spec this icon was generated from.
    ///
    /// Records come from an external store, so the size is validated again.
    pub fn spec(&self) -> Result<IconSpec, SpecError> {
        IconSpec::new(
            self.description.clone(),
            self.background_color,
            self.foreground_color,
            self.size,
        )
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Stores
// ============================================================================

/// A string-valued key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, LibraryError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), LibraryError>;
    fn remove(&mut self, key: &str) -> Result<(), LibraryError>;
}

/// In-process store, for tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), LibraryError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), LibraryError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// IconLibrary
// ============================================================================

/// The list of saved icons, in save order.
pub struct IconLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> IconLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns every saved icon. A missing key is an empty library.
    pub fn load(&self) -> Result<Vec<SavedIcon>, LibraryError> {
        match self.store.get(LIBRARY_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Appends a new icon. The name must not be blank.
    pub fn save(
        &mut self,
        name: &str,
        spec: &IconSpec,
        image_url: impl Into<String>,
    ) -> Result<SavedIcon, LibraryError> {
        if name.trim().is_empty() {
            return Err(LibraryError::BlankName);
        }
        let icon = SavedIcon::new(name, spec, image_url);
        let mut icons = self.load()?;
        icons.push(icon.clone());
        self.write(&icons)?;
        info!("saved icon {:?} ({})", icon.name, icon.id);
        Ok(icon)
    }

    /// Removes the icon with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, LibraryError> {
        let mut icons = self.load()?;
        let before = icons.len();
        icons.retain(|icon| icon.id != id);
        if icons.len() == before {
            return Ok(false);
        }
        self.write(&icons)?;
        info!("deleted icon {id}");
        Ok(true)
    }

    /// Icons whose name or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Result<Vec<SavedIcon>, LibraryError> {
        let mut icons = self.load()?;
        icons.retain(|icon| icon.matches(query));
        Ok(icons)
    }

    /// Removes every saved icon.
    pub fn clear(&mut self) -> Result<(), LibraryError> {
        self.store.remove(LIBRARY_KEY)?;
        info!("cleared icon library");
        Ok(())
    }

    fn write(&mut self, icons: &[SavedIcon]) -> Result<(), LibraryError> {
        let json = serde_json::to_string(icons)?;
        self.store.set(LIBRARY_KEY, json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(description: &str) -> IconSpec {
        IconSpec::from_hex(description, "#10b981", "#ffffff", 128).unwrap()
    }

    fn library() -> IconLibrary<MemoryStore> {
        IconLibrary::new(MemoryStore::default())
    }

    #[test]
    fn empty_store_loads_empty() {
        assert!(library().load().unwrap().is_empty());
    }

    #[test]
    fn save_assigns_id_and_timestamp() {
        let mut lib = library();
        let a = lib.save("Home", &spec("house"), "data:a").unwrap();
        let b = lib.save("Mail", &spec("envelope"), "data:b").unwrap();

        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert!(a.created_at <= b.created_at);
        assert_eq!(lib.load().unwrap(), vec![a.clone(), b]);
        assert_eq!(a.spec().unwrap(), spec("house"));
    }

    #[test]
    fn stored_sizes_are_validated_on_the_way_out() {
        let mut icon = SavedIcon::new("Big", &spec("star"), "data:b");
        icon.size = 4096;
        let stored = SavedIcon::from_json(&icon.to_json().unwrap()).unwrap();
        assert!(matches!(
            stored.spec(),
            Err(SpecError::SizeOutOfRange { size: 4096, .. })
        ));
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut lib = library();
        assert!(matches!(
            lib.save("   ", &spec("star"), "data:x"),
            Err(LibraryError::BlankName)
        ));
        assert!(lib.load().unwrap().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let mut lib = library();
        lib.save("Settings", &spec("grey cog"), "data:1").unwrap();
        lib.save("Inbox", &spec("blue envelope"), "data:2").unwrap();

        let names = |q: &str| -> Vec<String> {
            lib.search(q).unwrap().into_iter().map(|i| i.name).collect()
        };
        assert_eq!(names("COG"), vec!["Settings"]);
        assert_eq!(names("inbox"), vec!["Inbox"]);
        assert_eq!(names("e"), vec!["Settings", "Inbox"]);
        assert!(names("zzz").is_empty());
    }

    #[test]
    fn delete_by_id() {
        let mut lib = library();
        let keep = lib.save("Keep", &spec("lock"), "data:k").unwrap();
        let gone = lib.save("Drop", &spec("camera"), "data:d").unwrap();

        assert!(lib.delete(&gone.id).unwrap());
        assert!(!lib.delete(&gone.id).unwrap());
        assert_eq!(lib.load().unwrap(), vec![keep]);
    }

    #[test]
    fn clear_removes_key() {
        let mut lib = library();
        lib.save("One", &spec("dot"), "data:1").unwrap();
        lib.clear().unwrap();
        assert!(lib.store().get(LIBRARY_KEY).unwrap().is_none());
        assert!(lib.load().unwrap().is_empty());
    }

    #[test]
    fn record_json_is_camel_case() {
        let icon = SavedIcon::new("Star", &spec("star"), "data:s");
        let json = icon.to_json().unwrap();
        for key in ["\"imageUrl\"", "\"backgroundColor\"", "\"foregroundColor\"", "\"createdAt\""] {
            assert!(json.contains(key), "{json}");
        }
        assert_eq!(SavedIcon::from_json(&json).unwrap(), icon);
    }

    #[test]
    fn reads_records_written_elsewhere() {
        let mut store = MemoryStore::default();
        store
            .set(
                LIBRARY_KEY,
                r##"[{"id":"abc","name":"Old","description":"heart","imageUrl":"data:h",
                    "backgroundColor":"#ef4444","foregroundColor":"#ffffff","size":64,
                    "createdAt":"2024-01-02T03:04:05.678Z"}]"##
                    .to_string(),
            )
            .unwrap();
        let icons = IconLibrary::new(store).load().unwrap();
        assert_eq!(icons[0].id, "abc");
        assert_eq!(icons[0].background_color.to_string(), "#ef4444");
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let mut store = MemoryStore::default();
        store.set(LIBRARY_KEY, "not json".into()).unwrap();
        assert!(matches!(
            IconLibrary::new(store).load(),
            Err(LibraryError::Serialization(_))
        ));
    }
}
