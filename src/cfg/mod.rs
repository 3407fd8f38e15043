//! Preferences that survive page reloads.

use std::collections::HashMap;

use strum_macros::{EnumIter, IntoStaticStr};

#[cfg_attr(target_family = "wasm", path = "storage_web.rs")]
#[cfg_attr(not(target_family = "wasm"), path = "storage_native.rs")]
mod storage;

pub use storage::SaveError;

/// Every key the page ever writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum PreferenceKey {
    /// Marker set once the random title/subtitle pair has been chosen.
    TitleSelected,
    SiteTitle,
    SiteSubtitle,
    SiteDescription,
    LastBackgroundUrl,
}

impl PreferenceKey {
    /// The name the key is stored under.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

pub trait PreferenceStore {
    fn load(&self, key: PreferenceKey) -> Option<String>;
    fn save(&mut self, key: PreferenceKey, value: &str) -> Result<(), SaveError>;
}

/// The platform's durable storage: `localStorage` in the browser, a TOML
/// file in the user's config directory natively.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformStore;

impl PreferenceStore for PlatformStore {
    fn load(&self, key: PreferenceKey) -> Option<String> {
        storage::load(key.name())
    }

    fn save(&mut self, key: PreferenceKey, value: &str) -> Result<(), SaveError> {
        storage::save(key.name(), value)
    }
}

/// Volatile storage, forgotten when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<PreferenceKey, String>,
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: PreferenceKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn save(&mut self, key: PreferenceKey, value: &str) -> Result<(), SaveError> {
        self.values.insert(key, value.to_owned());
        Ok(())
    }
}

pub struct Preferences<S> {
    store: S,
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self, key: PreferenceKey) -> Option<String> {
        self.store.load(key)
    }

    /// Persist a value. Storage failures are logged and otherwise ignored;
    /// the page keeps working with the in-memory value.
    pub fn set(&mut self, key: PreferenceKey, value: &str) {
        if let Err(e) = self.store.save(key, value) {
            tracing::warn!("failed to persist `{}`: {e}", key.name());
        }
    }

    pub fn is_title_selected(&self) -> bool {
        self.get(PreferenceKey::TitleSelected).is_some()
    }

    pub fn mark_title_selected(&mut self) {
        self.set(PreferenceKey::TitleSelected, "true");
    }

    pub fn last_background_url(&self) -> Option<String> {
        self.get(PreferenceKey::LastBackgroundUrl)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
