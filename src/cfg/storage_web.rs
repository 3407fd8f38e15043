use gloo_storage::{LocalStorage, Storage, errors::StorageError};

const PREFIX: &str = "/landing-page | ";
fn to_storage_key(key: &str) -> String {
    let mut result = String::with_capacity(PREFIX.len().saturating_add(key.len()));
    result += PREFIX;
    result += key;
    result
}

pub(super) fn save(key: &str, value: &str) -> Result<(), SaveError> {
    LocalStorage::set(to_storage_key(key), value)
}

pub(super) fn load(key: &str) -> Option<String> {
    LocalStorage::get(to_storage_key(key)).ok()
}

pub type SaveError = StorageError;
