use focusd_site::prefs::{KeyValueStore, StoreError};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// `localStorage`, when the browser allows it. Reads from a blocked store
/// behave like an empty one.
pub(super) struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let s = local_storage().ok_or(StoreError::Unavailable)?;
        s.set_item(key, value)
            .map_err(|e| StoreError::Write(super::js_err(&e)))
    }
}
