// Score persistence backed by `window.localStorage`.
use web_sys::Storage;

use super::js_err;
use crate::adapters::{KeyValueStore, MemoryStore};

pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// `None` when the page has no usable localStorage (private mode, sandboxed iframe).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }
}

/// localStorage when available, otherwise scores only last for the page session.
pub enum BrowserStore {
    Local(LocalStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match LocalStore::open() {
            Some(local) => BrowserStore::Local(local),
            None => {
                log::warn!("localStorage unavailable; scores will not survive a reload");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        match self {
            BrowserStore::Local(s) => s.get(key),
            BrowserStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match self {
            BrowserStore::Local(s) => s.set(key, value),
            BrowserStore::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        match self {
            BrowserStore::Local(s) => s.remove(key),
            BrowserStore::Memory(s) => s.remove(key),
        }
    }
}
