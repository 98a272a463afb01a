use std::collections::BTreeMap;

pub const MONTH_DISPLAY_KEY: &str = "monthDisplay";

/// Durable string preferences that outlive a session, such as the browser's
/// `localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    pub writes: usize,
}

impl MemoryStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.items.insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
