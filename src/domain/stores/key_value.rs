use anyhow::Error;

/// Durable string key-value storage that survives restarts.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), Error>;
}
