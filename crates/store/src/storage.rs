use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::error::Result;

/// Asynchronous key-value store shared by every context.
///
/// Values are JSON. A missing key reads as `None`; removing a missing key is
/// not an error.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
	async fn get(&self, key: &str) -> Result<Option<Value>>;

	async fn set(&self, key: &str, value: Value) -> Result<()>;

	async fn remove(&self, key: &str) -> Result<()>;

	/// Reads several keys. Missing keys are absent from the result.
	async fn get_multiple(&self, keys: &[&str]) -> Result<Map<String, Value>> {
		let mut out = Map::new();
		for key in keys {
			if let Some(value) = self.get(key).await? {
				out.insert((*key).to_string(), value);
			}
		}
		Ok(out)
	}

	async fn remove_multiple(&self, keys: &[&str]) -> Result<()> {
		for key in keys {
			self.remove(key).await?;
		}
		Ok(())
	}
}

#[async_trait]
impl<T: StorageAdapter + ?Sized> StorageAdapter for Arc<T> {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		(**self).get(key).await
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		(**self).set(key, value).await
	}

	async fn remove(&self, key: &str) -> Result<()> {
		(**self).remove(key).await
	}

	async fn get_multiple(&self, keys: &[&str]) -> Result<Map<String, Value>> {
		(**self).get_multiple(keys).await
	}

	async fn remove_multiple(&self, keys: &[&str]) -> Result<()> {
		(**self).remove_multiple(keys).await
	}
}

/// Process-local storage backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	data: Mutex<Map<String, Value>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Copy of every stored entry.
	pub fn snapshot(&self) -> Map<String, Value> {
		self.data.lock().clone()
	}
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		Ok(self.data.lock().get(key).cloned())
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		self.data.lock().insert(key.to_string(), value);
		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<()> {
		self.data.lock().remove(key);
		Ok(())
	}
}
