use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::{Result, StorageError};
use crate::storage::StorageAdapter;

/// Storage persisted as one JSON object in a file.
///
/// Every operation reads the whole file and writes it back through a
/// temporary sibling and a rename. Operations on one instance are
/// serialized; separate instances on the same file are last-write-wins.
#[derive(Debug)]
pub struct FileStorage {
	path: PathBuf,
	gate: Mutex<()>,
}

impl FileStorage {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			gate: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn load(&self) -> Result<Map<String, Value>> {
		let bytes = match tokio::fs::read(&self.path).await {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
			Err(source) => {
				return Err(StorageError::Io {
					path: self.path.clone(),
					source,
				});
			}
		};
		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(Map::new());
		}
		match serde_json::from_slice(&bytes) {
			Ok(Value::Object(map)) => Ok(map),
			Ok(_) => Err(StorageError::NotAnObject { path: self.path.clone() }),
			Err(source) => Err(StorageError::Json {
				path: self.path.clone(),
				source,
			}),
		}
	}

	async fn save(&self, map: Map<String, Value>) -> Result<()> {
		let io = |source| StorageError::Io {
			path: self.path.clone(),
			source,
		};
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await.map_err(io)?;
		}
		let bytes = serde_json::to_vec_pretty(&Value::Object(map)).map_err(|source| StorageError::Encode {
			key: self.path.display().to_string(),
			source,
		})?;
		let tmp = self.path.with_extension("json.tmp");
		tokio::fs::write(&tmp, bytes).await.map_err(io)?;
		tokio::fs::rename(&tmp, &self.path).await.map_err(io)?;
		tracing::trace!(path = %self.path.display(), "storage.file.saved");
		Ok(())
	}

	async fn edit(&self, f: impl FnOnce(&mut Map<String, Value>) -> bool + Send) -> Result<()> {
		let _gate = self.gate.lock().await;
		let mut map = self.load().await?;
		if f(&mut map) {
			self.save(map).await?;
		}
		Ok(())
	}
}

#[async_trait]
impl StorageAdapter for FileStorage {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		let _gate = self.gate.lock().await;
		Ok(self.load().await?.remove(key))
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		self.edit(|map| {
			map.insert(key.to_string(), value);
			true
		})
		.await
	}

	async fn remove(&self, key: &str) -> Result<()> {
		self.edit(|map| map.remove(key).is_some()).await
	}

	async fn get_multiple(&self, keys: &[&str]) -> Result<Map<String, Value>> {
		let _gate = self.gate.lock().await;
		let mut map = self.load().await?;
		Ok(keys.iter().filter_map(|k| map.remove(*k).map(|v| ((*k).to_string(), v))).collect())
	}

	async fn remove_multiple(&self, keys: &[&str]) -> Result<()> {
		self.edit(|map| keys.iter().fold(false, |changed, k| map.remove(*k).is_some() || changed))
			.await
	}
}
