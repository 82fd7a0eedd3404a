use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Reading or writing the backing file failed.
	#[error("failed to access {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The backing file holds invalid JSON.
	#[error("invalid JSON in {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	/// The backing file holds JSON that is not an object.
	#[error("{path} does not hold a JSON object")]
	NotAnObject { path: PathBuf },

	/// A value could not be encoded for storage.
	#[error("failed to encode value for {key}: {source}")]
	Encode {
		key: String,
		#[source]
		source: serde_json::Error,
	},
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
