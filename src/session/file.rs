//! Durable file-backed [`SessionStorage`] that keeps the login across restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	session::{SessionStorage, StorageError, StorageFuture, StorageKey},
};

/// Persists session entries to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileSessionStorage {
	path: PathBuf,
	inner: Arc<RwLock<BTreeMap<StorageKey, String>>>,
}
impl FileSessionStorage {
	/// Opens (or creates) storage at the provided path, eagerly loading existing entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<BTreeMap<StorageKey, String>, StorageError> {
		if !path.exists() {
			return Ok(BTreeMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StorageError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(BTreeMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StorageError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StorageError::Backend {
				message: format!("Failed to create session directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &BTreeMap<StorageKey, String>) -> Result<(), StorageError> {
		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StorageError::Serialization {
				message: format!("Failed to serialize session snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StorageError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StorageError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StorageError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SessionStorage for FileSessionStorage {
	fn get(&self, key: StorageKey) -> StorageFuture<'_, Option<String>> {
		Box::pin(async move { Ok(self.inner.read().get(&key).cloned()) })
	}

	fn set(&self, key: StorageKey, value: String) -> StorageFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let previous = guard.insert(key, value);

			if let Err(e) = self.persist_locked(&guard) {
				match previous {
					Some(previous) => guard.insert(key, previous),
					None => guard.remove(&key),
				};

				return Err(e);
			}

			Ok(())
		})
	}

	fn remove(&self, key: StorageKey) -> StorageFuture<'_, bool> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let Some(previous) = guard.remove(&key) else {
				return Ok(false);
			};

			if let Err(e) = self.persist_locked(&guard) {
				// Keep memory in step with the file.
				guard.insert(key, previous);

				return Err(e);
			}

			Ok(true)
		})
	}
}
