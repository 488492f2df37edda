//! Session-scoped in-memory [`SessionStorage`]; entries live exactly as long as the process.

// self
use crate::{
	_prelude::*,
	session::{SessionStorage, StorageFuture, StorageKey},
};

type EntryMap = Arc<RwLock<BTreeMap<StorageKey, String>>>;

/// Thread-safe storage backend that keeps session entries in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage(EntryMap);
impl MemorySessionStorage {
	/// Returns a copy of every stored entry.
	pub fn snapshot(&self) -> BTreeMap<StorageKey, String> {
		self.0.read().clone()
	}
}
impl SessionStorage for MemorySessionStorage {
	fn get(&self, key: StorageKey) -> StorageFuture<'_, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn set(&self, key: StorageKey, value: String) -> StorageFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key, value);

			Ok(())
		})
	}

	fn remove(&self, key: StorageKey) -> StorageFuture<'_, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(&key).is_some()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn last_write_wins() {
		let storage = MemorySessionStorage::default();

		storage.set(StorageKey::AuthToken, "first".into()).await.expect("Set should succeed.");
		storage.set(StorageKey::AuthToken, "second".into()).await.expect("Set should succeed.");

		assert_eq!(
			storage.get(StorageKey::AuthToken).await.expect("Get should succeed.").as_deref(),
			Some("second"),
		);
		assert!(storage.remove(StorageKey::AuthToken).await.expect("Remove should succeed."));
		assert!(!storage.remove(StorageKey::AuthToken).await.expect("Remove should succeed."));
	}

	#[tokio::test]
	async fn clones_share_entries() {
		let storage = MemorySessionStorage::default();
		let other = storage.clone();

		storage.set(StorageKey::UserInfo, "{}".into()).await.expect("Set should succeed.");

		assert_eq!(other.snapshot().len(), 1);
	}
}
