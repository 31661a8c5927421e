//! Storage operations
//!
//! Handles file system operations for the file store: store, overwrite,
//! remove, list and read. Mutations on one name are serialized through
//! [`NameLocks`]; writes land in a temporary file and are renamed into place
//! so readers never see a partially written file.

use log::{error, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;
use crate::storage::locks::NameLocks;
use crate::storage::results::{OverwriteOutcome, StoredEntry};
use crate::storage::validation::{TEMP_FILE_PREFIX, is_hidden, is_temp_file, validate_file_name};

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The storage manager: sole owner of the files under `root`.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    locks: NameLocks,
}

impl FileStore {
    /// Opens the store at `root`, creating the directory if needed and
    /// removing temporary files left behind by an interrupted write.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            error!("Failed to create storage directory {}: {}", root.display(), e);
            StorageError::from(e)
        })?;

        let store = Self {
            root,
            locks: NameLocks::new(),
        };
        store.sweep_temp_files().await?;

        info!("Storage directory: {}", store.root.display());
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a new file. Fails with `AlreadyExists` if the name is taken.
    pub async fn store(&self, name: &str, content: &[u8]) -> Result<StoredEntry, StorageError> {
        validate_file_name(name)?;
        let _guard = self.locks.lock(name).await;

        let file_path = self.root.join(name);
        if fs::try_exists(&file_path).await? {
            warn!("Refusing to store {}: file already exists", name);
            return Err(StorageError::AlreadyExists(name.to_string()));
        }

        self.write_atomic(&file_path, content).await.map_err(|e| {
            error!("Failed to store file {} ({}): {}", name, file_path.display(), e);
            StorageError::from(e)
        })?;

        info!("Stored file {} ({} bytes)", name, content.len());

        Ok(StoredEntry {
            name: name.to_string(),
            size: content.len() as u64,
        })
    }

    /// Creates the file or replaces its content.
    pub async fn overwrite(
        &self,
        name: &str,
        content: &[u8],
    ) -> Result<OverwriteOutcome, StorageError> {
        validate_file_name(name)?;
        let _guard = self.locks.lock(name).await;

        let file_path = self.root.join(name);
        let outcome = if fs::try_exists(&file_path).await? {
            OverwriteOutcome::Replaced
        } else {
            OverwriteOutcome::Created
        };

        self.write_atomic(&file_path, content).await.map_err(|e| {
            error!("Failed to overwrite file {} ({}): {}", name, file_path.display(), e);
            StorageError::from(e)
        })?;

        info!(
            "Overwrote file {} ({} bytes, {:?})",
            name,
            content.len(),
            outcome
        );

        Ok(outcome)
    }

    /// Deletes a file. Fails with `NotFound` if it is not stored.
    pub async fn remove(&self, name: &str) -> Result<(), StorageError> {
        validate_file_name(name)?;
        let _guard = self.locks.lock(name).await;

        let file_path = self.root.join(name);
        match fs::metadata(&file_path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(StorageError::NotFound(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => return Err(StorageError::from(e)),
        }

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                info!("Deleted file {} ({})", name, file_path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => {
                error!("Failed to delete file {} ({}): {}", name, file_path.display(), e);
                Err(StorageError::from(e))
            }
        }
    }

    /// Lists every non-hidden file with its size, in directory order.
    pub async fn list(&self) -> Result<Vec<StoredEntry>, StorageError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            error!("Failed to list {}: {}", self.root.display(), e);
            StorageError::from(e)
        })?;

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_hidden(&name) {
                continue;
            }

            // Entries may vanish between the scan and the stat.
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::from(e)),
            };

            if metadata.is_file() {
                entries.push(StoredEntry {
                    name,
                    size: metadata.len(),
                });
            }
        }

        info!("Listed {} stored files", entries.len());
        Ok(entries)
    }

    /// Names of all stored files in lexicographic order, temporary files excluded.
    pub async fn names(&self, include_hidden: bool) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_temp_file(&name) || (!include_hidden && is_hidden(&name)) {
                continue;
            }

            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => names.push(name),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::from(e)),
            }
        }

        names.sort();
        Ok(names)
    }

    /// Returns the current content of a stored file.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        validate_file_name(name)?;

        match fs::read(self.root.join(name)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(StorageError::from(e)),
        }
    }

    async fn write_atomic(&self, target: &Path, content: &[u8]) -> std::io::Result<()> {
        let temp_path = self.root.join(temp_file_name());

        let result = async {
            let mut temp_file = fs::File::create(&temp_path).await?;
            temp_file.write_all(content).await?;
            temp_file.flush().await?;
            temp_file.sync_all().await?;
            drop(temp_file);
            fs::rename(&temp_path, target).await
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }

        result
    }

    async fn sweep_temp_files(&self) -> Result<(), StorageError> {
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_temp_file(&name) {
                continue;
            }

            warn!("Removing stale temporary file {}", name);
            if let Err(e) = fs::remove_file(entry.path()).await {
                warn!("Failed to remove stale temporary file {}: {}", name, e);
            }
        }

        Ok(())
    }
}

fn temp_file_name() -> String {
    let sequence = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}{}-{}", TEMP_FILE_PREFIX, std::process::id(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_store() -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn store_then_read_returns_same_bytes() {
        let (_dir, store) = open_store().await;

        let entry = store.store("a.txt", b"hello world").await.unwrap();
        assert_eq!(entry.size, 11);
        assert_eq!(store.read("a.txt").await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn store_twice_conflicts_and_keeps_first_content() {
        let (_dir, store) = open_store().await;

        store.store("a.txt", b"first").await.unwrap();
        let second = store.store("a.txt", b"second").await;

        assert!(matches!(second, Err(StorageError::AlreadyExists(name)) if name == "a.txt"));
        assert_eq!(store.read("a.txt").await.unwrap(), b"first");
    }

    #[tokio::test]
    async fn overwrite_creates_then_replaces() {
        let (_dir, store) = open_store().await;

        let first = store.overwrite("b.txt", b"one").await.unwrap();
        let second = store.overwrite("b.txt", b"two").await.unwrap();

        assert_eq!(first, OverwriteOutcome::Created);
        assert_eq!(second, OverwriteOutcome::Replaced);
        assert_eq!(store.read("b.txt").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn remove_missing_reports_not_found_and_changes_nothing() {
        let (_dir, store) = open_store().await;
        store.store("keep.txt", b"x").await.unwrap();

        let result = store.remove("missing.txt").await;

        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        let (_dir, store) = open_store().await;
        store.store("a.txt", b"x").await.unwrap();

        store.remove("a.txt").await.unwrap();

        assert!(matches!(
            store.read("a.txt").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_skips_hidden_entries() {
        let (_dir, store) = open_store().await;
        store.store(".secret", b"hidden").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        store.store("shown.txt", b"1234").await.unwrap();
        let entries = store.list().await.unwrap();
        assert_eq!(
            entries,
            vec![StoredEntry {
                name: "shown.txt".into(),
                size: 4
            }]
        );
    }

    #[tokio::test]
    async fn names_are_sorted_and_filter_hidden_on_request() {
        let (_dir, store) = open_store().await;
        store.store("b.txt", b"").await.unwrap();
        store.store("a.txt", b"").await.unwrap();
        store.store(".h", b"").await.unwrap();

        assert_eq!(store.names(false).await.unwrap(), vec!["a.txt", "b.txt"]);
        assert_eq!(store.names(true).await.unwrap(), vec![".h", "a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn invalid_names_never_touch_disk() {
        let (dir, store) = open_store().await;

        let result = store.store("../escape.txt", b"x").await;

        assert!(matches!(result, Err(StorageError::InvalidName(_))));
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn open_sweeps_stale_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".rax-tmp-1-1"), b"partial").unwrap();

        let store = FileStore::open(dir.path()).await.unwrap();

        assert!(!dir.path().join(".rax-tmp-1-1").exists());
        assert!(store.names(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_leave_no_temp_files_behind() {
        let (dir, store) = open_store().await;
        store.store("a.txt", b"1").await.unwrap();
        store.overwrite("a.txt", b"2").await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| is_temp_file(&e.file_name().to_string_lossy()))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn concurrent_stores_of_one_name_have_single_winner() {
        let (_dir, store) = open_store().await;
        let store = Arc::new(store);

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.store("race.txt", format!("writer {i}").as_bytes()).await
            }));
        }

        let mut winners = Vec::new();
        for (i, task) in tasks.into_iter().enumerate() {
            match task.await.unwrap() {
                Ok(_) => winners.push(i),
                Err(StorageError::AlreadyExists(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(winners.len(), 1);
        let content = store.read("race.txt").await.unwrap();
        assert_eq!(content, format!("writer {}", winners[0]).into_bytes());
    }

    #[tokio::test]
    async fn concurrent_overwrites_leave_one_complete_version() {
        let (_dir, store) = open_store().await;
        let store = Arc::new(store);

        let versions: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 4096]).collect();
        let mut tasks = Vec::new();
        for content in versions.clone() {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.overwrite("shared.bin", &content).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let content = store.read("shared.bin").await.unwrap();
        assert!(versions.contains(&content));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mutation {
        Remove,
        Overwrite,
        Store,
    }

    const OVERWRITTEN: &[u8] = b"overwritten";
    const STORED: &[u8] = b"stored";

    /// Applies `order` to a file holding `initial`, returning per-mutation
    /// success (indexed like `Mutation as usize`) and the final content.
    fn replay(initial: &[u8], order: [Mutation; 3]) -> ([bool; 3], Option<Vec<u8>>) {
        let mut state = Some(initial.to_vec());
        let mut succeeded = [false; 3];

        for mutation in order {
            let ok = match mutation {
                Mutation::Remove => state.take().is_some(),
                Mutation::Overwrite => {
                    state = Some(OVERWRITTEN.to_vec());
                    true
                }
                Mutation::Store => {
                    if state.is_none() {
                        state = Some(STORED.to_vec());
                        true
                    } else {
                        false
                    }
                }
            };
            succeeded[mutation as usize] = ok;
        }

        (succeeded, state)
    }

    fn serial_orders() -> Vec<[Mutation; 3]> {
        use Mutation::*;
        vec![
            [Remove, Overwrite, Store],
            [Remove, Store, Overwrite],
            [Overwrite, Remove, Store],
            [Overwrite, Store, Remove],
            [Store, Remove, Overwrite],
            [Store, Overwrite, Remove],
        ]
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn mixed_mutations_on_one_name_follow_a_serial_history() {
        let (dir, store) = open_store().await;
        let store = Arc::new(store);

        for round in 0..25 {
            let initial = format!("initial {round}").into_bytes();
            store.overwrite("contested.txt", &initial).await.unwrap();

            let remove = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.remove("contested.txt").await })
            };
            let overwrite = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.overwrite("contested.txt", OVERWRITTEN).await })
            };
            let stored = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.store("contested.txt", STORED).await })
            };

            let mut observed = [false; 3];
            observed[Mutation::Remove as usize] = match remove.await.unwrap() {
                Ok(()) => true,
                Err(StorageError::NotFound(_)) => false,
                Err(e) => panic!("unexpected remove error: {e}"),
            };
            observed[Mutation::Overwrite as usize] = overwrite.await.unwrap().is_ok();
            observed[Mutation::Store as usize] = match stored.await.unwrap() {
                Ok(_) => true,
                Err(StorageError::AlreadyExists(_)) => false,
                Err(e) => panic!("unexpected store error: {e}"),
            };

            let final_state = match store.read("contested.txt").await {
                Ok(content) => Some(content),
                Err(StorageError::NotFound(_)) => None,
                Err(e) => panic!("unexpected read error: {e}"),
            };

            let explained = serial_orders()
                .into_iter()
                .any(|order| replay(&initial, order) == (observed, final_state.clone()));
            assert!(
                explained,
                "round {round}: outcomes {observed:?} with final state {final_state:?} match no serial order"
            );

            let leftovers = std::fs::read_dir(dir.path())
                .unwrap()
                .flatten()
                .filter(|e| is_temp_file(&e.file_name().to_string_lossy()))
                .count();
            assert_eq!(leftovers, 0);
        }

        assert_eq!(store.locks.active(), 0);
    }
}
