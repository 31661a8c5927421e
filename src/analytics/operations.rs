//! Analytics operations
//!
//! Word count and frequent-word ranking over the current store contents.
//! Nothing is cached: each call rescans every file.
//!
//! Word count skips hidden files; frequent words includes them.

use log::info;

use crate::analytics::tokenizer::count_tokens;
use crate::analytics::word_index::{SortOrder, WordIndex};
use crate::error::StorageError;
use crate::storage::FileStore;

/// Total number of tokens across all non-hidden files
pub async fn word_count(store: &FileStore) -> Result<u64, StorageError> {
    let names = store.names(false).await?;
    let mut total = 0;

    for name in &names {
        if let Some(content) = read_if_present(store, name).await? {
            total += count_tokens(&String::from_utf8_lossy(&content));
        }
    }

    info!("Counted {} words across {} files", total, names.len());
    Ok(total)
}

/// Rank lowercased tokens across all files, hidden ones included
pub async fn frequent_words(
    store: &FileStore,
    limit: i64,
    order: SortOrder,
) -> Result<Vec<(String, u64)>, StorageError> {
    let names = store.names(true).await?;
    let mut index = WordIndex::new();

    for name in &names {
        if let Some(content) = read_if_present(store, name).await? {
            index.add_text(&String::from_utf8_lossy(&content));
        }
    }

    info!(
        "Ranked {} distinct words across {} files ({:?}, limit {})",
        index.distinct_words(),
        names.len(),
        order,
        limit
    );

    Ok(index.ranked(order, limit))
}

// Files deleted between the directory scan and the read are skipped.
async fn read_if_present(store: &FileStore, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
    match store.read(name).await {
        Ok(content) => Ok(Some(content)),
        Err(StorageError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
