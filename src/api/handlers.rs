//! Request handlers for the RAX File Store.
//!
//! One handler per operation. Each takes already-extracted request data,
//! calls into the storage manager or the analytics functions, and returns
//! the response body or a [`FileStoreError`]. The axum glue lives in
//! `routes`.

use axum::body::Bytes;
use log::{info, warn};
use std::num::IntErrorKind;

use crate::analytics::{self, SortOrder};
use crate::error::FileStoreError;
use crate::storage::{FileStore, OverwriteOutcome};

use super::responses::{
    FrequentWordsResponse, ListResponse, MessageResponse, NO_FILES_MESSAGE,
    UPLOAD_SUCCESS_MESSAGE, UploadResult, WELCOME_MESSAGE, WordCountResponse,
};

/// One file of an upload batch
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Bytes,
}

pub fn handle_welcome() -> MessageResponse {
    MessageResponse::new(WELCOME_MESSAGE)
}

/// Stores each file of the batch in order, stopping at the first failure.
///
/// The batch is not transactional: files stored before the failing one stay
/// stored even though the whole request is reported as failed.
pub async fn handle_upload(
    store: &FileStore,
    files: Vec<UploadedFile>,
) -> Result<Vec<UploadResult>, FileStoreError> {
    if files.is_empty() {
        return Err(FileStoreError::InvalidParameter(
            "no files provided".into(),
        ));
    }

    let total = files.len();
    let mut results = Vec::with_capacity(total);

    for file in files {
        if let Err(e) = store.store(&file.name, &file.content).await {
            if !results.is_empty() {
                warn!(
                    "Upload batch aborted at {}: {} of {} files remain stored",
                    file.name,
                    results.len(),
                    total
                );
            }
            return Err(e.into());
        }

        results.push(UploadResult {
            file: file.name,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        });
    }

    info!("Upload batch stored {} files", results.len());
    Ok(results)
}

pub async fn handle_list(store: &FileStore) -> Result<ListResponse, FileStoreError> {
    let files = store.list().await?;

    if files.is_empty() {
        return Ok(ListResponse::Empty {
            message: NO_FILES_MESSAGE.to_string(),
        });
    }

    Ok(ListResponse::Files { files })
}

pub async fn handle_delete(
    store: &FileStore,
    filename: Option<&str>,
) -> Result<MessageResponse, FileStoreError> {
    let filename = require_filename(filename)?;
    store.remove(filename).await?;

    Ok(MessageResponse::new(format!(
        "File '{filename}' deleted successfully!"
    )))
}

/// Creates or replaces `filename`; only an I/O failure is an error.
pub async fn handle_update(
    store: &FileStore,
    filename: Option<&str>,
    content: &[u8],
) -> Result<MessageResponse, FileStoreError> {
    let filename = require_filename(filename)?;
    let outcome = store.overwrite(filename, content).await?;

    let action = match outcome {
        OverwriteOutcome::Created => "created",
        OverwriteOutcome::Replaced => "updated",
    };
    info!("Update request {} {}", action, filename);

    Ok(MessageResponse::new(format!(
        "File '{filename}' updated/created successfully!"
    )))
}

pub async fn handle_word_count(store: &FileStore) -> Result<WordCountResponse, FileStoreError> {
    let total_word_count = analytics::word_count(store).await?;
    Ok(WordCountResponse { total_word_count })
}

/// Ranks words by frequency. Order values other than `dsc` rank ascending.
pub async fn handle_frequent_words(
    store: &FileStore,
    limit: i64,
    order: Option<&str>,
) -> Result<FrequentWordsResponse, FileStoreError> {
    let order = match order {
        None => SortOrder::default(),
        Some(value) => {
            if !SortOrder::is_known_keyword(value) {
                warn!("Unrecognized order '{}', ranking ascending", value);
            }
            SortOrder::from_param(value)
        }
    };

    let words = analytics::frequent_words(store, limit, order).await?;
    Ok(FrequentWordsResponse { words })
}

/// Parses the `n` query parameter, falling back to `default` when absent.
///
/// Integers outside the i64 range saturate, so an oversized `n` still means
/// "everything" and a hugely negative one still means "nothing".
pub fn parse_limit(raw: Option<&str>, default: i64) -> Result<i64, FileStoreError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(limit) => Ok(limit),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(FileStoreError::InvalidParameter(format!(
                "'n' must be an integer, got '{raw}'"
            ))),
        },
    }
}

fn require_filename(filename: Option<&str>) -> Result<&str, FileStoreError> {
    filename.ok_or_else(|| {
        FileStoreError::InvalidParameter("missing query parameter 'filename'".into())
    })
}
