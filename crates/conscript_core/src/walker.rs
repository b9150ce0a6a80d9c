//! Concurrent directory walker.
//!
//! Every entry of a directory is dispatched at once; the collected join
//! handles form a per-call wait group, and the directory reports success
//! when all of them have completed. A listing or stat failure fails the
//! call chain immediately. Siblings already in flight are not cancelled:
//! they run to completion detached and their late results are dropped
//! (first error wins).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tracing::trace;

use crate::EngineError;

/// Folder-name tokens that are never walked or classified. Matched against
/// lower-cased entry names.
const EXCLUDED_TOKENS: [&str; 3] = ["node_modules", "target", "vendor"];

/// Future returned by a per-file action.
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send>>;

/// Action invoked once for every valid regular file found by the walk.
pub type FileAction = Arc<dyn Fn(PathBuf) -> ActionFuture + Send + Sync>;

/// Walks `directory` recursively, running `action` on every valid file.
///
/// Sibling files and directories are visited in no particular order.
pub async fn walk(directory: &str, action: FileAction) -> Result<(), EngineError> {
    if directory.is_empty() {
        return Err(EngineError::invalid_directory(directory));
    }

    let directory = directory
        .strip_suffix(std::path::MAIN_SEPARATOR)
        .unwrap_or(directory);

    walk_dir(PathBuf::from(directory), action).await
}

/// Recursion goes through a boxed future; each level owns the wait group
/// for its own entries.
fn walk_dir(
    directory: PathBuf,
    action: FileAction,
) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(&directory).await?;
        let mut pending = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_entry_invalid(&name) {
                trace!("Skipping: {}", entry.path().display());
                continue;
            }

            let path = entry.path();
            let action = Arc::clone(&action);
            pending.push(tokio::spawn(async move {
                let metadata = tokio::fs::metadata(&path).await?;
                if metadata.is_dir() {
                    walk_dir(path, action).await
                } else {
                    action(path).await
                }
            }));
        }

        // Fan-in. Returning on the first error drops the remaining
        // handles, which detaches those tasks rather than cancelling them.
        for handle in pending {
            match handle.await {
                Ok(result) => result?,
                Err(e) => {
                    return Err(EngineError::internal(format!("walk task failed: {e}")));
                }
            }
        }

        Ok(())
    })
}

/// Hidden entries and dependency-vendor folders are skipped outright; they
/// do not count toward a directory's pending work.
fn is_entry_invalid(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }

    let lowered = name.to_lowercase();
    EXCLUDED_TOKENS.iter().any(|token| lowered.contains(token))
}
