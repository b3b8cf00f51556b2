use crate::Result;
use fs4::fs_std::FileExt;
use ohno::IntoAppError;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Log target for `lock`
const LOG_TARGET: &str = "     store";

/// Guard that releases the store lock when dropped
#[derive(Debug)]
pub struct StoreLockGuard(File);

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        // Lock is automatically released when the file is closed
        // Log if unlock fails (shouldn't happen in normal operation)
        if let Err(e) = self.0.unlock() {
            log::warn!(target: LOG_TARGET, "Failed to unlock store: {e}");
        }
    }
}

/// Acquire a store lock using advisory file locking
pub async fn acquire_store_lock(data_dir: &Path) -> Result<StoreLockGuard> {
    let lock_path = data_dir.join("store.lock");

    // Create or open the lock file
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .into_app_err_with(|| format!("Failed to open store lock file at '{}'", lock_path.display()))?;

    // Block until we can acquire the lock
    // This needs to run in a blocking task since it may block for an extended time
    let file = tokio::task::spawn_blocking(move || {
        file.lock_exclusive()
            .into_app_err_with(|| format!("Failed to acquire exclusive lock on store at '{}'", lock_path.display()))?;
        log::debug!(target: LOG_TARGET, "Acquired store lock at '{}'", lock_path.display());
        Ok::<_, ohno::AppError>(file)
    })
    .await
    .into_app_err("Lock task panicked")??;

    Ok(StoreLockGuard(file))
}
