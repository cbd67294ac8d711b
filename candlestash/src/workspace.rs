//! Per-symbol output folders.
//!
//! Every run starts each symbol from an empty folder; nothing from a previous
//! run is read back or merged.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use candlestash_core::{StashError, Symbol};

/// Create the base output directory if it does not exist. Never clears it.
///
/// # Errors
/// Returns `StashError::Io` if the directory cannot be created.
pub async fn ensure_base_dir(base: &Path) -> Result<(), StashError> {
    tokio::fs::create_dir_all(base)
        .await
        .map_err(|e| StashError::io(base, &e))
}

/// Folder that holds every artifact for `symbol` under `base`.
#[must_use]
pub fn symbol_dir(base: &Path, symbol: &Symbol) -> PathBuf {
    base.join(symbol.sanitized())
}

/// Remove any previous folder for `symbol` and recreate it empty.
///
/// Returns the folder path. Calling it twice in a row leaves the same empty
/// folder.
///
/// # Errors
/// Returns `StashError::Io` if the old folder cannot be removed or the new one
/// cannot be created.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "candlestash::workspace::prepare_symbol_dir",
        skip(base),
        fields(symbol = %symbol),
    )
)]
pub async fn prepare_symbol_dir(base: &Path, symbol: &Symbol) -> Result<PathBuf, StashError> {
    let dir = symbol_dir(base, symbol);
    match tokio::fs::remove_dir_all(&dir).await {
        Ok(()) => {
            #[cfg(feature = "tracing")]
            tracing::info!(path = %dir.display(), "cleared previous output");
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(StashError::io(&dir, &e)),
    }
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| StashError::io(&dir, &e))?;
    Ok(dir)
}
