//! Backing-store command accounting.

use crate::error::{CoreError, CoreResult};
use crate::stats::StoreStats;
use rediso_storage::StorageResult;

/// Counts one store command and maps its failure to a [`CoreError`]
/// tagged with `operation`.
pub(crate) fn run<T>(
    stats: &StoreStats,
    operation: &'static str,
    result: StorageResult<T>,
) -> CoreResult<T> {
    stats.record_command();
    result.map_err(|source| {
        tracing::warn!(operation, error = %source, "store command failed");
        CoreError::backing_store(operation, source)
    })
}
