//! Per-operation deadlines
//!
//! Store work runs inside [`within_deadline`]. When the deadline fires the
//! inner future is dropped, which drops any open `LedgerTx` and rolls it back.

use std::future::Future;
use std::time::Duration;

use crate::error::LedgerError;

/// Run `fut` to completion or fail with `Conflict` once `timeout` elapses.
pub async fn within_deadline<F: Future>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> Result<F::Output, LedgerError> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(output) => Ok(output),
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "Operation deadline exceeded, transaction rolled back"
            );
            Err(LedgerError::Conflict(format!(
                "{} timed out after {}ms",
                operation,
                timeout.as_millis()
            )))
        }
    }
}
