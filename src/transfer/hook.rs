//! Post-commit compliance hook
//!
//! Runs after a transfer has committed. It can delay the response but never
//! undo the transfer: failures and timeouts are logged by the caller and the
//! committed record is still returned.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ComplianceConfig, ComplianceMode};
use crate::ledger::TransferRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("Compliance review rejected transfer {0}")]
    Rejected(String),

    #[error("Compliance service unavailable: {0}")]
    Unavailable(String),
}

/// Compliance check invoked with every committed transfer
#[async_trait]
pub trait ComplianceHook: Send + Sync {
    /// Hook name for logging
    fn name(&self) -> &'static str;

    async fn verify(&self, record: &TransferRecord) -> Result<(), HookError>;
}

/// Accepts everything immediately
pub struct NoopHook;

#[async_trait]
impl ComplianceHook for NoopHook {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn verify(&self, _record: &TransferRecord) -> Result<(), HookError> {
        Ok(())
    }
}

/// Stands in for a slow external review by sleeping for a fixed delay.
pub struct SimulatedReviewHook {
    delay: Duration,
}

impl SimulatedReviewHook {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ComplianceHook for SimulatedReviewHook {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn verify(&self, _record: &TransferRecord) -> Result<(), HookError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Build the hook selected by `compliance.mode`
pub fn hook_from_config(config: &ComplianceConfig) -> Arc<dyn ComplianceHook> {
    match config.mode {
        ComplianceMode::Simulated => Arc::new(SimulatedReviewHook::new(Duration::from_millis(
            config.simulated_delay_ms,
        ))),
        ComplianceMode::None => Arc::new(NoopHook),
    }
}
