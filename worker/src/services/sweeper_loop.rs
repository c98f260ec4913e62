use crate::usecases::expire_entitlements::ExpireEntitlementsUseCase;
use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error};

/// Runs sweep passes for the lifetime of the process. One pass at a time;
/// a failed pass is logged and the next tick tries again.
pub async fn run_sweeper_loop(
    usecase: Arc<ExpireEntitlementsUseCase>,
    interval: Duration,
) -> Result<()> {
    loop {
        match usecase.run().await {
            Ok(result) if result.scanned == 0 => {
                debug!("sweeper: nothing to expire");
            }
            Ok(_) => {}
            Err(e) => {
                error!("Error while sweeping elapsed entitlements: {}", e);
            }
        }

        tokio::time::sleep(interval).await;
    }
}
