//! Reconcile-and-wait loop.
//!
//! A declared network without observed addresses is not an error for the
//! reconciler: Compute may still be attaching it. When asked to wait, the
//! controller re-reads the instance with a Fibonacci backoff until every
//! declared network has an attachment or the attempts run out.

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use instance_networks::{DeclaredNetwork, NetworkReconciler, ReconcileOutput, RequestContext};
use std::time::Duration;
use tracing::{info, warn};

/// How a sync run behaves.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub attempt_timeout: Duration,
    pub wait_for_networks: bool,
    pub max_attempts: u32,
}

/// Reconcile an instance, retrying while declared networks are pending.
pub async fn sync_instance(
    reconciler: &NetworkReconciler,
    ctx: &RequestContext,
    declared: &[DeclaredNetwork],
    instance_id: &str,
    settings: &SyncSettings,
    mut backoff: FibonacciBackoff,
) -> Result<ReconcileOutput, ControllerError> {
    let mut attempt = 1;

    loop {
        let attempt_ctx = ctx.clone().with_timeout(settings.attempt_timeout);
        let output = reconciler.reconcile(&attempt_ctx, declared, instance_id).await?;

        if output.is_complete() {
            info!("Instance {} reconciled on attempt {}", instance_id, attempt);
            return Ok(output);
        }

        if !settings.wait_for_networks {
            warn!(
                "Instance {} has no addresses yet on: {}",
                instance_id,
                output.pending_networks.join(", ")
            );
            return Ok(output);
        }

        if attempt >= settings.max_attempts {
            return Err(ControllerError::NetworksPending {
                instance_id: instance_id.to_string(),
                networks: output.pending_networks,
            });
        }

        let delay = backoff.next_backoff();
        warn!(
            "Instance {} still waiting on {} (attempt {}/{}), retrying in {:?}",
            instance_id,
            output.pending_networks.join(", "),
            attempt,
            settings.max_attempts,
            delay
        );
        ctx.sleep(delay).await?;
        attempt += 1;
    }
}
