//! Request context: deadline and cancellation for collaborator calls.
//!
//! Every OpenStack call issued by the reconciler goes through
//! [`RequestContext::call`], which races the call against the context's
//! deadline and cancellation signal.

use crate::error::ReconcileError;
use openstack_client::OpenStackError;
use std::future::{pending, Future};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Deadline and cancellation carried through a reconciliation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context derived from [`RequestContext::cancellable`].
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    /// Signal cancellation to every context sharing this handle
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl RequestContext {
    /// A context with no deadline that is never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// A context plus the handle that cancels it
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: None,
            cancel: Some(rx),
        };
        (ctx, CancelHandle(tx))
    }

    /// Set an absolute deadline for every call made under this context
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline `timeout` from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The deadline, if one is set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> Result<(), ReconcileError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(ReconcileError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ReconcileError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Sleep for `duration`, waking early with an error on cancellation or deadline.
    pub async fn sleep(&self, duration: Duration) -> Result<(), ReconcileError> {
        self.call("sleeping", async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }

    /// Run one collaborator call under this context.
    ///
    /// `what` names the lookup for error context, e.g. `looking up port p-1`.
    pub async fn call<T, F>(&self, what: &str, call: F) -> Result<T, ReconcileError>
    where
        F: Future<Output = Result<T, OpenStackError>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled(self.cancel.clone()) => Err(ReconcileError::Cancelled),
            () = deadline => Err(ReconcileError::DeadlineExceeded),
            result = call => result.map_err(|e| ReconcileError::from_lookup(what, e)),
        }
    }
}

/// Resolves once the signal flips to true; never if the sender is dropped first.
async fn cancelled(rx: Option<watch::Receiver<bool>>) {
    match rx {
        Some(mut rx) => {
            let sender_dropped = rx.wait_for(|cancelled| *cancelled).await.is_err();
            if sender_dropped {
                pending::<()>().await;
            }
        }
        None => pending::<()>().await,
    }
}
