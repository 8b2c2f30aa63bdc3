// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cancellation and deadlines for BlueCat API calls.
//!
//! Every client operation takes a [`CallContext`]. When the context is
//! cancelled or its deadline passes, the in-flight request is dropped and the
//! call returns [`BlueCatError::Cancelled`], which callers can tell apart from
//! network failures.
//!
//! # Example
//!
//! ```rust
//! use bluecat_webhook::call_context::CallContext;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let (ctx, handle) = CallContext::cancellable();
//! let ctx = ctx.with_timeout(Duration::from_secs(30));
//! handle.cancel();
//! assert!(ctx.is_cancelled());
//! # }
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::errors::{BlueCatError, Result};

/// Cancellation signal and optional deadline shared by a chain of calls.
///
/// Cloning is cheap; clones observe the same cancellation handle.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Handle that cancels every [`CallContext`] derived from it.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel all contexts tied to this handle.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled through the returned handle.
    #[must_use]
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                cancel: Some(receiver),
                deadline: None,
            },
            CancelHandle { sender },
        )
    }

    /// Derive a context that expires `timeout` from now.
    ///
    /// An existing earlier deadline is kept.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`.
    ///
    /// An existing earlier deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// The deadline, if one is set.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context has been cancelled or its deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail fast if the context is already done.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Cancelled`] when cancelled or expired.
    pub fn check(&self) -> Result<()> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(cancelled("context cancelled"));
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(cancelled("deadline exceeded"));
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the context ends first.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Cancelled`] when the context ends before `fut`
    /// completes, otherwise whatever `fut` returns.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let cancel = self.cancel.clone();
        let deadline = self.deadline;

        tokio::select! {
            biased;
            () = wait_cancelled(cancel) => Err(cancelled("context cancelled")),
            () = wait_deadline(deadline) => Err(cancelled("deadline exceeded")),
            result = fut => result,
        }
    }
}

fn cancelled(reason: &str) -> BlueCatError {
    BlueCatError::Cancelled {
        reason: reason.to_string(),
    }
}

async fn wait_cancelled(cancel: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = cancel else {
        return std::future::pending().await;
    };
    // A dropped handle can never cancel
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
