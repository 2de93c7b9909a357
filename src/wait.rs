// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval polling of remote state until a predicate holds.
//!
//! Every wait helper in this crate is an instance of [`poll_until`]: fetch the
//! resource, feed the outcome through [`transition`], and either stop or sleep
//! one interval and try again. The only thing that differs between a wait for
//! presence and a wait for deletion is the predicate and the
//! [`FetchErrorPolicy`].

use crate::constants::poll::INTERVAL_SECS;
use crate::error::is_not_found;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// What a failed fetch means while polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorPolicy {
    /// Any fetch failure is treated as "not yet" and polling continues.
    Retry,
    /// Not-found completes the wait; any other failure aborts it.
    NotFoundIsSuccess,
}

#[derive(Debug)]
pub enum PollState<K> {
    Polling,
    /// Carries the object that satisfied the predicate, `None` if it is gone.
    Succeeded(Option<K>),
    TimedOut,
    Failed(kube::Error),
}

impl<K> PollState<K> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Polling)
    }
}

/// Timing of a poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    /// Check once before the first sleep.
    pub immediate: bool,
}

impl PollSettings {
    /// First check right away, then every interval.
    pub fn immediate(timeout: Duration) -> Self {
        Self {
            interval: Duration::from_secs(INTERVAL_SECS),
            timeout,
            immediate: true,
        }
    }

    /// First check after one interval.
    pub fn delayed(timeout: Duration) -> Self {
        Self {
            immediate: false,
            ..Self::immediate(timeout)
        }
    }
}

/// Single step of the poll state machine.
pub fn transition<K, P>(
    fetched: std::result::Result<K, kube::Error>,
    predicate: &P,
    policy: FetchErrorPolicy,
) -> PollState<K>
where
    P: Fn(&K) -> bool,
{
    match fetched {
        Ok(obj) if predicate(&obj) => PollState::Succeeded(Some(obj)),
        Ok(_) => PollState::Polling,
        Err(e) => match policy {
            FetchErrorPolicy::Retry => {
                debug!("Fetch failed while polling, retrying: {}", e);
                PollState::Polling
            }
            FetchErrorPolicy::NotFoundIsSuccess if is_not_found(&e) => PollState::Succeeded(None),
            FetchErrorPolicy::NotFoundIsSuccess => PollState::Failed(e),
        },
    }
}

/// Poll `fetch` until `predicate` holds, the policy ends the wait, or the
/// timeout elapses. Never returns [`PollState::Polling`].
///
/// Alongside the final state returns the outcome of the last fetch: the
/// object if it succeeded, `None` if it failed.
pub async fn poll_until<K, F, Fut, P>(
    settings: PollSettings,
    policy: FetchErrorPolicy,
    predicate: P,
    mut fetch: F,
) -> (PollState<K>, Option<K>)
where
    K: Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<K, kube::Error>>,
    P: Fn(&K) -> bool,
{
    let deadline = Instant::now() + settings.timeout;

    if !settings.immediate {
        sleep(settings.interval).await;
    }

    loop {
        let fetched = fetch().await;
        let observed = fetched.as_ref().ok().cloned();

        let state = transition(fetched, &predicate, policy);
        if state.is_terminal() {
            return (state, observed);
        }

        if Instant::now() >= deadline {
            return (PollState::TimedOut, observed);
        }

        sleep(settings.interval).await;
    }
}
