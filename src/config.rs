// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::ProvisioningState;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    BareMetalHost,
    NodePool,
}

/// What the waiter blocks on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    State(ProvisioningState),
    Replicas(i32),
    Deleted,
}

/// Waiter configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
    pub target: WaitTarget,
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("{} environment variable not set", key))
        };

        let kind = match required("METALPOOL_KIND")?.to_ascii_lowercase().as_str() {
            "baremetalhost" | "bmh" => ResourceKind::BareMetalHost,
            "nodepool" => ResourceKind::NodePool,
            other => bail!("unsupported METALPOOL_KIND '{}'", other),
        };
        let name = required("METALPOOL_NAME")?;
        let namespace = required("METALPOOL_NAMESPACE")?;

        let wait = required("METALPOOL_WAIT")?;
        let target = if wait.eq_ignore_ascii_case("deleted") {
            WaitTarget::Deleted
        } else {
            match kind {
                ResourceKind::BareMetalHost => WaitTarget::State(
                    wait.parse().map_err(|e: String| anyhow!(e))?,
                ),
                ResourceKind::NodePool => WaitTarget::Replicas(
                    wait.parse()
                        .with_context(|| format!("METALPOOL_WAIT '{}' is not a replica count", wait))?,
                ),
            }
        };

        let timeout_secs = match lookup("METALPOOL_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("METALPOOL_TIMEOUT_SECS '{}' is not a number", v))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            kind,
            name,
            namespace,
            target,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
