// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Result};
use kube::Client;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use metalpool::builders::{
    BareMetalHostBuilder, BuildableResource, NodePoolBuilder, ResourceBuilder,
};
use metalpool::config::{Config, ResourceKind, WaitTarget};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(
        "Waiting up to {:?} for {:?} {}/{} to reach {:?}",
        config.timeout, config.kind, config.namespace, config.name, config.target
    );

    let client = Client::try_default().await?;

    match (config.kind, config.target) {
        (ResourceKind::BareMetalHost, WaitTarget::Deleted) => {
            let mut bmh = BareMetalHostBuilder::from_name(client, &config.name, &config.namespace);
            wait_until_deleted(&mut bmh, &config).await?;
        }
        (ResourceKind::NodePool, WaitTarget::Deleted) => {
            let mut pool = NodePoolBuilder::from_name(client, &config.name, &config.namespace);
            wait_until_deleted(&mut pool, &config).await?;
        }
        (ResourceKind::BareMetalHost, WaitTarget::State(state)) => {
            let mut bmh = BareMetalHostBuilder::pull(client, &config.name, &config.namespace).await?;
            bmh.wait_until_in_status(state, config.timeout).await?;
            print_observed(bmh.object())?;
        }
        (ResourceKind::NodePool, WaitTarget::Replicas(replicas)) => {
            let mut pool = NodePoolBuilder::pull(client, &config.name, &config.namespace).await?;
            pool.wait_for_replicas(replicas, config.timeout).await?;
            print_observed(pool.object())?;
        }
        (ResourceKind::BareMetalHost, WaitTarget::Replicas(_)) => {
            bail!("replica targets only apply to nodepools")
        }
        (ResourceKind::NodePool, WaitTarget::State(_)) => {
            bail!("provisioning states only apply to baremetalhosts")
        }
    }

    info!("Done");
    Ok(())
}

/// The resource may already be gone, so it is not pulled first.
async fn wait_until_deleted<K: BuildableResource>(
    builder: &mut ResourceBuilder<K>,
    config: &Config,
) -> Result<()> {
    builder.wait_until_deleted(config.timeout).await?;
    info!("{} {}/{} is gone", K::NAME, config.namespace, config.name);
    Ok(())
}

fn print_observed<K: Serialize>(object: Option<&K>) -> Result<()> {
    match object {
        Some(object) => print!("{}", serde_yaml::to_string(object)?),
        None => info!("Resource is gone"),
    }
    Ok(())
}
