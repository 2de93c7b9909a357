// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HyperShift NodePool builder

use super::{BuildableResource, ResourceBuilder};
use crate::constants::nodepool::PLATFORM_AGENT;
use crate::error::Result;
use crate::types::nodepool::{NodePool, NodePoolPlatform, NodePoolSpec, Release};
use kube::api::ObjectMeta;
use kube::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

impl BuildableResource for NodePool {
    const SHORT_NAME: &'static str = "nodepool";
    const NAME: &'static str = "nodepool";

    fn from_metadata(metadata: ObjectMeta) -> Self {
        NodePool {
            metadata,
            spec: NodePoolSpec::default(),
            status: None,
        }
    }
}

pub type NodePoolBuilder = ResourceBuilder<NodePool>;

impl ResourceBuilder<NodePool> {
    /// Compose an agent-platform NodePool for the given hosted cluster.
    pub fn new(
        client: Client,
        name: &str,
        namespace: &str,
        cluster_name: &str,
        release_image: &str,
        replicas: i32,
    ) -> Self {
        debug!(
            "Initializing new nodepool {} in namespace {} for cluster {} with release {} and {} replicas",
            name, namespace, cluster_name, release_image, replicas
        );

        let definition = NodePool {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: NodePoolSpec {
                cluster_name: cluster_name.to_string(),
                release: Release {
                    image: release_image.to_string(),
                },
                replicas: Some(replicas),
                platform: NodePoolPlatform {
                    platform_type: PLATFORM_AGENT.to_string(),
                },
                management: None,
            },
            status: None,
        };

        let mut builder = Self::from_definition(client, definition);

        let required = [
            ("name", name),
            ("namespace", namespace),
            ("clusterName", cluster_name),
            ("release", release_image),
        ];
        for (field, value) in required {
            if value.is_empty() {
                builder.record_error(format!("nodepool '{}' cannot be empty", field));
            }
        }

        builder
    }

    /// Set the desired replica count.
    pub fn with_replicas(mut self, replicas: i32) -> Self {
        self.mutate(|pool| {
            info!(
                "Scaling nodepool {} to {} replicas",
                pool.metadata.name.as_deref().unwrap_or_default(),
                replicas
            );
            pool.spec.replicas = Some(replicas);
        });
        self
    }

    /// Poll every second until the NodePool's status reports `replicas` replicas.
    #[instrument(skip(self), fields(name = %self.name(), namespace = %self.namespace()))]
    pub async fn wait_for_replicas(&mut self, replicas: i32, timeout: Duration) -> Result<()> {
        self.wait_for(
            |pool: &NodePool| {
                let current = pool.status_replicas();
                debug!("nodepool has {} replicas, waiting for {}", current, replicas);
                current == replicas
            },
            timeout,
        )
        .await
    }
}
