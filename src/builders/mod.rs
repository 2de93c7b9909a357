// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builders that compose a resource definition, submit it to the cluster and
//! wait for its observed status.
//!
//! [`ResourceBuilder`] carries the create/get/exists/delete/wait shape shared
//! by every kind; `bmh` and `nodepool` add the kind-specific constructors,
//! mutators and waits on top of it.

pub mod bmh;
pub mod nodepool;

pub use bmh::BareMetalHostBuilder;
pub use nodepool::NodePoolBuilder;

use crate::error::{BuilderError, Result};
use crate::wait::{poll_until, FetchErrorPolicy, PollSettings, PollState};
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    core::NamespaceResourceScope,
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{self, Debug};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// A namespaced custom resource that can be driven by a [`ResourceBuilder`].
pub trait BuildableResource:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
    + Send
    + Sync
    + 'static
{
    /// Short label used in delete errors, e.g. `bmh`
    const SHORT_NAME: &'static str;
    /// Lowercase kind used in pull errors, e.g. `baremetalhost`
    const NAME: &'static str;

    /// A definition carrying only the given metadata
    fn from_metadata(metadata: ObjectMeta) -> Self;
}

/// Generic mutation applied to the definition; an `Err` is recorded on the builder.
pub type AdditionalOption<K> = Box<dyn FnOnce(&mut K) -> std::result::Result<(), String> + Send>;

/// Definition, last observed object and recorded validation failures for one resource.
pub struct ResourceBuilder<K: BuildableResource> {
    definition: K,
    object: Option<K>,
    errors: Vec<String>,
    api: Api<K>,
}

impl<K: BuildableResource> Debug for ResourceBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBuilder")
            .field("definition", &self.definition)
            .field("object", &self.object)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl<K: BuildableResource> ResourceBuilder<K> {
    pub(crate) fn from_definition(client: Client, definition: K) -> Self {
        let namespace = definition.namespace().unwrap_or_default();
        Self {
            api: Api::namespaced(client, &namespace),
            definition,
            object: None,
            errors: Vec::new(),
        }
    }

    /// A builder that refers to `name` in `namespace` without fetching it;
    /// the definition carries only that metadata.
    pub fn from_name(client: Client, name: &str, namespace: &str) -> Self {
        let mut builder = Self::from_definition(
            client,
            K::from_metadata(ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            }),
        );

        if name.is_empty() {
            builder.record_error(format!("{} 'name' cannot be empty", K::NAME));
        }
        if namespace.is_empty() {
            builder.record_error(format!("{} 'namespace' cannot be empty", K::NAME));
        }

        builder
    }

    /// Load an existing resource from the cluster; its current state becomes the definition.
    #[instrument(skip(client), fields(kind = K::NAME))]
    pub async fn pull(client: Client, name: &str, namespace: &str) -> Result<Self> {
        info!(
            "Pulling existing {} {} under namespace {} from cluster",
            K::NAME,
            name,
            namespace
        );

        let mut builder = Self::from_name(client, name, namespace);
        builder.validate()?;

        if !builder.exists().await {
            return Err(BuilderError::NotExist(format!(
                "{} object {} doesn't exist in namespace {}",
                K::NAME,
                name,
                namespace
            )));
        }

        // exists() reports true on failures other than not-found
        let object = match builder.object.take() {
            Some(object) => object,
            None => builder.get().await?,
        };
        builder.definition = object.clone();
        builder.object = Some(object);

        Ok(builder)
    }

    pub fn definition(&self) -> &K {
        &self.definition
    }

    /// Last object fetched from the cluster, `None` before the first fetch or after deletion
    pub fn object(&self) -> Option<&K> {
        self.object.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn name(&self) -> String {
        self.definition.name_any()
    }

    pub fn namespace(&self) -> String {
        self.definition.namespace().unwrap_or_default()
    }

    /// Fails with every validation failure recorded so far.
    pub fn validate(&self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(BuilderError::Invalid(self.errors.clone()))
        }
    }

    pub(crate) fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{} builder has error: {}", K::NAME, message);
        self.errors.push(message);
    }

    /// Applies `f` to the definition unless an error has already been recorded.
    pub(crate) fn mutate(&mut self, f: impl FnOnce(&mut K)) {
        if self.errors.is_empty() {
            f(&mut self.definition);
        }
    }

    /// Apply generic mutations in order, stopping at the first that fails.
    pub fn with_options(mut self, options: impl IntoIterator<Item = AdditionalOption<K>>) -> Self {
        debug!("Setting {} additional options", K::NAME);

        for option in options {
            if !self.errors.is_empty() {
                break;
            }
            if let Err(message) = option(&mut self.definition) {
                self.record_error(message);
            }
        }

        self
    }

    /// Fetch the current state of the resource from the cluster.
    ///
    /// API errors are returned unchanged so callers can check
    /// [`BuilderError::is_not_found`].
    pub async fn get(&self) -> Result<K> {
        self.validate()?;
        debug!(
            "Getting {} {} in namespace {}",
            K::NAME,
            self.name(),
            self.namespace()
        );
        Ok(self.api.get(&self.name()).await?)
    }

    /// Whether the resource exists, refreshing the observed object.
    ///
    /// Only a not-found answer counts as absent; any other API failure is
    /// reported as existing.
    pub async fn exists(&mut self) -> bool {
        if self.validate().is_err() {
            return false;
        }

        match self.get().await {
            Ok(object) => {
                self.object = Some(object);
                true
            }
            Err(e) => {
                self.object = None;
                !e.is_not_found()
            }
        }
    }

    /// Submit the definition unless the resource already exists.
    #[instrument(skip(self), fields(kind = K::NAME, name = %self.name(), namespace = %self.namespace()))]
    pub async fn create(&mut self) -> Result<&mut Self> {
        self.validate()?;

        if self.exists().await {
            debug!("{} already exists, skipping create", K::NAME);
            return Ok(self);
        }

        let created = self
            .api
            .create(&PostParams::default(), &self.definition)
            .await?;
        info!("Created {} {}/{}", K::NAME, self.namespace(), self.name());
        self.object = Some(created);

        Ok(self)
    }

    /// Remove the resource from the cluster.
    #[instrument(skip(self), fields(kind = K::NAME, name = %self.name(), namespace = %self.namespace()))]
    pub async fn delete(&mut self) -> Result<&mut Self> {
        self.validate()?;

        if !self.exists().await {
            return Err(BuilderError::NotExist(format!(
                "{} cannot be deleted because it does not exist",
                K::SHORT_NAME
            )));
        }

        self.api
            .delete(&self.name(), &DeleteParams::default())
            .await
            .map_err(|source| BuilderError::Delete {
                kind: K::SHORT_NAME,
                source,
            })?;
        info!("Deleted {} {}/{}", K::NAME, self.namespace(), self.name());
        self.object = None;

        Ok(self)
    }

    /// Delete the resource and wait until the API server no longer returns it.
    pub async fn delete_and_wait_until_deleted(&mut self, timeout: Duration) -> Result<()> {
        self.delete().await?;
        self.wait_until_deleted(timeout).await
    }

    /// Poll until the resource is gone; any failure other than not-found aborts the wait.
    #[instrument(skip(self), fields(kind = K::NAME, name = %self.name(), namespace = %self.namespace()))]
    pub async fn wait_until_deleted(&mut self, timeout: Duration) -> Result<()> {
        self.validate()?;

        let name = self.name();
        let namespace = self.namespace();
        let api = &self.api;

        let (state, observed) = poll_until(
            PollSettings::delayed(timeout),
            FetchErrorPolicy::NotFoundIsSuccess,
            |_: &K| {
                debug!("{} {}/{} still present", K::NAME, namespace, name);
                false
            },
            || api.get(&name),
        )
        .await;

        self.finish_wait(state, observed, timeout)
    }

    /// Poll until `predicate` holds for the fetched object; fetch failures are retried.
    pub(crate) async fn wait_for<P>(&mut self, predicate: P, timeout: Duration) -> Result<()>
    where
        P: Fn(&K) -> bool,
    {
        self.validate()?;

        let name = self.name();
        let api = &self.api;

        let (state, observed) = poll_until(
            PollSettings::immediate(timeout),
            FetchErrorPolicy::Retry,
            predicate,
            || api.get(&name),
        )
        .await;

        self.finish_wait(state, observed, timeout)
    }

    /// The observed object always reflects the last fetch of the wait.
    fn finish_wait(
        &mut self,
        state: PollState<K>,
        observed: Option<K>,
        timeout: Duration,
    ) -> Result<()> {
        self.object = observed;

        match state {
            PollState::Succeeded(_) => Ok(()),
            PollState::Failed(e) => Err(e.into()),
            PollState::TimedOut | PollState::Polling => Err(BuilderError::Timeout {
                kind: K::NAME,
                name: self.name(),
                namespace: self.namespace(),
                timeout,
            }),
        }
    }
}
