// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    /// Validation failures recorded while building the definition. A single
    /// failure displays as its message alone, several are joined with `; `.
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),

    /// Errors from the Kubernetes API, passed through unchanged.
    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error("{0}")]
    NotExist(String),

    #[error("can not delete {kind}: {source}")]
    Delete {
        kind: &'static str,
        #[source]
        source: kube::Error,
    },

    #[error("timed out after {timeout:?} waiting for {kind} {namespace}/{name}")]
    Timeout {
        kind: &'static str,
        name: String,
        namespace: String,
        timeout: Duration,
    },
}

impl BuilderError {
    /// True when the API server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BuilderError::Kube(e) if is_not_found(e))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BuilderError::Timeout { .. })
    }
}

/// Not-found classification for raw API errors.
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

pub type Result<T> = std::result::Result<T, BuilderError>;
