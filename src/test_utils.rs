// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Route = (String, String);

/// A mock HTTP service that serves queued responses per method and path.
///
/// Each route holds a sequence of responses; every request consumes the
/// front of the queue except the last entry, which is repeated forever.
/// Unmatched requests get a 404 `Status`.
#[derive(Clone, Default)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Route, VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<HashMap<Route, usize>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Queue a response for GET requests on the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.push("GET", path, status, body)
    }

    /// Queue a response for POST requests on the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.push("POST", path, status, body)
    }

    /// Queue a response for DELETE requests on the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.push("DELETE", path, status, body)
    }

    /// Build a kube Client backed by this mock; the mock keeps recording requests
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// Number of requests received for the method and exact path
    pub fn request_count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn next_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let route = (method.to_string(), path.to_string());
        *self.requests.lock().unwrap().entry(route.clone()).or_default() += 1;

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&route)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .next_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("resource", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

pub fn bmh_collection_path(namespace: &str) -> String {
    format!("/apis/metal3.io/v1alpha1/namespaces/{}/baremetalhosts", namespace)
}

pub fn bmh_path(namespace: &str, name: &str) -> String {
    format!("{}/{}", bmh_collection_path(namespace), name)
}

pub fn nodepool_collection_path(namespace: &str) -> String {
    format!(
        "/apis/hypershift.openshift.io/v1beta1/namespaces/{}/nodepools",
        namespace
    )
}

pub fn nodepool_path(namespace: &str, name: &str) -> String {
    format!("{}/{}", nodepool_collection_path(namespace), name)
}

/// Create a mock BareMetalHost JSON response in the given provisioning state
pub fn bmh_json(name: &str, namespace: &str, state: &str) -> String {
    serde_json::json!({
        "apiVersion": "metal3.io/v1alpha1",
        "kind": "BareMetalHost",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "spec": {
            "bmc": {
                "address": "redfish-virtualmedia://10.0.0.1/redfish/v1/Systems/1",
                "credentialsName": "bmc-secret",
                "disableCertificateVerification": true
            },
            "bootMode": "UEFI",
            "bootMACAddress": "aa:bb:cc:dd:ee:ff",
            "online": true
        },
        "status": {
            "operationalStatus": "OK",
            "provisioning": { "state": state }
        }
    })
    .to_string()
}

/// Create a mock NodePool JSON response reporting the given replica count
pub fn nodepool_json(name: &str, namespace: &str, replicas: i32) -> String {
    serde_json::json!({
        "apiVersion": "hypershift.openshift.io/v1beta1",
        "kind": "NodePool",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "spec": {
            "clusterName": "hosted",
            "release": { "image": "quay.io/openshift-release-dev/ocp-release:4.16.0-x86_64" },
            "replicas": 2,
            "platform": { "type": "Agent" }
        },
        "status": { "replicas": replicas }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a failure `Status` response with an arbitrary code
pub fn failure_json(code: u16, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": "InternalError",
        "code": code
    })
    .to_string()
}
