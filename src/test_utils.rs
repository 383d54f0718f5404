// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::error::{ExportError, Result};
use crate::export::ExportWorkloads;
use crate::types::{ArgoCDExport, ArgoCDExportSpec, ArgoCDExportStatus};
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::{Client, ResourceExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request as seen by the mock API server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service acting as a tiny API server.
///
/// Canned responses win. Otherwise GET, POST and PUT are served from an
/// in-memory object store keyed by request path, and anything else is a 404.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    objects: Arc<Mutex<HashMap<String, Value>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            objects: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Seed the object store with an existing object
    pub fn with_object(self, path: &str, object: Value) -> Self {
        self.objects.lock().unwrap().insert(path.to_string(), object);
        self
    }

    /// Current stored object at the given path
    pub fn object(&self, path: &str) -> Option<Value> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// All requests that would modify state on a real API server
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /api/v1/namespaces/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }

    fn respond(&self, method: &str, path: &str, body: &str) -> (u16, String) {
        if let Some(resp) = self.find_response(method, path) {
            return resp;
        }

        let mut objects = self.objects.lock().unwrap();
        match method {
            "GET" => match objects.get(path) {
                Some(object) => (200, object.to_string()),
                None => (404, not_found_json("object", path)),
            },
            "POST" => {
                let mut object: Value = serde_json::from_str(body).unwrap();
                let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
                let key = format!("{}/{}", path, name);
                if objects.contains_key(&key) {
                    return (409, status_json(409, "AlreadyExists", &format!("{} already exists", name)));
                }
                object["metadata"]["resourceVersion"] = Value::from("1");
                objects.insert(key, object.clone());
                (201, object.to_string())
            }
            "PUT" => {
                if !objects.contains_key(path) {
                    return (404, not_found_json("object", path));
                }
                let object: Value = serde_json::from_str(body).unwrap();
                objects.insert(path.to_string(), object.clone());
                (200, object.to_string())
            }
            _ => (404, not_found_json("object", path)),
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let service = self.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let method = parts.method.to_string();
            let path = parts.uri.path().to_string();
            let body = body.collect().await?.to_bytes();
            let body = String::from_utf8_lossy(&body).into_owned();

            let (status, payload) = service.respond(&method, &path, &body);
            service.requests.lock().unwrap().push(RecordedRequest { method, path, body });

            Ok::<_, tower::BoxError>(
                Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.into_bytes()))
                    .unwrap(),
            )
        })
    }
}

/// Create a Kubernetes Status failure body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// An ArgoCDExport as the API server would hand it to the controller
pub fn make_export(name: &str, namespace: &str, spec: ArgoCDExportSpec) -> ArgoCDExport {
    ArgoCDExport {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("{}-uid", name)),
            ..Default::default()
        },
        spec,
        status: None,
    }
}

pub fn with_phase(mut export: ArgoCDExport, phase: &str) -> ArgoCDExport {
    export.status = Some(ArgoCDExportStatus {
        phase: phase.to_string(),
    });
    export
}

pub fn secret_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/namespaces/{}/secrets/{}", namespace, name)
}

pub fn export_status_path(namespace: &str, name: &str) -> String {
    format!(
        "/apis/argoproj.io/v1alpha1/namespaces/{}/argocdexports/{}/status",
        namespace, name
    )
}

/// Which workload path a reconcile pass took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadCall {
    Job(String),
    CronJob(String),
}

/// Workload collaborator that only records what it was asked to do
#[derive(Clone, Default)]
pub struct RecordingWorkloads {
    calls: Arc<Mutex<Vec<WorkloadCall>>>,
    failure: Option<String>,
}

impl RecordingWorkloads {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<WorkloadCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: WorkloadCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(ExportError::Delegation(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExportWorkloads for RecordingWorkloads {
    async fn reconcile_job(&self, export: &ArgoCDExport) -> Result<()> {
        self.record(WorkloadCall::Job(export.name_any()))
    }

    async fn reconcile_cron_job(&self, export: &ArgoCDExport) -> Result<()> {
        self.record(WorkloadCall::CronJob(export.name_any()))
    }
}
