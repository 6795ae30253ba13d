//! App Custom Resource Definition.
//!
//! Defines the App CRD: a single parent specification describing a desired
//! application. The controller derives up to three managed resources from it
//! (Deployment, Service, Ingress), gated by the `exposeService` and
//! `exposeIngress` flags.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// App is a custom resource describing a desired application instance.
///
/// Example:
/// ```yaml
/// apiVersion: apps.kubeforge.dev/v1beta1
/// kind: App
/// metadata:
///   name: app-sample
/// spec:
///   replicas: 2
///   image: nginx:1.27
///   exposeService: true
///   exposeIngress: false
/// ```
#[derive(CustomResource, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "apps.kubeforge.dev",
    version = "v1beta1",
    kind = "App",
    plural = "apps",
    status = "AppStatus",
    namespaced,
    // Print columns for kubectl get
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Image", "type":"string", "jsonPath":".spec.image"}"#,
    printcolumn = r#"{"name":"Service", "type":"boolean", "jsonPath":".spec.exposeService"}"#,
    printcolumn = r#"{"name":"Ingress", "type":"boolean", "jsonPath":".spec.exposeIngress"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AppSpec {
    /// Number of workload replicas (default 1).
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Container image reference, copied verbatim into the Deployment.
    pub image: String,

    /// Expose the workload inside the cluster via a Service.
    #[serde(default)]
    pub expose_service: bool,

    /// Expose the Service externally via an Ingress.
    /// Only honored while `exposeService` is also true; the admission gate
    /// enforces this upstream, the controller tolerates violations by
    /// treating the ingress as ineligible.
    #[serde(default)]
    pub expose_ingress: bool,
}

fn default_replicas() -> i32 {
    1
}

/// Status of an App.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppStatus {
    /// The generation most recently observed by the controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Conditions describing the current state.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Condition describes the state of an App at a certain point.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition.
    pub r#type: String,
    /// Status of the condition ("True", "False", "Unknown").
    pub status: String,
    /// Machine-readable reason for the condition's last transition.
    pub reason: String,
    /// Human-readable message indicating details about last transition.
    pub message: String,
    /// Last time the condition transitioned from one status to another.
    pub last_transition_time: String,
    /// The generation of the resource this condition was observed for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl Condition {
    /// Create a new condition.
    pub fn new(
        condition_type: &str,
        status: bool,
        reason: &str,
        message: &str,
        generation: Option<i64>,
    ) -> Self {
        Self {
            r#type: condition_type.to_string(),
            status: if status {
                "True".to_string()
            } else {
                "False".to_string()
            },
            reason: reason.to_string(),
            message: message.to_string(),
            last_transition_time: jiff::Timestamp::now().to_string(),
            observed_generation: generation,
        }
    }

    /// Create a "Ready" condition.
    pub fn ready(ready: bool, reason: &str, message: &str, generation: Option<i64>) -> Self {
        Self::new("Ready", ready, reason, message, generation)
    }

    /// Create a "Progressing" condition.
    pub fn progressing(
        progressing: bool,
        reason: &str,
        message: &str,
        generation: Option<i64>,
    ) -> Self {
        Self::new("Progressing", progressing, reason, message, generation)
    }
}
