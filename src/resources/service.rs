//! Service generation for App workloads.
//!
//! One ClusterIP Service per App, gated by `exposeService`. It shares the
//! parent's identity and selects the Deployment's pods.

use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;

use crate::controller::error::{Error, Result};
use crate::crd::App;
use crate::resources::HTTP_PORT;
use crate::resources::common::{selector_labels, standard_labels};

/// Generate the ClusterIP Service for an App.
pub fn generate_service(app: &App) -> Result<Service> {
    let name = app.name_any();
    let namespace = app
        .namespace()
        .ok_or_else(|| Error::Build("App has no namespace".to_string()))?;

    Ok(Service {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace),
            labels: Some(standard_labels(app)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(selector_labels(app)),
            ports: Some(vec![ServicePort {
                port: HTTP_PORT,
                target_port: Some(IntOrString::String("http".to_string())),
                name: Some("http".to_string()),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}
