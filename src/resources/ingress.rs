//! Ingress generation for App workloads.
//!
//! One HTTP routing rule per App, gated by `exposeService && exposeIngress`.
//! The rule routes all traffic for the App's host to the derived Service,
//! which shares the parent's name.

use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;

use crate::controller::error::{Error, Result};
use crate::crd::App;
use crate::resources::HTTP_PORT;
use crate::resources::common::standard_labels;

/// Generate the Ingress for an App.
pub fn generate_ingress(app: &App) -> Result<Ingress> {
    let name = app.name_any();
    let namespace = app
        .namespace()
        .ok_or_else(|| Error::Build("App has no namespace".to_string()))?;
    let host = format!("{name}.{namespace}.example.com");

    Ok(Ingress {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace),
            labels: Some(standard_labels(app)),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            rules: Some(vec![IngressRule {
                host: Some(host),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some("/".to_string()),
                        path_type: "Prefix".to_string(),
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name,
                                port: Some(ServiceBackendPort {
                                    number: Some(HTTP_PORT),
                                    ..Default::default()
                                }),
                            }),
                            ..Default::default()
                        },
                    }],
                }),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}
