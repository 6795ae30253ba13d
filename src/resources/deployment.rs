//! Deployment generation for App workloads.
//!
//! The Deployment is the unconditional derivative: it is always desired
//! while the parent App exists. Replica count and image are taken verbatim
//! from the parent spec; the identity (name, namespace) equals the parent's
//! so a single lookup finds it.

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;

use crate::controller::error::{Error, Result};
use crate::crd::App;
use crate::resources::HTTP_PORT;
use crate::resources::common::{selector_labels, standard_labels};

/// Generate the Deployment for an App.
///
/// Pure: no I/O, deterministic for identical input. Fails only on malformed
/// input (missing namespace, empty image), which is fatal to the pass.
pub fn generate_deployment(app: &App) -> Result<Deployment> {
    let name = app.name_any();
    let namespace = app
        .namespace()
        .ok_or_else(|| Error::Build("App has no namespace".to_string()))?;
    if app.spec.image.trim().is_empty() {
        return Err(Error::Build("spec.image must not be empty".to_string()));
    }

    let labels = standard_labels(app);
    let selector = selector_labels(app);

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(app.spec.replicas),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: "app".to_string(),
                        image: Some(app.spec.image.clone()),
                        ports: Some(vec![ContainerPort {
                            container_port: HTTP_PORT,
                            name: Some("http".to_string()),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}
