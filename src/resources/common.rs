//! Common resource generation utilities.
//!
//! Provides labels shared by all managed resources and the owner-binding
//! helper that ties a derivative's lifecycle to its parent App.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::ResourceExt;

use crate::controller::error::{Error, Result};
use crate::crd::App;

/// Standard labels applied to all managed resources
pub fn standard_labels(app: &App) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("app.kubernetes.io/name".to_string(), app.name_any());
    labels.insert(
        "app.kubernetes.io/managed-by".to_string(),
        "app-operator".to_string(),
    );
    labels.insert("app.kubernetes.io/component".to_string(), "app".to_string());
    labels
}

/// Labels used to select the workload pods
pub fn selector_labels(app: &App) -> BTreeMap<String, String> {
    let mut selector = BTreeMap::new();
    selector.insert("app.kubernetes.io/name".to_string(), app.name_any());
    selector
}

/// Create the controller owner reference for an App.
///
/// This is a weak back-reference: it identifies the owning parent by
/// (api_version, kind, name, uid) and confers no handle to it. The cluster
/// garbage collector uses it to cascade-delete derivatives when the App is
/// deleted.
pub fn owner_reference(app: &App) -> Result<OwnerReference> {
    let uid = app
        .uid()
        .ok_or_else(|| Error::Ownership("parent App has no uid yet".to_string()))?;
    Ok(OwnerReference {
        api_version: "apps.kubeforge.dev/v1beta1".to_string(),
        kind: "App".to_string(),
        name: app.name_any(),
        uid,
        controller: Some(true),
        block_owner_deletion: Some(true),
    })
}

/// Attach the parent owner reference to a derivative's metadata.
///
/// Idempotent: re-binding an already-bound object is a no-op. Owner
/// references cannot cross namespaces, so a derivative whose namespace
/// differs from the parent's is rejected.
pub fn bind_owner(app: &App, meta: &mut ObjectMeta) -> Result<()> {
    if meta.namespace != app.namespace() {
        return Err(Error::Ownership(format!(
            "cannot bind {:?} to App in namespace {:?}",
            meta.namespace,
            app.namespace()
        )));
    }

    let owner = owner_reference(app)?;
    let refs = meta.owner_references.get_or_insert_with(Vec::new);
    if refs.iter().any(|r| r.uid == owner.uid) {
        return Ok(());
    }
    refs.push(owner);
    Ok(())
}
