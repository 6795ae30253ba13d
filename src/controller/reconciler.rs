//! Reconciliation loop for App.
//!
//! A pass converges the three derived resources toward the state implied by
//! the parent spec, in fixed order: Deployment, then Service, then Ingress.
//! The order matters: the Ingress gate is only meaningful once the Service
//! state is known, and a disabled Service short-circuits further routing
//! work for the pass (a stray Ingress left over from a prior enabled state
//! is still deleted, via the gate table).
//!
//! The reconciler never retries internally; retryable errors are returned to
//! the scheduler, whose backoff policy is set by `error_policy`.

use std::sync::Arc;
use std::time::Duration;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    Api, ResourceExt,
    api::{Patch, PatchParams},
    runtime::controller::Action,
};
use tracing::{debug, error, info, warn};

use crate::controller::context::{Context, FIELD_MANAGER};
use crate::controller::error::Error;
use crate::controller::sync::{SyncOutcome, gates, sync_resource, validate_spec};
use crate::crd::{App, AppStatus, Condition};
use crate::resources;

/// Requeue interval for a converged App
const RESYNC_INTERVAL: Duration = Duration::from_secs(300);

/// Reconcile an App
///
/// This is the main reconciliation function called by the controller
/// whenever the change filter admits a pass for the parent identity.
pub async fn reconcile(obj: Arc<App>, ctx: Arc<Context>) -> Result<Action, Error> {
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());

    debug!(name = %name, namespace = %namespace, "Reconciling App");

    // Re-read the parent by identity: a watch event for an already-deleted
    // App is not an error, and cascade deletion of derivatives is the
    // cluster garbage collector's job.
    let apps: Api<App> = Api::namespaced(ctx.client.clone(), &namespace);
    let Some(app) = apps.get_opt(&name).await? else {
        debug!(name = %name, "App no longer exists, nothing to reconcile");
        return Ok(Action::await_change());
    };

    if app.metadata.deletion_timestamp.is_some() {
        debug!(name = %name, "App is being deleted, derivatives follow via owner references");
        return Ok(Action::await_change());
    }

    // A malformed spec must never be applied as desired state
    if let Err(e) = validate_spec(&app.spec) {
        error!(name = %name, error = %e, "Spec validation failed");
        ctx.publish_warning_event(&app, "ValidationFailed", "Reconciling", Some(e.to_string()))
            .await;
        return Err(e);
    }

    let gates = gates(&app.spec);

    // Deployment: implicit always-enabled gate.
    let deploy_api: Api<Deployment> = Api::namespaced(ctx.client.clone(), &namespace);
    let mut deployment = resources::generate_deployment(&app)?;
    resources::bind_owner(&app, &mut deployment.metadata)?;
    let result = sync_resource(&deploy_api, &name, Some(deployment)).await;
    report_outcome(&ctx, &app, "Deployment", &result).await;
    result?;

    // Service: gated by exposeService.
    let svc_api: Api<Service> = Api::namespaced(ctx.client.clone(), &namespace);
    let desired_service = if gates.service {
        let mut service = resources::generate_service(&app)?;
        resources::bind_owner(&app, &mut service.metadata)?;
        Some(service)
    } else {
        None
    };
    let result = sync_resource(&svc_api, &name, desired_service).await;
    report_outcome(&ctx, &app, "Service", &result).await;
    result?;

    // Ingress: gated by exposeService && exposeIngress. With the gate
    // disabled the sync still deletes any stray Ingress, so retracting
    // service exposure never leaves a stale routing rule behind.
    let ing_api: Api<Ingress> = Api::namespaced(ctx.client.clone(), &namespace);
    let desired_ingress = if gates.ingress {
        let mut ingress = resources::generate_ingress(&app)?;
        resources::bind_owner(&app, &mut ingress.metadata)?;
        Some(ingress)
    } else {
        None
    };
    let result = sync_resource(&ing_api, &name, desired_ingress).await;
    report_outcome(&ctx, &app, "Ingress", &result).await;
    result?;

    update_status(&apps, &app).await?;

    info!(name = %name, namespace = %namespace, "Reconciled App");
    Ok(Action::requeue(RESYNC_INTERVAL))
}

/// Error policy for the controller
pub fn error_policy(obj: Arc<App>, error: &Error, _ctx: Arc<Context>) -> Action {
    let name = obj.name_any();

    if error.is_not_found() {
        debug!(name = %name, "Resource not found (likely deleted)");
        return Action::await_change();
    }

    if error.is_retryable() {
        warn!(name = %name, error = %error, "Retryable error, will retry");
        Action::requeue(error.requeue_after())
    } else {
        error!(name = %name, error = %error, "Non-retryable error");
        Action::requeue(error.requeue_after())
    }
}

/// Record the outcome of one derivative sync against the parent.
///
/// Fire-and-forget observability: publishing never fails the pass.
async fn report_outcome(
    ctx: &Context,
    app: &App,
    kind: &str,
    result: &Result<SyncOutcome, Error>,
) {
    match result {
        Ok(SyncOutcome::Created) => {
            ctx.publish_normal_event(
                app,
                &format!("Created{kind}"),
                "Reconciling",
                Some(format!("Created {kind} {}", app.name_any())),
            )
            .await;
        }
        Ok(SyncOutcome::Deleted) => {
            ctx.publish_normal_event(
                app,
                &format!("Deleted{kind}"),
                "Reconciling",
                Some(format!("Deleted {kind} {}", app.name_any())),
            )
            .await;
        }
        Ok(SyncOutcome::Applied | SyncOutcome::Unchanged) => {}
        Err(e) => {
            ctx.publish_warning_event(
                app,
                &format!("{kind}SyncFailed"),
                "Reconciling",
                Some(e.to_string()),
            )
            .await;
        }
    }
}

/// Update the status of an App after a converged pass
async fn update_status(api: &Api<App>, app: &App) -> Result<(), Error> {
    let generation = app.metadata.generation;
    let status = AppStatus {
        observed_generation: generation,
        conditions: vec![Condition::ready(
            true,
            "DerivativesSynced",
            "All derived resources converged",
            generation,
        )],
    };

    let patch = serde_json::json!({ "status": status });
    api.patch_status(
        &app.name_any(),
        &PatchParams::apply(FIELD_MANAGER),
        &Patch::Merge(&patch),
    )
    .await?;

    Ok(())
}
