//! Derivative synchronization logic.
//!
//! The decision core of the controller: for each derived resource kind the
//! pair (observed presence, desired gate) maps to exactly one store action.
//!
//! | Observed | Gate     | Action |
//! |----------|----------|--------|
//! | Absent   | enabled  | create |
//! | Absent   | disabled | no-op  |
//! | Present  | enabled  | apply  |
//! | Present  | disabled | delete |
//!
//! Updates go through server-side apply, so re-applying an unchanged desired
//! state is idempotent. Lookup 404s are the Absent state, not errors; every
//! other store error aborts the pass for retry by the scheduler.

use kube::{
    Api,
    api::{DeleteParams, Patch, PatchParams, PostParams},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::controller::context::FIELD_MANAGER;
use crate::controller::error::{Error, Result};
use crate::crd::AppSpec;

/// Action chosen for one derivative in one pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncAction {
    /// Derivative is missing and wanted: create it.
    Create,
    /// Derivative exists and is wanted: apply the full desired state.
    Apply,
    /// Derivative exists but its gate is disabled: delete it.
    Delete,
    /// Derivative is missing and not wanted: nothing to do.
    Noop,
}

/// Outcome of synchronizing one derivative.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncOutcome {
    Created,
    Applied,
    Deleted,
    Unchanged,
}

/// Map (observed presence, desired gate) to the store action.
pub fn decide(present: bool, enabled: bool) -> SyncAction {
    match (present, enabled) {
        (false, true) => SyncAction::Create,
        (false, false) => SyncAction::Noop,
        (true, true) => SyncAction::Apply,
        (true, false) => SyncAction::Delete,
    }
}

/// Per-kind enablement gates derived from the parent spec.
///
/// The Deployment carries an implicit always-enabled gate and has no entry
/// here. Ingress requires service exposure first: a spec where
/// `exposeIngress` is set without `exposeService` treats the ingress as
/// ineligible rather than failing the pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Gates {
    pub service: bool,
    pub ingress: bool,
}

/// Derive the enablement gates from an App spec.
pub fn gates(spec: &AppSpec) -> Gates {
    Gates {
        service: spec.expose_service,
        ingress: spec.expose_service && spec.expose_ingress,
    }
}

/// Converge one derivative toward its desired state.
///
/// `desired` is `Some` when the kind's gate is enabled and `None` when
/// disabled; the stray-cleanup rule (disabled gate deletes a leftover object)
/// falls out of the transition table.
pub async fn sync_resource<K>(api: &Api<K>, name: &str, desired: Option<K>) -> Result<SyncOutcome>
where
    K: Clone + DeserializeOwned + Serialize + std::fmt::Debug,
{
    // A 404 here is the Absent state, not an error
    let observed = api.get_opt(name).await?;

    let outcome = match (decide(observed.is_some(), desired.is_some()), desired) {
        (SyncAction::Create, Some(obj)) => {
            api.create(&PostParams::default(), &obj).await?;
            SyncOutcome::Created
        }
        (SyncAction::Apply, Some(obj)) => {
            api.patch(
                name,
                &PatchParams::apply(FIELD_MANAGER).force(),
                &Patch::Apply(&obj),
            )
            .await?;
            SyncOutcome::Applied
        }
        (SyncAction::Delete, _) => {
            api.delete(name, &DeleteParams::default()).await?;
            SyncOutcome::Deleted
        }
        (SyncAction::Noop, _) | (_, None) => SyncOutcome::Unchanged,
    };

    debug!(name = %name, ?outcome, "Synchronized derivative");
    Ok(outcome)
}

/// Check that the parent spec carries enough to build any derivative.
pub fn validate_spec(spec: &AppSpec) -> Result<()> {
    if spec.image.trim().is_empty() {
        return Err(Error::Build("spec.image must not be empty".to_string()));
    }
    if spec.replicas < 0 {
        return Err(Error::Build("spec.replicas must not be negative".to_string()));
    }
    Ok(())
}
