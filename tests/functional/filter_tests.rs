//! Change-filter tests.
//!
//! The parent watch stream is filtered with the generation predicate: a
//! pass is admitted only when `metadata.generation` changed. These tests
//! verify the predicate values the stream filter compares, which is what
//! prevents the self-triggered reconcile loop caused by status-only writes.

use app_operator::crd::{App, AppSpec, AppStatus, Condition};
use kube::runtime::predicates;

fn sample_app(generation: i64) -> App {
    let mut app = App::new(
        "sample",
        AppSpec {
            replicas: 2,
            image: "app:v1".to_string(),
            expose_service: true,
            expose_ingress: false,
        },
    );
    app.metadata.namespace = Some("default".to_string());
    app.metadata.generation = Some(generation);
    app
}

/// A status-only mutation leaves the predicate value unchanged, so the
/// filtered stream drops the event and no pass is scheduled.
#[test]
fn test_status_only_change_is_suppressed() {
    let old = sample_app(1);
    let mut new = sample_app(1);
    new.status = Some(AppStatus {
        observed_generation: Some(1),
        conditions: vec![Condition::ready(true, "DerivativesSynced", "ok", Some(1))],
    });

    assert_eq!(predicates::generation(&old), predicates::generation(&new));
}

/// A semantic spec change bumps the generation and is admitted.
#[test]
fn test_generation_bump_is_admitted() {
    let old = sample_app(1);
    let new = sample_app(2);

    assert_ne!(predicates::generation(&old), predicates::generation(&new));
}

/// The predicate produces a value even before the first reconcile, so newly
/// created parents are always admitted.
#[test]
fn test_new_object_yields_a_predicate_value() {
    let app = sample_app(1);
    assert!(predicates::generation(&app).is_some());
}
