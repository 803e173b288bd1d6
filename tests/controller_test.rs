//! Controller integration tests against the mock gateway
//!
//! Drives the per-view controllers through the full fetch / edit / save /
//! delete flows and asserts the store-reconciliation rules.

use std::time::Duration;

use crm::controller::EntityController;
use crm::errors::CrmError;
use crm::gateway::{
    sample_activities, sample_clients, Gateway, MockGateway,
};
use crm::model::{Activity, ActivityStatus, Client, ClientStatus, Priority, Record};
use crm::query::StatusFilter;

fn client_controller() -> EntityController<Client, MockGateway<Client>> {
    let gateway = MockGateway::with_records(sample_clients())
        .with_latency(Duration::ZERO, Duration::ZERO);
    EntityController::new(gateway)
}

fn activity_controller() -> EntityController<Activity, MockGateway<Activity>> {
    let gateway = MockGateway::with_records(sample_activities())
        .with_latency(Duration::ZERO, Duration::ZERO);
    EntityController::new(gateway)
}

fn new_client_draft(name: &str) -> Client {
    Client {
        id: 0,
        name: name.to_string(),
        email: format!("{}@nueva.es", name.to_lowercase().replace(' ', ".")),
        phone: "910000000".to_string(),
        registered_on: "2025-06-01".parse().unwrap(),
        status: ClientStatus::Activo,
    }
}

#[tokio::test]
async fn refresh_populates_the_store() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();
    assert_eq!(controller.store().len(), 6);
    assert!(!controller.is_loading());
    assert_eq!(controller.last_error(), None);
}

#[tokio::test]
async fn refresh_applies_the_default_activity_ordering() {
    let mut controller = activity_controller();
    controller.refresh().await.unwrap();

    let ids: Vec<i64> = controller.snapshot().iter().map(Record::id).collect();
    // Alta 2024-12-15 (4), Alta 2025-01-10 (1), Media (2), Baja (3).
    assert_eq!(ids, vec![4, 1, 2, 3]);
}

#[tokio::test]
async fn successful_create_assigns_id_and_closes_the_modal() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();

    controller.begin_create(new_client_draft("Nueva Empresa"));
    controller.save().await.unwrap();

    assert!(!controller.session().is_open());
    assert_eq!(controller.store().len(), 7);
    let created = controller.store().get(7).unwrap();
    assert_eq!(created.name, "Nueva Empresa");
}

#[tokio::test]
async fn failed_create_leaves_store_unchanged_and_modal_open() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();
    let before = controller.snapshot();

    controller.begin_create(new_client_draft("Fantasma"));
    controller.gateway().fail_next("connection refused");

    let err = controller.save().await.unwrap_err();
    assert!(matches!(err, CrmError::Gateway(_)));

    // Store untouched, modal still open with the draft intact, error surfaced.
    assert_eq!(controller.store().len(), before.len());
    assert!(controller.session().is_open());
    assert_eq!(controller.session().draft().unwrap().name, "Fantasma");
    assert!(controller
        .session()
        .error()
        .unwrap()
        .contains("connection refused"));

    // The failure is scoped to that one invocation: a retry succeeds.
    controller.save().await.unwrap();
    assert!(!controller.session().is_open());
    assert_eq!(controller.store().len(), 7);
}

#[tokio::test]
async fn save_on_a_closed_session_is_a_no_op() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();

    controller.save().await.unwrap();
    assert_eq!(controller.store().len(), 6);
}

#[tokio::test]
async fn status_change_drops_record_from_filtered_view_but_not_store() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();
    controller.set_status_filter(StatusFilter::Only("Activo".to_string()));
    controller.set_search("");

    assert_eq!(controller.visible().len(), 4);

    controller.begin_edit(1).unwrap();
    controller.draft_mut().unwrap().status = ClientStatus::Inactivo;
    controller.save().await.unwrap();

    let visible = controller.visible();
    assert_eq!(visible.len(), 3);
    assert!(visible.iter().all(|c| c.id != 1));
    // Still in the store, just not in this view.
    assert_eq!(controller.store().len(), 6);
    assert_eq!(
        controller.store().get(1).unwrap().status,
        ClientStatus::Inactivo
    );
}

#[tokio::test]
async fn cancel_discards_edits_without_touching_the_store() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();

    controller.begin_edit(2).unwrap();
    controller.draft_mut().unwrap().name = "Renombrada".to_string();
    controller.cancel_edit();

    assert!(!controller.session().is_open());
    assert_eq!(
        controller.store().get(2).unwrap().name,
        "Distribuciones Rápidas C.A."
    );
}

#[tokio::test]
async fn delete_reconciles_the_store() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();

    controller.delete(4).await.unwrap();
    assert_eq!(controller.store().len(), 5);
    assert!(controller.store().get(4).is_none());
}

#[tokio::test]
async fn delete_of_vanished_id_surfaces_not_found_and_resyncs() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();

    // The record disappears behind the controller's back.
    controller.gateway().delete(3).await.unwrap();
    assert_eq!(controller.store().len(), 6);

    let err = controller.delete(3).await.unwrap_err();
    assert!(err.is_not_found());
    // Resynced with the backend: the ghost is gone.
    assert_eq!(controller.store().len(), 5);
    assert!(controller.store().get(3).is_none());
}

#[tokio::test]
async fn edit_of_unknown_id_is_not_found() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();
    assert!(controller.begin_edit(99).unwrap_err().is_not_found());
}

#[tokio::test]
async fn update_resorts_activities_when_priority_changes() {
    let mut controller = activity_controller();
    controller.refresh().await.unwrap();

    // Demote the first Alta to Baja; it must fall behind Media, and within
    // Baja the earlier due date keeps it ahead of the other Baja entry.
    controller.begin_edit(4).unwrap();
    controller.draft_mut().unwrap().priority = Some(Priority::Baja);
    controller.save().await.unwrap();

    let ids: Vec<i64> = controller.snapshot().iter().map(Record::id).collect();
    assert_eq!(ids, vec![1, 2, 4, 3]);
}

#[tokio::test]
async fn mark_complete_goes_through_the_update_path() {
    let mut controller = activity_controller();
    controller.refresh().await.unwrap();

    controller.mark_complete(1).await.unwrap();
    assert_eq!(
        controller.store().get(1).unwrap().status,
        ActivityStatus::Completada
    );
    // The backend saw the update too.
    let backend = controller.gateway().records();
    let updated = backend.iter().find(|a| a.id == 1).unwrap();
    assert_eq!(updated.status, ActivityStatus::Completada);
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_snapshot() {
    let mut controller = client_controller();
    controller.refresh().await.unwrap();

    controller.gateway().fail_next("gateway timeout");
    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(err, CrmError::Gateway(_)));

    assert_eq!(controller.store().len(), 6);
    assert!(controller.last_error().unwrap().contains("gateway timeout"));

    controller.dismiss_error();
    assert_eq!(controller.last_error(), None);
}
