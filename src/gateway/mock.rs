//! In-memory mock gateway with artificial latency
//!
//! Simulates the remote backend for development and tests: seeded data,
//! server-style id assignment, and configurable delays (the UI prototype used
//! 1000ms for list and 500ms for mutations). A `fail_next` switch lets tests
//! exercise the transport-failure paths.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::sleep;

use crate::errors::{CrmError, GatewayError, NotFoundError};
use crate::gateway::Gateway;
use crate::model::{
    Activity, ActivityKind, ActivityStatus, Client, ClientStatus, Contact, ContactStatus,
    Opportunity, Priority, Record, Stage, DEFAULT_USER_ID,
};

pub const DEFAULT_LIST_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MUTATE_DELAY: Duration = Duration::from_millis(500);

/// Mock CRUD gateway over a seeded in-memory collection.
pub struct MockGateway<R: Record> {
    items: Mutex<Vec<R>>,
    next_id: AtomicI64,
    list_delay: Duration,
    mutate_delay: Duration,
    fail_next: Mutex<Option<String>>,
}

impl<R: Record> MockGateway<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        let next_id = records.iter().map(Record::id).max().unwrap_or(0) + 1;
        Self {
            items: Mutex::new(records),
            next_id: AtomicI64::new(next_id),
            list_delay: DEFAULT_LIST_DELAY,
            mutate_delay: DEFAULT_MUTATE_DELAY,
            fail_next: Mutex::new(None),
        }
    }

    /// Override the artificial delays; tests use `Duration::ZERO`.
    pub fn with_latency(mut self, list: Duration, mutate: Duration) -> Self {
        self.list_delay = list;
        self.mutate_delay = mutate;
        self
    }

    /// Make the next operation fail with `GatewayError::Unavailable`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.lock().expect("mock lock poisoned") = Some(message.into());
    }

    /// Backing records, for assertions.
    pub fn records(&self) -> Vec<R> {
        self.items.lock().expect("mock lock poisoned").clone()
    }

    fn take_failure(&self) -> Result<(), GatewayError> {
        let pending = self.fail_next.lock().expect("mock lock poisoned").take();
        match pending {
            Some(message) => Err(GatewayError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

impl<R: Record> Default for MockGateway<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Gateway<R> for MockGateway<R> {
    async fn list(&self) -> Result<Vec<R>, CrmError> {
        self.take_failure()?;
        sleep(self.list_delay).await;
        Ok(self.records())
    }

    async fn create(&self, record: &R) -> Result<R, CrmError> {
        record.validate()?;
        self.take_failure()?;
        sleep(self.mutate_delay).await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = with_id(record.clone(), id);
        self.items
            .lock()
            .expect("mock lock poisoned")
            .push(created.clone());
        Ok(created)
    }

    async fn update(&self, record: &R) -> Result<R, CrmError> {
        record.validate()?;
        self.take_failure()?;
        sleep(self.mutate_delay).await;

        let mut items = self.items.lock().expect("mock lock poisoned");
        let slot = items
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| NotFoundError::new(R::ENTITY, record.id()))?;
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), CrmError> {
        self.take_failure()?;
        sleep(self.mutate_delay).await;

        let mut items = self.items.lock().expect("mock lock poisoned");
        let position = items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| NotFoundError::new(R::ENTITY, id))?;
        items.remove(position);
        Ok(())
    }
}

// The Record trait has no id setter, so the server-assigned id is written
// into the wire id field through serde_json.
fn with_id<R: Record>(record: R, id: i64) -> R {
    let mut value = serde_json::to_value(record.to_dto()).expect("dto serializes");
    if let Some(object) = value.as_object_mut() {
        for key in ["id", "idContacto", "idTarea"] {
            if object.contains_key(key) {
                object.insert(key.to_string(), serde_json::json!(id));
                break;
            }
        }
    }
    let dto = serde_json::from_value(value).expect("dto deserializes");
    R::from_dto(dto).expect("canonical dto maps back")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid literal date")
}

/// Seed data mirroring the backend's client list.
pub fn sample_clients() -> Vec<Client> {
    vec![
        Client {
            id: 1,
            name: "Empresa Innovadora S.L.".to_string(),
            email: "contacto@innovadora.com".to_string(),
            phone: "912345678".to_string(),
            registered_on: date(2023, 11, 15),
            status: ClientStatus::Activo,
        },
        Client {
            id: 2,
            name: "Distribuciones Rápidas C.A.".to_string(),
            email: "ventas@rapidas.es".to_string(),
            phone: "930012345".to_string(),
            registered_on: date(2023, 12, 1),
            status: ClientStatus::Activo,
        },
        Client {
            id: 3,
            name: "Tecnologías del Mañana".to_string(),
            email: "soporte@techmanana.net".to_string(),
            phone: "600112233".to_string(),
            registered_on: date(2024, 1, 20),
            status: ClientStatus::Pendiente,
        },
        Client {
            id: 4,
            name: "Consultoría Global XYZ".to_string(),
            email: "info@globalxyz.com".to_string(),
            phone: "945678901".to_string(),
            registered_on: date(2024, 3, 5),
            status: ClientStatus::Inactivo,
        },
        Client {
            id: 5,
            name: "Marketing Digital Pro".to_string(),
            email: "hello@mktpro.co".to_string(),
            phone: "654321098".to_string(),
            registered_on: date(2024, 5, 10),
            status: ClientStatus::Activo,
        },
        Client {
            id: 6,
            name: "Constructora Alfa".to_string(),
            email: "obra@alfa.com".to_string(),
            phone: "611223344".to_string(),
            registered_on: date(2024, 7, 1),
            status: ClientStatus::Activo,
        },
    ]
}

pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: 1,
            name: "Lucía Romero".to_string(),
            email: "lucia@innovadora.com".to_string(),
            phone: "612345678".to_string(),
            company: "Empresa Innovadora S.L.".to_string(),
            status: ContactStatus::Activo,
            client_id: 1,
            user_id: DEFAULT_USER_ID,
        },
        Contact {
            id: 2,
            name: "Marcos Vidal".to_string(),
            email: "marcos@rapidas.es".to_string(),
            phone: "699887766".to_string(),
            company: "Distribuciones Rápidas C.A.".to_string(),
            status: ContactStatus::Potencial,
            client_id: 2,
            user_id: DEFAULT_USER_ID,
        },
        Contact {
            id: 3,
            name: "Elena Ortiz".to_string(),
            email: "elena@globalxyz.com".to_string(),
            phone: "655443322".to_string(),
            company: "Consultoría Global XYZ".to_string(),
            status: ContactStatus::Inactivo,
            client_id: 4,
            user_id: DEFAULT_USER_ID,
        },
    ]
}

pub fn sample_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: 1,
            subject: "Llamar para renovar contrato".to_string(),
            notes: "Cliente interesado en ampliar licencias".to_string(),
            kind: ActivityKind::Llamada,
            status: ActivityStatus::Pendiente,
            priority: Some(Priority::Alta),
            due_date: Some(date(2025, 1, 10)),
            client_id: Some(1),
            user_id: DEFAULT_USER_ID,
            client_name: "Empresa Innovadora S.L.".to_string(),
        },
        Activity {
            id: 2,
            subject: "Enviar propuesta comercial".to_string(),
            notes: String::new(),
            kind: ActivityKind::Correo,
            status: ActivityStatus::EnProgreso,
            priority: Some(Priority::Media),
            due_date: Some(date(2025, 1, 20)),
            client_id: Some(2),
            user_id: DEFAULT_USER_ID,
            client_name: "Distribuciones Rápidas C.A.".to_string(),
        },
        Activity {
            id: 3,
            subject: "Reunión de seguimiento trimestral".to_string(),
            notes: String::new(),
            kind: ActivityKind::Reunion,
            status: ActivityStatus::Pendiente,
            priority: Some(Priority::Baja),
            due_date: Some(date(2025, 3, 1)),
            client_id: Some(5),
            user_id: DEFAULT_USER_ID,
            client_name: "Marketing Digital Pro".to_string(),
        },
        Activity {
            id: 4,
            subject: "Preparar informe de incidencias".to_string(),
            notes: String::new(),
            kind: ActivityKind::Tarea,
            status: ActivityStatus::Completada,
            priority: Some(Priority::Alta),
            due_date: Some(date(2024, 12, 15)),
            client_id: None,
            user_id: DEFAULT_USER_ID,
            client_name: String::new(),
        },
    ]
}

pub fn sample_opportunities() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: 1,
            name: "Implantación CRM completa".to_string(),
            stage: Stage::Propuesta,
            amount: 24000.0,
            start_date: date(2024, 11, 1),
            close_date: date(2025, 2, 28),
            client_id: Some(1),
            user_id: Some(DEFAULT_USER_ID),
        },
        Opportunity {
            id: 2,
            name: "Ampliación de licencias".to_string(),
            stage: Stage::CerradaGanada,
            amount: 8500.0,
            start_date: date(2024, 9, 15),
            close_date: date(2024, 12, 20),
            client_id: Some(2),
            user_id: Some(DEFAULT_USER_ID),
        },
        Opportunity {
            id: 3,
            name: "Consultoría de datos".to_string(),
            stage: Stage::CerradaPerdida,
            amount: 15000.0,
            start_date: date(2024, 8, 1),
            close_date: date(2024, 11, 30),
            client_id: Some(4),
            user_id: Some(DEFAULT_USER_ID),
        },
        Opportunity {
            id: 4,
            name: "Soporte premium anual".to_string(),
            stage: Stage::Negociacion,
            amount: 6200.0,
            start_date: date(2025, 1, 5),
            close_date: date(2025, 3, 31),
            client_id: Some(6),
            user_id: Some(DEFAULT_USER_ID),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MockGateway<Client> {
        MockGateway::with_records(sample_clients())
            .with_latency(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn create_assigns_the_next_server_id() {
        let gw = gateway();
        let mut draft = sample_clients().remove(0);
        draft.id = 0;
        draft.name = "Nueva Empresa".to_string();

        let created = gw.create(&draft).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(gw.records().len(), 7);
    }

    #[tokio::test]
    async fn update_of_vanished_id_is_not_found() {
        let gw = gateway();
        let mut ghost = sample_clients().remove(0);
        ghost.id = 99;
        let err = gw.update(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn fail_next_fails_exactly_once() {
        let gw = gateway();
        gw.fail_next("connection reset");
        assert!(matches!(
            gw.list().await.unwrap_err(),
            CrmError::Gateway(GatewayError::Unavailable(_))
        ));
        assert_eq!(gw.list().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let gw = gateway();
        gw.delete(3).await.unwrap();
        assert_eq!(gw.records().len(), 5);
        assert!(gw.delete(3).await.unwrap_err().is_not_found());
    }
}
