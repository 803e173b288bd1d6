//! Activity (task) entity and its wire DTO
//!
//! Activities are the one collection with an explicit default ordering:
//! priority rank, then due date, then id. See [`crate::query::sort_activities`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::model::{require, wire_enum, Record};

wire_enum! {
    /// Activity progress status.
    ActivityStatus {
        Pendiente => "PENDIENTE", "Pendiente", Neutral;
        EnProgreso => "EN_PROGRESO", "En Progreso", Warning;
        Completada => "COMPLETADA", "Completada", Success;
    }
}

wire_enum! {
    /// Activity priority driving the default sort order.
    Priority {
        Alta => "ALTA", "Alta", Danger;
        Media => "MEDIA", "Media", Warning;
        Baja => "BAJA", "Baja", Neutral;
    }
}

wire_enum! {
    /// Kind of activity.
    ActivityKind {
        Llamada => "LLAMADA", "Llamada", Neutral;
        Reunion => "REUNION", "Reunión", Neutral;
        Correo => "CORREO", "Correo", Neutral;
        Tarea => "TAREA", "Tarea", Neutral;
    }
}

impl Priority {
    /// Sort rank: Alta first. An absent priority sorts last at rank 99.
    pub const fn rank(priority: Option<Self>) -> u8 {
        match priority {
            Some(Self::Alta) => 1,
            Some(Self::Media) => 2,
            Some(Self::Baja) => 3,
            None => 99,
        }
    }
}

/// UI-facing activity record.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub subject: String,
    /// Free-form notes; empty when the backend sends none.
    pub notes: String,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub client_id: Option<i64>,
    pub user_id: i64,
    /// Response-only denormalized client name; empty when absent.
    pub client_name: String,
}

/// Wire DTO for the `/api/tareas` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityDto {
    #[serde(rename = "idTarea", default)]
    pub id_tarea: i64,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub tipo: Option<String>,
    pub estado: Option<String>,
    pub prioridad: Option<String>,
    #[serde(rename = "fechaVencimiento")]
    pub fecha_vencimiento: Option<NaiveDate>,
    #[serde(rename = "idCliente")]
    pub id_cliente: Option<i64>,
    #[serde(rename = "idUsuario")]
    pub id_usuario: Option<i64>,
    #[serde(rename = "nombreCliente")]
    pub nombre_cliente: Option<String>,
}

impl Record for Activity {
    type Dto = ActivityDto;

    const ENTITY: &'static str = "activity";
    const WIRE_PATH: &'static str = "api/tareas";
    const ORDERED: bool = true;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_dto(dto: ActivityDto) -> Result<Self, ValidationError> {
        // Absent kind/status default (Tarea, Pendiente); a present but
        // unknown value is contract drift and must fail.
        let kind = match dto.tipo.as_deref() {
            None => ActivityKind::Tarea,
            Some(raw) => ActivityKind::from_wire(raw)
                .ok_or_else(|| ValidationError::unknown_value("tipo", raw))?,
        };
        let status = match dto.estado.as_deref() {
            None => ActivityStatus::Pendiente,
            Some(raw) => ActivityStatus::from_wire(raw)
                .ok_or_else(|| ValidationError::unknown_value("estado", raw))?,
        };
        let priority = match dto.prioridad.as_deref() {
            None => None,
            Some(raw) => Some(
                Priority::from_wire(raw)
                    .ok_or_else(|| ValidationError::unknown_value("prioridad", raw))?,
            ),
        };

        Ok(Self {
            id: dto.id_tarea,
            subject: dto.titulo,
            notes: dto.descripcion.unwrap_or_default(),
            kind,
            status,
            priority,
            due_date: dto.fecha_vencimiento,
            client_id: dto.id_cliente,
            user_id: dto.id_usuario.unwrap_or(super::DEFAULT_USER_ID),
            client_name: dto.nombre_cliente.unwrap_or_default(),
        })
    }

    fn to_dto(&self) -> ActivityDto {
        ActivityDto {
            id_tarea: self.id,
            titulo: self.subject.clone(),
            descripcion: Some(self.notes.clone()),
            tipo: Some(self.kind.wire().to_string()),
            estado: Some(self.status.wire().to_string()),
            prioridad: self.priority.map(|p| p.wire().to_string()),
            fecha_vencimiento: self.due_date,
            id_cliente: self.client_id,
            id_usuario: Some(self.user_id),
            nombre_cliente: Some(self.client_name.clone()),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("titulo", &self.subject)?;
        Ok(())
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.subject, &self.client_name, &self.notes]
    }

    fn reorder(items: Vec<Self>) -> Vec<Self> {
        crate::query::sort_activities(items)
    }
}

impl Activity {
    /// One-call transition to `Completada`, routed through the normal update
    /// path by the controller.
    pub fn completed(mut self) -> Self {
        self.status = ActivityStatus::Completada;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> ActivityDto {
        ActivityDto {
            id_tarea: 11,
            titulo: "Llamar al cliente".to_string(),
            descripcion: Some("Seguimiento de la propuesta".to_string()),
            tipo: Some("LLAMADA".to_string()),
            estado: Some("EN_PROGRESO".to_string()),
            prioridad: Some("ALTA".to_string()),
            fecha_vencimiento: NaiveDate::from_ymd_opt(2025, 2, 14),
            id_cliente: Some(4),
            id_usuario: Some(1),
            nombre_cliente: Some("Consultoría Global XYZ".to_string()),
        }
    }

    #[test]
    fn dto_round_trip() {
        let dto = sample_dto();
        let activity = Activity::from_dto(dto.clone()).unwrap();
        assert_eq!(activity.to_dto(), dto);
        assert_eq!(Activity::from_dto(activity.to_dto()).unwrap(), activity);
    }

    #[test]
    fn optional_fields_receive_documented_defaults() {
        let dto = ActivityDto {
            id_tarea: 1,
            titulo: "Revisar contrato".to_string(),
            descripcion: None,
            tipo: None,
            estado: None,
            prioridad: None,
            fecha_vencimiento: None,
            id_cliente: None,
            id_usuario: None,
            nombre_cliente: None,
        };
        let activity = Activity::from_dto(dto).unwrap();
        assert_eq!(activity.kind, ActivityKind::Tarea);
        assert_eq!(activity.status, ActivityStatus::Pendiente);
        assert_eq!(activity.priority, None);
        assert_eq!(activity.notes, "");
        assert_eq!(activity.user_id, super::super::DEFAULT_USER_ID);
    }

    #[test]
    fn present_but_unknown_priority_fails() {
        let mut dto = sample_dto();
        dto.prioridad = Some("URGENTE".to_string());
        assert_eq!(Activity::from_dto(dto).unwrap_err().field, "prioridad");
    }

    #[test]
    fn priority_ranks() {
        assert_eq!(Priority::rank(Some(Priority::Alta)), 1);
        assert_eq!(Priority::rank(Some(Priority::Media)), 2);
        assert_eq!(Priority::rank(Some(Priority::Baja)), 3);
        assert_eq!(Priority::rank(None), 99);
    }

    #[test]
    fn completed_transition() {
        let activity = Activity::from_dto(sample_dto()).unwrap().completed();
        assert_eq!(activity.status, ActivityStatus::Completada);
    }
}
