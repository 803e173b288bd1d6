//! Client entity and its wire DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::model::{require, wire_enum, Record};

wire_enum! {
    /// Client lifecycle status.
    ClientStatus {
        Activo => "ACTIVO", "Activo", Success;
        Inactivo => "INACTIVO", "Inactivo", Danger;
        Pendiente => "PENDIENTE", "Pendiente", Warning;
    }
}

/// UI-facing client record.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub registered_on: NaiveDate,
    pub status: ClientStatus,
}

/// Wire DTO for the `/clientes` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientDto {
    #[serde(default)]
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    #[serde(rename = "fechaRegistro")]
    pub fecha_registro: Option<NaiveDate>,
    pub estado: String,
}

impl Record for Client {
    type Dto = ClientDto;

    const ENTITY: &'static str = "client";
    const WIRE_PATH: &'static str = "clientes";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_dto(dto: ClientDto) -> Result<Self, ValidationError> {
        let status = ClientStatus::from_wire(&dto.estado)
            .ok_or_else(|| ValidationError::unknown_value("estado", &dto.estado))?;
        let registered_on = dto
            .fecha_registro
            .ok_or_else(|| ValidationError::missing("fechaRegistro"))?;

        Ok(Self {
            id: dto.id,
            name: dto.nombre,
            email: dto.email,
            phone: dto.telefono,
            registered_on,
            status,
        })
    }

    fn to_dto(&self) -> ClientDto {
        ClientDto {
            id: self.id,
            nombre: self.name.clone(),
            email: self.email.clone(),
            telefono: self.phone.clone(),
            fecha_registro: Some(self.registered_on),
            estado: self.status.wire().to_string(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("nombre", &self.name)?;
        require("email", &self.email)?;
        Ok(())
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.phone]
    }
}
