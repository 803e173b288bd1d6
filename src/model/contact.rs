//! Contact entity and its wire DTO

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::model::{require, wire_enum, Record};

/// User attached to contacts created without an explicit owner.
pub const DEFAULT_USER_ID: i64 = 1;

wire_enum! {
    /// Contact relationship status.
    ContactStatus {
        Activo => "ACTIVO", "Activo", Success;
        Potencial => "POTENCIAL", "Potencial", Warning;
        Inactivo => "INACTIVO", "Inactivo", Danger;
    }
}

/// UI-facing contact record.
///
/// The backend reuses the `cargo` column for the company name, so `company`
/// maps to `cargo` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: ContactStatus,
    pub client_id: i64,
    pub user_id: i64,
}

/// Wire DTO for the `/contactos` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactDto {
    #[serde(rename = "idContacto", default)]
    pub id_contacto: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub cargo: String,
    pub estado: String,
    #[serde(rename = "idCliente")]
    pub id_cliente: i64,
    #[serde(rename = "idUsuario")]
    pub id_usuario: Option<i64>,
}

impl Record for Contact {
    type Dto = ContactDto;

    const ENTITY: &'static str = "contact";
    const WIRE_PATH: &'static str = "contactos";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_dto(dto: ContactDto) -> Result<Self, ValidationError> {
        let status = ContactStatus::from_wire(&dto.estado)
            .ok_or_else(|| ValidationError::unknown_value("estado", &dto.estado))?;

        Ok(Self {
            id: dto.id_contacto,
            name: dto.nombre,
            email: dto.email,
            phone: dto.telefono,
            company: dto.cargo,
            status,
            client_id: dto.id_cliente,
            user_id: dto.id_usuario.unwrap_or(DEFAULT_USER_ID),
        })
    }

    fn to_dto(&self) -> ContactDto {
        ContactDto {
            id_contacto: self.id,
            nombre: self.name.clone(),
            email: self.email.clone(),
            telefono: self.phone.clone(),
            cargo: self.company.clone(),
            estado: self.status.wire().to_string(),
            id_cliente: self.client_id,
            id_usuario: Some(self.user_id),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("nombre", &self.name)?;
        require("email", &self.email)?;
        if self.client_id <= 0 {
            return Err(ValidationError::missing("idCliente"));
        }
        Ok(())
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.company]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> ContactDto {
        ContactDto {
            id_contacto: 7,
            nombre: "Lucía Romero".to_string(),
            email: "lucia@innovadora.com".to_string(),
            telefono: "612345678".to_string(),
            cargo: "Empresa Innovadora S.L.".to_string(),
            estado: "POTENCIAL".to_string(),
            id_cliente: 1,
            id_usuario: Some(2),
        }
    }

    #[test]
    fn dto_round_trip() {
        let dto = sample_dto();
        let contact = Contact::from_dto(dto.clone()).unwrap();
        assert_eq!(contact.company, "Empresa Innovadora S.L.");
        assert_eq!(contact.to_dto(), dto);
        assert_eq!(Contact::from_dto(contact.to_dto()).unwrap(), contact);
    }

    #[test]
    fn absent_user_defaults() {
        let mut dto = sample_dto();
        dto.id_usuario = None;
        let contact = Contact::from_dto(dto).unwrap();
        assert_eq!(contact.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn missing_client_relation_is_rejected() {
        let mut contact = Contact::from_dto(sample_dto()).unwrap();
        contact.client_id = 0;
        assert_eq!(contact.validate().unwrap_err().field, "idCliente");
    }
}
