//! Opportunity entity and its wire DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::model::{require, wire_enum, Record};

wire_enum! {
    /// Sales pipeline stage.
    Stage {
        Prospeccion => "PROSPECCION", "Prospección", Neutral;
        Calificacion => "CALIFICACION", "Calificación", Neutral;
        Propuesta => "PROPUESTA", "Propuesta", Warning;
        Negociacion => "NEGOCIACION", "Negociación", Warning;
        CerradaGanada => "CERRADA_GANADA", "Cerrada ganada", Success;
        CerradaPerdida => "CERRADA_PERDIDA", "Cerrada perdida", Danger;
    }
}

impl Stage {
    /// Stages still in play (not closed either way).
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::CerradaGanada | Self::CerradaPerdida)
    }
}

/// UI-facing opportunity record.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub id: i64,
    pub name: String,
    pub stage: Stage,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub close_date: NaiveDate,
    pub client_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Wire DTO for the `/oportunidades` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpportunityDto {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub stage: String,
    pub amount: f64,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "closeDate")]
    pub close_date: NaiveDate,
    #[serde(rename = "idCliente")]
    pub id_cliente: Option<i64>,
    #[serde(rename = "idUsuario")]
    pub id_usuario: Option<i64>,
}

impl Record for Opportunity {
    type Dto = OpportunityDto;

    const ENTITY: &'static str = "opportunity";
    const WIRE_PATH: &'static str = "oportunidades";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_dto(dto: OpportunityDto) -> Result<Self, ValidationError> {
        let stage = Stage::from_wire(&dto.stage)
            .ok_or_else(|| ValidationError::unknown_value("stage", &dto.stage))?;

        Ok(Self {
            id: dto.id,
            name: dto.name,
            stage,
            amount: dto.amount,
            start_date: dto.start_date,
            close_date: dto.close_date,
            client_id: dto.id_cliente,
            user_id: dto.id_usuario,
        })
    }

    fn to_dto(&self) -> OpportunityDto {
        OpportunityDto {
            id: self.id,
            name: self.name.clone(),
            stage: self.stage.wire().to_string(),
            amount: self.amount,
            start_date: self.start_date,
            close_date: self.close_date,
            id_cliente: self.client_id,
            id_usuario: self.user_id,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        if self.amount < 0.0 {
            return Err(ValidationError::new("amount", "amount cannot be negative"));
        }
        Ok(())
    }

    fn status_label(&self) -> &'static str {
        self.stage.label()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}
