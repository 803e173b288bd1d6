//! CRM records, their wire DTOs, and the enum wire/label mappings
//!
//! Each entity module declares three things: the UI-facing record, the wire
//! DTO with the backend's field names, and the `from_dto`/`to_dto` mapping
//! between them. Enumerated fields are declared once per enum through
//! [`wire_enum!`], which generates both translation directions from a single
//! table so the list/create/update paths cannot drift apart.

mod activity;
mod client;
mod contact;
mod opportunity;

pub use activity::{Activity, ActivityDto, ActivityKind, ActivityStatus, Priority};
pub use client::{Client, ClientDto, ClientStatus};
pub use contact::{Contact, ContactDto, ContactStatus, DEFAULT_USER_ID};
pub use opportunity::{Opportunity, OpportunityDto, Stage};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ValidationError;

/// Visual weight of a status badge, derived from the enum value.
///
/// Replaces the per-component CSS-class switches of the UI layer with one
/// classification the presentation can key off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Declarative wire/label table for an enumerated field.
///
/// One row per variant: `Variant => "WIRE", "Label", Severity;`. Generates
/// `from_wire`/`wire` (backend casing), `from_label`/`label` (UI casing),
/// `badge`, `ALL` and a `Display` that prints the label. Both directions are
/// total over the table; anything else is rejected by the caller as a
/// [`ValidationError`].
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal, $label:literal, $severity:ident;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Parse the backend's wire casing.
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Parse the UI-facing label.
            pub fn from_label(value: &str) -> Option<Self> {
                match value {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Backend wire casing.
            pub const fn wire(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// UI-facing label.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Badge classification for this value.
            pub const fn badge(self) -> crate::model::Severity {
                match self {
                    $(Self::$variant => crate::model::Severity::$severity,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub(crate) use wire_enum;

/// A CRM record: the UI-facing shape of one entity, mappable to and from its
/// wire DTO.
///
/// `from_dto` and `to_dto` are pure and total over the declared field sets:
/// unknown enum values and missing required fields fail with a
/// [`ValidationError`] naming the field, while truly optional fields receive
/// the documented defaults so "missing" never leaks into sort or filter
/// logic.
pub trait Record: Clone + Send + Sync + 'static {
    /// Wire-format representation exchanged with the backend.
    type Dto: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Entity kind for error messages and logs, e.g. `"client"`.
    const ENTITY: &'static str;

    /// Path segment of the backend endpoint, e.g. `"clientes"`.
    const WIRE_PATH: &'static str;

    /// Whether the collection carries an explicit default ordering that must
    /// be re-applied after mutations (activities do, the rest keep insertion
    /// order).
    const ORDERED: bool = false;

    /// Server-assigned identifier; 0 for records not yet created.
    fn id(&self) -> i64;

    /// Map a wire DTO into the record.
    fn from_dto(dto: Self::Dto) -> Result<Self, ValidationError>;

    /// Map the record back into its wire DTO.
    fn to_dto(&self) -> Self::Dto;

    /// Presence checks for required fields, run by the gateway before any
    /// transport call.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Label of the status-like field, used by the status filter.
    fn status_label(&self) -> &'static str;

    /// Free-text fields searched by the list filter.
    fn search_fields(&self) -> Vec<&str>;

    /// Re-apply the collection's default ordering. Identity unless
    /// [`Record::ORDERED`] is set.
    fn reorder(items: Vec<Self>) -> Vec<Self> {
        items
    }
}

/// Reject empty or whitespace-only required string fields.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_and_label_are_inverse() {
        for status in ClientStatus::ALL {
            assert_eq!(ClientStatus::from_wire(status.wire()), Some(*status));
            assert_eq!(ClientStatus::from_label(status.label()), Some(*status));
        }
        for stage in Stage::ALL {
            assert_eq!(Stage::from_wire(stage.wire()), Some(*stage));
            assert_eq!(Stage::from_label(stage.label()), Some(*stage));
        }
    }

    #[test]
    fn unknown_wire_value_is_rejected() {
        assert_eq!(ClientStatus::from_wire("Activo"), None);
        assert_eq!(Priority::from_wire("URGENTE"), None);
    }

    #[test]
    fn display_prints_the_label() {
        assert_eq!(ActivityStatus::EnProgreso.to_string(), "En Progreso");
        assert_eq!(Stage::CerradaGanada.to_string(), "Cerrada ganada");
    }

    #[test]
    fn badge_classification() {
        assert_eq!(ClientStatus::Activo.badge(), Severity::Success);
        assert_eq!(ContactStatus::Potencial.badge(), Severity::Warning);
        assert_eq!(Priority::Alta.badge(), Severity::Danger);
        assert_eq!(Stage::CerradaPerdida.badge(), Severity::Danger);
        assert_eq!(ActivityKind::Llamada.badge(), Severity::Neutral);
    }
}
