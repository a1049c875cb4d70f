//! Inventory types
//!
//! Items come from a backend whose exact field layout is not known in
//! advance, so every attribute is optional and the identity of an item is
//! derived from its content rather than from a database id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::store::StoreRef;
use super::user::UserId;
use crate::impl_wire_enum_conversions;

/// Hardware asset tracked by the inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Option<i64>,
    pub serial: Option<String>,
    pub placa: Option<String>,
    pub placa_ax: Option<String>,
    pub tipo: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    /// Free-form status; valid values are whatever the backend reports
    pub estado: Option<String>,
    pub tienda: Option<StoreRef>,
    pub usuario: Option<AssignedUser>,
    /// Compact JSON of the source row, the identity of items carrying
    /// neither serial nor placa
    #[serde(skip)]
    pub raw_key: Option<String>,
}

/// User an inventory item is currently assigned to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedUser {
    pub id: Option<UserId>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

/// Uniqueness key of an inventory item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InventoryKey {
    Serial(String),
    Placa(String),
    /// Source row serialization, for items exposing no identifying field
    Structural(String),
}

impl InventoryKey {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Serial(value) | Self::Placa(value) | Self::Structural(value) => value,
        }
    }
}

impl fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl InventoryItem {
    /// Uniqueness key: trimmed serial, else trimmed placa, else the source
    /// row, else the serialization of the item itself.
    pub fn key(&self) -> InventoryKey {
        if let Some(serial) = non_blank(self.serial.as_deref()) {
            return InventoryKey::Serial(serial.to_string());
        }
        if let Some(placa) = non_blank(self.placa.as_deref()) {
            return InventoryKey::Placa(placa.to_string());
        }
        let structural = self.raw_key.clone().unwrap_or_else(|| {
            serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
        });
        InventoryKey::Structural(structural)
    }

    /// Value of a lookup field, trimmed.
    pub fn field(&self, field: InventoryField) -> Option<&str> {
        let value = match field {
            InventoryField::Serial => self.serial.as_deref(),
            InventoryField::Placa => self.placa.as_deref(),
            InventoryField::PlacaAx => self.placa_ax.as_deref(),
        };
        non_blank(value)
    }

    /// Case-insensitive exact match on one lookup field.
    pub fn matches_field(&self, field: InventoryField, value: &str) -> bool {
        let wanted = value.trim();
        !wanted.is_empty()
            && self.field(field).is_some_and(|own| own.eq_ignore_ascii_case(wanted))
    }

    /// Whether any identifying field equals `value`, case-insensitively.
    pub fn matches_identifier(&self, value: &str) -> bool {
        [InventoryField::Serial, InventoryField::Placa, InventoryField::PlacaAx]
            .into_iter()
            .any(|field| self.matches_field(field, value))
    }

    /// Free-text search over model, serial and the assigned user.
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let contains = |value: Option<&str>| {
            value.is_some_and(|v| v.to_lowercase().contains(&term))
        };
        let assigned = self.usuario.as_ref();
        contains(self.modelo.as_deref())
            || contains(self.serial.as_deref())
            || contains(assigned.and_then(|u| u.name.as_deref()))
            || contains(assigned.and_then(|u| u.username.as_deref()))
    }
}

/// Field an item can be looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryField {
    Serial,
    Placa,
    PlacaAx,
}

impl_wire_enum_conversions!(InventoryField {
    Serial => "serial",
    Placa => "placa",
    PlacaAx => "placaAx",
});

/// One inventory response together with its declared capacity hints
///
/// `total` and `limit` are advisory; the pagination layer never trusts them
/// without checking them against what the backend actually returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryEnvelope {
    pub items: Vec<InventoryItem>,
    pub total: Option<usize>,
    pub limit: Option<usize>,
}

impl InventoryEnvelope {
    /// Whether the declared total is already satisfied.
    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.items.len() >= total)
    }
}
