//! Acta (custody record) types
//!
//! Payloads for the assignment workflow: creating an acta, confirming or
//! rejecting it from an emailed link, the movement history and the signed
//! PDF document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::MAX_CONFIRMATION_TOKEN_LENGTH;
use crate::errors::{ActasError, Result};
use crate::impl_wire_enum_conversions;

/// Person made responsible for the items of an acta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Responsible {
    pub usuario: String,
    pub nombre: String,
    pub cedula: String,
    pub cargo: Option<String>,
    pub correo: Option<String>,
}

/// One asset included in an acta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActaItem {
    pub serial: String,
    pub placa: String,
    pub placa_ax: Option<String>,
    pub tipo: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}

/// Where the assigned assets end up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActaLocation {
    pub tienda: Option<i64>,
    pub estado: Option<String>,
    pub ubicacion: Option<String>,
}

/// Body of the act-creation write
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActaNotification {
    pub responsable: Responsible,
    pub activos: Vec<ActaItem>,
    pub ubicacion: ActaLocation,
}

impl ActaNotification {
    /// Check the acta can be submitted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when there is no responsible user or no asset.
    pub fn validate(&self) -> Result<()> {
        if self.responsable.usuario.trim().is_empty() {
            return Err(ActasError::InvalidInput("acta has no responsible user".into()));
        }
        if self.activos.is_empty() {
            return Err(ActasError::InvalidInput("acta has no assets".into()));
        }
        Ok(())
    }
}

/// Answer given through an approval link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalResponse {
    Aprobado,
    Rechazado,
}

impl_wire_enum_conversions!(ApprovalResponse {
    Aprobado => "aprobado",
    Rechazado => "rechazado",
});

impl Serialize for ApprovalResponse {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Body of the confirmation write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationRequest {
    pub token: String,
    pub respuesta: ApprovalResponse,
    pub notificacion: bool,
}

impl ConfirmationRequest {
    /// Validate the raw values carried by an approval link.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a missing or oversized token, or a
    /// response other than `aprobado`/`rechazado`.
    pub fn from_link(token: Option<&str>, respuesta: Option<&str>) -> Result<Self> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(invalid_link)?;
        if token.len() > MAX_CONFIRMATION_TOKEN_LENGTH {
            return Err(invalid_link());
        }
        let respuesta = respuesta
            .and_then(|r| r.parse::<ApprovalResponse>().ok())
            .ok_or_else(invalid_link)?;

        Ok(Self { token: token.to_string(), respuesta, notificacion: true })
    }
}

fn invalid_link() -> ActasError {
    ActasError::InvalidInput("Enlace inválido o incompleto".into())
}

/// Outcome reported by the backend for a confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationOutcome {
    pub message: String,
}

/// One entry of the movement history
///
/// The backend groups rows belonging to the same acta; `row` is the first
/// row of the group and `elementos` the whole group.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub id: Option<i64>,
    pub row: Value,
    pub elementos: Vec<Value>,
}

/// Downloaded acta document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActaDocument {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ActaDocument {
    /// Whether the payload is really an error page served with a 2xx status.
    pub fn looks_like_text_error(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text") || ct.contains("json")
        })
    }
}

/// Reduce a stored acta path to a safe file name.
///
/// # Errors
///
/// Returns `InvalidInput` unless the last path segment is non-empty and made
/// only of ASCII letters, digits, `.`, `_` and `-`.
pub fn acta_file_name(path: &str) -> Result<String> {
    let candidate = path.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if candidate.is_empty() || !candidate.chars().all(allowed) {
        return Err(ActasError::InvalidInput(format!("invalid acta file name: {path}")));
    }
    Ok(candidate.to_string())
}

/// Filter for dashboard statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub tienda_id: Option<i64>,
    pub estados: Vec<String>,
}

impl DashboardFilter {
    /// Query pairs in backend order; `estados` repeats once per value.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.tienda_id.filter(|id| *id != 0) {
            pairs.push(("tiendaId".to_string(), id.to_string()));
        }
        pairs.extend(self.estados.iter().map(|e| ("estados".to_string(), e.clone())));
        pairs
    }
}
