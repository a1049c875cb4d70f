//! Acta (custody record) workflow.
//!
//! Writes go straight to the backend and invalidate the inventory snapshot,
//! since assigning or confirming an acta changes item status. Downloads
//! probe the public acta locations in turn.

use std::sync::Arc;

use actasti_core::normalize::find_list;
use actasti_core::EndpointProber;
use actasti_domain::constants::{
    ACTAS_PUBLIC_PATH, ACTA_NOT_FOUND_MESSAGE, CONFIRM_ASSIGNMENT_PATH, MOVEMENTS_PATH,
    NOTIFY_ASSIGNMENT_PATH, REACTIVATE_ASSIGNMENT_PATH,
};
use actasti_domain::{
    acta_file_name, ActaDocument, ActaNotification, ActasError, ConfirmationOutcome,
    ConfirmationRequest, Movement, Result,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};
use url::Url;

use super::inventory::InventoryService;
use crate::api::ApiClient;

/// Body and content type of a downloaded document.
type DocumentPayload = (Vec<u8>, Option<String>);

const CONFIRMED_MESSAGE: &str = "Asignación procesada";
const REACTIVATED_MESSAGE: &str = "Asignación reactivada";

pub struct ActasService {
    client: Arc<ApiClient>,
    inventory: Arc<InventoryService>,
}

impl ActasService {
    pub fn new(client: Arc<ApiClient>, inventory: Arc<InventoryService>) -> Self {
        Self { client, inventory }
    }

    /// Create an acta and notify the responsible user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an acta without responsible user or
    /// assets, or the mapped API error.
    #[instrument(skip(self, acta), fields(responsible = %acta.responsable.usuario))]
    pub async fn notify(&self, acta: &ActaNotification) -> Result<Value> {
        acta.validate()?;
        let response = self.client.post_json(NOTIFY_ASSIGNMENT_PATH, acta).await?;
        self.inventory.invalidate();

        info!(assets = acta.activos.len(), "Acta notified");
        Ok(response)
    }

    /// Record the answer carried by an approval link.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    #[instrument(skip(self, request), fields(respuesta = %request.respuesta))]
    pub async fn confirm(&self, request: &ConfirmationRequest) -> Result<ConfirmationOutcome> {
        let response = self.client.post_json(CONFIRM_ASSIGNMENT_PATH, request).await?;
        self.inventory.invalidate();

        Ok(outcome(&response, CONFIRMED_MESSAGE))
    }

    /// Reopen a rejected assignment.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    #[instrument(skip(self))]
    pub async fn reactivate(&self, asignacion_id: i64) -> Result<ConfirmationOutcome> {
        let body = json!({ "asignacionId": asignacion_id });
        let response = self.client.post_json(REACTIVATE_ASSIGNMENT_PATH, &body).await?;
        self.inventory.invalidate();

        Ok(outcome(&response, REACTIVATED_MESSAGE))
    }

    /// Movement history, newest first.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    #[instrument(skip(self))]
    pub async fn movements(&self) -> Result<Vec<Movement>> {
        let payload = self.client.get_json(MOVEMENTS_PATH, &[]).await?;
        Ok(group_movements(&payload))
    }

    /// Download the signed PDF of an acta.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unsafe file name, `NotFound` when no
    /// public location serves the document, or an aborting API error.
    #[instrument(skip(self))]
    pub async fn download_acta(&self, stored_path: &str) -> Result<ActaDocument> {
        let file_name = acta_file_name(stored_path)?;
        let urls = acta_candidates(self.client.base_url(), &file_name);
        let client = &self.client;

        let prober = EndpointProber::<DocumentPayload>::new(format!("acta {file_name}"))
            .not_found_message(ACTA_NOT_FOUND_MESSAGE);
        let prober = urls.into_iter().fold(prober, |prober, url| {
            let label = url.to_string();
            prober.candidate(label, move || async move {
                client.get_bytes(url).await.map_err(ActasError::from)
            })
        });

        let document = prober
            .resolve(|(bytes, content_type): DocumentPayload| {
                let document = ActaDocument { file_name: file_name.clone(), content_type, bytes };
                if document.bytes.is_empty() || document.looks_like_text_error() {
                    return Err(ActasError::ShapeMismatch(format!(
                        "{} is not a document",
                        document.file_name
                    )));
                }
                Ok(document)
            })
            .await?;

        debug!(bytes = document.bytes.len(), "Acta downloaded");
        Ok(document)
    }
}

fn outcome(response: &Value, fallback: &str) -> ConfirmationOutcome {
    let message = ["/message", "/error/message", "/mensaje"]
        .iter()
        .find_map(|pointer| response.pointer(pointer).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(fallback);

    ConfirmationOutcome { message: message.to_string() }
}

/// Public acta locations, in order and without duplicates: under the API
/// base, under the API origin, and under the origin plus the API path.
fn acta_candidates(api_base: &Url, file_name: &str) -> Vec<Url> {
    let encoded = urlencoding::encode(file_name);
    let api = api_base.as_str().trim_end_matches('/');
    let origin = api_base.origin().ascii_serialization();
    let api_path = api_base.path().trim_end_matches('/');

    let raw = [
        format!("{api}{ACTAS_PUBLIC_PATH}/{encoded}"),
        format!("{origin}{ACTAS_PUBLIC_PATH}/{encoded}"),
        format!("{origin}{api_path}{ACTAS_PUBLIC_PATH}/{encoded}"),
    ];

    let mut urls: Vec<Url> = Vec::with_capacity(raw.len());
    for candidate in raw {
        match Url::parse(&candidate) {
            Ok(url) if !urls.contains(&url) => urls.push(url),
            Ok(_) => {}
            Err(err) => debug!(candidate, error = %err, "Skipping invalid acta URL"),
        }
    }
    urls
}

/// Flatten backend groups to their first row, newest id first.
fn group_movements(payload: &Value) -> Vec<Movement> {
    let Some((_, groups)) = find_list(payload) else {
        return Vec::new();
    };

    let mut movements: Vec<Movement> = groups
        .iter()
        .filter_map(|group| {
            let elementos = match group {
                Value::Array(rows) => rows.clone(),
                Value::Object(_) => vec![group.clone()],
                _ => return None,
            };
            let row = elementos.first()?.clone();
            let id = match row.get("id") {
                Some(Value::Number(n)) => n.as_i64(),
                Some(Value::String(s)) => s.trim().parse().ok(),
                _ => None,
            };
            Some(Movement { id, row, elementos })
        })
        .collect();

    movements.sort_by(|a, b| b.id.cmp(&a.id));
    movements
}
