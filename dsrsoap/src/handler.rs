//! Handlers Axum du récepteur de callbacks
//!
//! - `POST` sur n'importe quel chemin : traitement d'une enveloppe SOAP
//! - `GET /` et `GET /health` : état du service en JSON
//!
//! Les réponses :
//!
//! | Cas                              | Statut | Corps                        |
//! |----------------------------------|--------|------------------------------|
//! | Enveloppe valide                 | 200    | acquittement SOAP            |
//! | XML invalide / Content-Type      | 400    | texte brut                   |
//! | Panique pendant le traitement    | 500    | texte brut                   |

use crate::builder::SOAP_CONTENT_TYPE;
use crate::dispatch::handle_soap_request;
use crate::sink::NotificationSink;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Content-Types acceptés pour le corps SOAP
const XML_CONTENT_TYPES: [&str; 2] = ["text/xml", "application/soap+xml"];

/// État partagé par les handlers
#[derive(Clone)]
pub struct ReceiverState {
    service: Arc<str>,
    sink: Arc<dyn NotificationSink>,
}

impl ReceiverState {
    pub fn new(service: impl Into<String>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            service: Arc::from(service.into()),
            sink,
        }
    }
}

/// Crée le router du récepteur
pub fn create_router(state: ReceiverState) -> Router {
    Router::new()
        .route("/", get(health_handler).post(callback_handler))
        .route("/health", get(health_handler).post(callback_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Handler GET / et /health
async fn health_handler(State(state): State<ReceiverState>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "service": &*state.service,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Les callbacks peuvent arriver sur n'importe quel chemin
async fn fallback_handler(
    state: State<ReceiverState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::POST {
        callback_handler(state, uri, headers, body).await
    } else {
        warn!(method = %method, path = %uri.path(), "Unsupported request");
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Handler POST : parse, classe et acquitte une notification SOAP
async fn callback_handler(
    State(state): State<ReceiverState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let action = soap_action(&headers);
    info!(
        path = %uri.path(),
        action = action.as_deref().unwrap_or("N/A"),
        bytes = body.len(),
        "📨 SOAP callback received"
    );

    if !is_xml_content_type(&headers) {
        warn!(
            content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none"),
            "❌ Rejecting callback: body is not XML"
        );
        return (StatusCode::BAD_REQUEST, "Invalid XML").into_response();
    }

    let sink = state.sink.as_ref();
    match catch_unwind(AssertUnwindSafe(|| handle_soap_request(&body, sink))) {
        Ok(Ok(ack)) => {
            info!(operation = %ack.kind, "✅ Acknowledged");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, SOAP_CONTENT_TYPE)],
                ack.body,
            )
                .into_response()
        }
        Ok(Err(e)) => {
            warn!("❌ Failed to parse SOAP: {}", e);
            (StatusCode::BAD_REQUEST, "Invalid XML").into_response()
        }
        Err(_) => {
            error!(path = %uri.path(), "💥 Unexpected failure while handling SOAP callback");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Vrai si le Content-Type annonce du XML SOAP
fn is_xml_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| {
            let essence = essence.trim();
            XML_CONTENT_TYPES
                .iter()
                .any(|accepted| essence.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Action SOAP annoncée par l'émetteur, pour les logs
///
/// Cherche `SOAPAction` (SOAP 1.1), puis `Action`, puis le paramètre `action`
/// du Content-Type (SOAP 1.2).
fn soap_action(headers: &HeaderMap) -> Option<String> {
    let from_header = ["soapaction", "action"].iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .map(unquote)
            .filter(|v| !v.is_empty())
    });

    from_header.or_else(|| {
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())?
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("action"))
            .map(|(_, value)| unquote(value))
            .filter(|v| !v.is_empty())
    })
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}
