//! # dsrsoap - Récepteur des callbacks SOAP DSR
//!
//! Cette crate reçoit les notifications SOAP 1.2 poussées par un contrôleur
//! ASSA ABLOY DSR, les normalise et renvoie l'acquittement attendu.
//!
//! ## Opérations prises en charge
//!
//! - `notifyUpdated` : statut d'un point d'accès (firmware, synchronisation, attributs)
//! - `newEvent` : événement de journal ou alarme
//! - tout autre contenu de `Body` est acquitté avec une enveloppe vide
//!
//! ## Chaîne de traitement
//!
//! ```text
//! octets ──► parse_soap_envelope ──► classify ──► NotificationSink
//!                                        │
//!                                        └──► build_soap_response ──► HTTP 200
//! ```
//!
//! ## Utilisation
//!
//! ```rust
//! use dsrsoap::{handle_soap_request, OperationKind, TracingSink};
//!
//! let xml = br#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope">
//!   <s:Body><notifyUpdated><accessPoint><id>AP-1</id></accessPoint></notifyUpdated></s:Body>
//! </s:Envelope>"#;
//!
//! let ack = handle_soap_request(xml, &TracingSink).unwrap();
//! assert_eq!(ack.kind, OperationKind::StatusUpdate);
//! ```
//!
//! ### Avec le serveur HTTP
//!
//! ```rust,no_run
//! use dsrserver::ServerBuilder;
//! use dsrsoap::{CallbackReceiverExt, TracingSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.register_callback_receiver(Arc::new(TracingSink)).await?;
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod attributes;
pub mod builder;
pub mod dispatch;
pub mod envelope;
pub mod event;
pub mod lookup;
pub mod parser;
pub mod sink;
pub mod status;

#[cfg(feature = "dsrserver")]
pub mod handler;

#[cfg(feature = "dsrserver")]
mod dsrserver_impl;

pub use attributes::{AttributeMap, normalize_attributes};
pub use builder::{
    DSR_NS, EMPTY_RESPONSE, NEW_EVENT_RESPONSE, NOTIFY_UPDATED_RESPONSE, SOAP_CONTENT_TYPE,
    SOAP_ENVELOPE_NS, build_soap_response,
};
pub use dispatch::{
    Acknowledgement, Notification, OperationKind, classify, dispatch, handle_soap_request,
};
pub use envelope::{SoapElement, SoapEnvelope, SoapValue};
pub use event::{LogDatum, LogEvent, extract_event};
pub use lookup::PLACEHOLDER;
pub use parser::{SoapParseError, parse_soap_envelope};
pub use sink::{NotificationSink, TracingSink};
pub use status::{AccessPointStatus, extract_status};

#[cfg(feature = "dsrserver")]
pub use handler::{ReceiverState, create_router};

#[cfg(feature = "dsrserver")]
use std::sync::Arc;

/// Trait d'extension pour brancher le récepteur sur un `dsrserver::Server`
///
/// Implémenté dans `dsrserver_impl`, de sorte que `dsrserver` n'a pas à connaître
/// le protocole SOAP.
#[cfg(feature = "dsrserver")]
pub trait CallbackReceiverExt {
    /// Enregistre les routes du récepteur
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /`, `GET /health` : état du service
    /// - `POST` sur tout chemin : callback SOAP
    ///
    /// # Arguments
    ///
    /// * `sink` - Destination des notifications classées
    fn register_callback_receiver(
        &mut self,
        sink: Arc<dyn NotificationSink>,
    ) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}
