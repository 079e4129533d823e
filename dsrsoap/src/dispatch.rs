//! Classification des enveloppes et choix de l'acquittement

use crate::SoapEnvelope;
use crate::builder::build_soap_response;
use crate::event::{LogEvent, extract_event};
use crate::parser::{SoapParseError, parse_soap_envelope};
use crate::sink::NotificationSink;
use crate::status::{AccessPointStatus, extract_status};
use std::fmt;
use tracing::debug;

/// Opérations connues du protocole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `notifyUpdated` : changement de statut d'un point d'accès
    StatusUpdate,
    /// `newEvent` : événement de journal ou alarme
    EventNotification,
    /// Tout autre contenu de Body
    Unrecognized,
}

impl OperationKind {
    /// Nom de l'opération SOAP
    pub fn operation_name(&self) -> &'static str {
        match self {
            OperationKind::StatusUpdate => "notifyUpdated",
            OperationKind::EventNotification => "newEvent",
            OperationKind::Unrecognized => "unknown",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}

/// Notification classée, avec sa vue normalisée
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    StatusUpdate(Option<AccessPointStatus>),
    Event(Option<LogEvent>),
    Unrecognized { elements: Vec<String> },
}

impl Notification {
    pub fn kind(&self) -> OperationKind {
        match self {
            Notification::StatusUpdate(_) => OperationKind::StatusUpdate,
            Notification::Event(_) => OperationKind::EventNotification,
            Notification::Unrecognized { .. } => OperationKind::Unrecognized,
        }
    }
}

/// Résultat du traitement d'une enveloppe : opération et réponse à renvoyer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    pub kind: OperationKind,
    pub body: &'static str,
}

/// Classe une enveloppe selon l'enfant présent sous `Body`
///
/// `notifyUpdated` est testé avant `newEvent`.
pub fn classify(envelope: &SoapEnvelope) -> Notification {
    if let Some(notify_updated) = envelope.body_child("notifyUpdated") {
        Notification::StatusUpdate(extract_status(notify_updated.child("accessPoint")))
    } else if let Some(new_event) = envelope.body_child("newEvent") {
        Notification::Event(extract_event(new_event.child("logEntry")))
    } else {
        Notification::Unrecognized {
            elements: envelope.body_names(),
        }
    }
}

/// Classe l'enveloppe, publie la notification et choisit l'acquittement
pub fn dispatch(envelope: &SoapEnvelope, sink: &dyn NotificationSink) -> Acknowledgement {
    let notification = classify(envelope);
    let kind = notification.kind();
    debug!(operation = %kind, "🎬 SOAP operation classified");

    sink.notify(&notification);

    Acknowledgement {
        kind,
        body: build_soap_response(kind),
    }
}

/// Traite un corps de requête brut : parsing puis dispatch
///
/// Une erreur de parsing court-circuite le dispatch : rien n'est publié et
/// aucune réponse SOAP n'est construite.
pub fn handle_soap_request(
    body: &[u8],
    sink: &dyn NotificationSink,
) -> Result<Acknowledgement, SoapParseError> {
    let envelope = parse_soap_envelope(body)?;
    Ok(dispatch(&envelope, sink))
}
