//! Construction des réponses SOAP d'acquittement
//!
//! Les acquittements ne portent aucune donnée : ce sont des gabarits fixes,
//! comparés octet par octet par certains contrôleurs.

use crate::OperationKind;

/// Namespace de l'enveloppe SOAP 1.2
pub const SOAP_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Namespace du protocole DSR 2.0
pub const DSR_NS: &str = "http://xml.assaabloy.com/dsr/2.0";

/// Content-Type des réponses SOAP
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

macro_rules! soap_envelope {
    ($body:literal) => {
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            $body,
            r#"</soap:Envelope>"#
        )
    };
}

/// Acquittement de `notifyUpdated`
pub const NOTIFY_UPDATED_RESPONSE: &str = soap_envelope!(
    r#"<soap:Body><ns:notifyUpdatedResponse xmlns:ns="http://xml.assaabloy.com/dsr/2.0"/></soap:Body>"#
);

/// Acquittement de `newEvent`
pub const NEW_EVENT_RESPONSE: &str = soap_envelope!(
    r#"<soap:Body><ns:newEventResponse xmlns:ns="http://xml.assaabloy.com/dsr/2.0"/></soap:Body>"#
);

/// Acquittement minimal d'une opération inconnue
pub const EMPTY_RESPONSE: &str = soap_envelope!(r#"<soap:Body/>"#);

/// Construit la réponse SOAP correspondant à une opération
pub fn build_soap_response(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::StatusUpdate => NOTIFY_UPDATED_RESPONSE,
        OperationKind::EventNotification => NEW_EVENT_RESPONSE,
        OperationKind::Unrecognized => EMPTY_RESPONSE,
    }
}
