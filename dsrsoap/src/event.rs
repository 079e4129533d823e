//! Extraction des événements de journal (`newEvent`)

use crate::SoapValue;
use crate::lookup::{field_or_placeholder, path_or_placeholder};
use serde::Serialize;

/// Paire clé/valeur de `logData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogDatum {
    pub key: String,
    pub value: String,
}

/// Événement normalisé issu de `Body.newEvent.logEntry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub origin_type: String,
    pub family: String,
    pub code: String,
    pub time_stamp: String,
    pub log_data: Vec<LogDatum>,
}

/// Extrait un événement de `logEntry`
///
/// Les champs absents valent [`PLACEHOLDER`](crate::PLACEHOLDER). `logData` peut
/// contenir un seul élément ou une liste ; l'ordre d'arrivée est conservé.
pub fn extract_event(log_entry: Option<&SoapValue>) -> Option<LogEvent> {
    let log_entry = log_entry.filter(|node| !node.is_empty())?;

    let log_data = log_entry
        .child("logData")
        .map(|data| {
            data.as_sequence()
                .iter()
                .map(|datum| LogDatum {
                    key: field_or_placeholder(datum, "key"),
                    value: field_or_placeholder(datum, "value"),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(LogEvent {
        origin_type: path_or_placeholder(log_entry, &["origin", "logOriginType"]),
        family: field_or_placeholder(log_entry, "family"),
        code: field_or_placeholder(log_entry, "code"),
        time_stamp: field_or_placeholder(log_entry, "timeStamp"),
        log_data,
    })
}
