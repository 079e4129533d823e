//! Sortie d'observabilité des notifications
//!
//! Le dispatcher écrit chaque notification classée dans un [`NotificationSink`].
//! C'est une sortie à sens unique : le résultat du rendu n'influence jamais
//! la classification ni la réponse envoyée au contrôleur.

use crate::dispatch::Notification;
use crate::event::LogEvent;
use crate::status::AccessPointStatus;
use tracing::{debug, info, warn};

/// Destination des notifications classées
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Rendu des notifications dans les logs `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::StatusUpdate(Some(status)) => render_status(status),
            Notification::StatusUpdate(None) => {
                warn!("📡 notifyUpdated received without accessPoint");
            }
            Notification::Event(Some(event)) => render_event(event),
            Notification::Event(None) => {
                warn!("🔔 newEvent received without logEntry");
            }
            Notification::Unrecognized { elements } => {
                warn!(elements = ?elements, "❓ Unrecognized SOAP operation, acknowledged anyway");
            }
        }
    }
}

/// Vrai pour les attributs liés au firmware (`FIRMWARE_VERSION`, `firmwareBuild`...)
pub fn is_firmware_attribute(name: &str) -> bool {
    name.to_ascii_uppercase().contains("FIRMWARE")
}

fn render_status(status: &AccessPointStatus) {
    info!(
        access_point_id = %status.access_point_id,
        serial_number = %status.serial_number,
        "📡 Access point status update"
    );
    info!(
        access_point_id = %status.access_point_id,
        online = %status.online,
        sync_status = %status.sync_status,
        firmware_upgrade_status = %status.firmware_upgrade_status,
        time_of_last_firmware_upgrade = %status.time_of_last_firmware_upgrade,
        "🔄 Sync/firmware status"
    );

    if status.attributes.is_empty() {
        debug!(access_point_id = %status.access_point_id, "No access point attributes");
    }
    for (name, value) in &status.attributes {
        if is_firmware_attribute(name) {
            info!(
                access_point_id = %status.access_point_id,
                firmware = true,
                "⭐ {} = {}",
                name,
                value
            );
        } else {
            info!(
                access_point_id = %status.access_point_id,
                firmware = false,
                "   {} = {}",
                name,
                value
            );
        }
    }

    if let Ok(json) = serde_json::to_string(status) {
        debug!(payload = %json, "notifyUpdated payload");
    }
}

fn render_event(event: &LogEvent) {
    info!(
        origin = %event.origin_type,
        family = %event.family,
        code = %event.code,
        time_stamp = %event.time_stamp,
        "🔔 New event"
    );
    for datum in &event.log_data {
        info!(code = %event.code, "   {} = {}", datum.key, datum.value);
    }

    if let Ok(json) = serde_json::to_string(event) {
        debug!(payload = %json, "newEvent payload");
    }
}
