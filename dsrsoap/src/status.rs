//! Extraction du statut d'un point d'accès (`notifyUpdated`)

use crate::SoapValue;
use crate::attributes::{AttributeMap, normalize_attributes};
use crate::lookup::{PLACEHOLDER, field_or_placeholder, first_text};
use serde::Serialize;

/// Statut normalisé d'un point d'accès
///
/// Chaque champ scalaire vaut [`PLACEHOLDER`] quand la source est absente ou vide.
/// `online` est conservé tel quel : le protocole ne fixe pas son domaine de valeurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointStatus {
    pub access_point_id: String,
    pub serial_number: String,
    pub online: String,
    pub sync_status: String,
    pub firmware_upgrade_status: String,
    pub time_of_last_firmware_upgrade: String,
    pub attributes: AttributeMap,
}

/// Extrait le statut de `Body.notifyUpdated.accessPoint`
///
/// Retourne `None` si le nœud est absent ou vide.
pub fn extract_status(access_point: Option<&SoapValue>) -> Option<AccessPointStatus> {
    let access_point = access_point.filter(|node| !node.is_empty())?;

    let access_point_id = first_text(access_point, &["id", "accessPointId"])
        .filter(|id| !id.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string();

    Some(AccessPointStatus {
        access_point_id,
        serial_number: field_or_placeholder(access_point, "serialNumber"),
        online: field_or_placeholder(access_point, "online"),
        sync_status: field_or_placeholder(access_point, "syncStatus"),
        firmware_upgrade_status: field_or_placeholder(access_point, "firmwareUpgradeStatus"),
        time_of_last_firmware_upgrade: field_or_placeholder(
            access_point,
            "timeOfLastFirmwareUpgrade",
        ),
        attributes: normalize_attributes(
            access_point.path(&["accessPointAttributes", "attributes"]),
        ),
    })
}
