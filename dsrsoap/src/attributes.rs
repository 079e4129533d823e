//! Normalisation des attributs d'un point d'accès
//!
//! Les contrôleurs envoient la collection `attributes` sous des formes variables :
//! un seul élément ou une liste, des clés `name`/`Name`/`NAME` et
//! `value`/`Value`/`VALUE`, en éléments enfants ou en attributs XML.

use crate::SoapValue;
use crate::lookup::{PLACEHOLDER, first_text};
use std::collections::BTreeMap;
use tracing::trace;

/// Attributs normalisés : nom → valeur
pub type AttributeMap = BTreeMap<String, String>;

const NAME_KEYS: [&str; 3] = ["name", "Name", "NAME"];
const VALUE_KEYS: [&str; 3] = ["value", "Value", "VALUE"];

/// Construit l'[`AttributeMap`] d'une collection d'attributs
///
/// - une entrée sans nom (ou avec un nom vide) est ignorée ;
/// - une entrée sans valeur est associée à [`PLACEHOLDER`] ;
/// - un nom répété garde la dernière valeur.
pub fn normalize_attributes(attributes: Option<&SoapValue>) -> AttributeMap {
    let mut map = AttributeMap::new();
    let Some(attributes) = attributes else {
        return map;
    };

    for entry in attributes.as_sequence() {
        let Some(name) = first_text(entry, &NAME_KEYS).filter(|name| !name.is_empty()) else {
            trace!("Skipping attribute entry without name");
            continue;
        };
        let value = first_text(entry, &VALUE_KEYS).unwrap_or(PLACEHOLDER);
        map.insert(name.to_string(), value.to_string());
    }

    map
}
