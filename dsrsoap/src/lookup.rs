//! Lecture tolérante des champs d'un nœud SOAP

use crate::SoapValue;

/// Texte affiché quand un champ est absent ou vide
pub const PLACEHOLDER: &str = "N/A";

/// Texte du premier champ présent parmi `keys`, dans l'ordre donné
///
/// La première clé présente gagne, même si son contenu n'est pas textuel.
pub fn first_text<'a>(node: &'a SoapValue, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| node.child(key))
        .and_then(SoapValue::text)
}

/// Texte d'un champ, ou [`PLACEHOLDER`] s'il est absent ou vide
pub fn field_or_placeholder(node: &SoapValue, key: &str) -> String {
    path_or_placeholder(node, &[key])
}

/// Texte au bout d'un chemin, ou [`PLACEHOLDER`] s'il est absent ou vide
pub fn path_or_placeholder(node: &SoapValue, path: &[&str]) -> String {
    node.path(path)
        .and_then(SoapValue::text)
        .filter(|text| !text.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}
