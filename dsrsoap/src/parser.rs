//! Parser SOAP pour les notifications DSR
//!
//! Le document est lu en flux avec `xml-rs` et l'arbre [`SoapValue`] est construit
//! avec une pile explicite : la profondeur est vérifiée à chaque ouverture
//! d'élément, avant toute allocation de sous-arbre, et aucune récursion ne dépend
//! de l'entrée.

use super::{SoapElement, SoapEnvelope, SoapValue};
use std::io::BufReader;
use xml::reader::{EventReader, XmlEvent};

/// Profondeur maximale acceptée pour l'arbre XML (`Envelope` est au niveau 0)
pub const MAX_DEPTH: usize = 64;

/// Erreur de parsing SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xml::reader::Error),

    #[error("Missing SOAP Envelope (root element is '{0}')")]
    MissingEnvelope(String),

    #[error("Missing SOAP Body")]
    MissingBody,

    #[error("XML nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Élément en cours de construction
struct OpenElement {
    name: String,
    attributes: Vec<(String, String)>,
    node: SoapElement,
    text: String,
}

impl OpenElement {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            node: SoapElement::new(),
            text: String::new(),
        }
    }

    /// Ferme l'élément
    ///
    /// Un attribut XML qui porte le même nom qu'un élément enfant est ignoré :
    /// l'enfant fait foi.
    fn close(self) -> (String, SoapValue) {
        let OpenElement {
            name,
            attributes,
            mut node,
            text,
        } = self;

        for (attribute, value) in attributes {
            if !node.fields.contains_key(&attribute) {
                node.push_field(attribute, SoapValue::Text(value));
            }
        }

        let text = text.trim();
        if node.fields.is_empty() {
            return (name, SoapValue::Text(text.to_string()));
        }
        if !text.is_empty() {
            node.text = Some(text.to_string());
        }
        (name, SoapValue::Element(node))
    }
}

/// Parse une enveloppe SOAP complète
///
/// Les préfixes de namespace sont retirés de tous les noms d'éléments et
/// d'attributs. Toute erreur est retournée sous forme de [`SoapParseError`] ;
/// la fonction ne panique pas sur une entrée invalide.
pub fn parse_soap_envelope(xml: &[u8]) -> Result<SoapEnvelope, SoapParseError> {
    let root = parse_tree(xml)?;

    let header = root.child("Header").and_then(first_occurrence).cloned();
    let body = root
        .child("Body")
        .and_then(first_occurrence)
        .cloned()
        .ok_or(SoapParseError::MissingBody)?;

    Ok(SoapEnvelope { header, body })
}

fn first_occurrence(value: &SoapValue) -> Option<&SoapValue> {
    value.as_sequence().first()
}

/// Construit l'arbre de l'élément racine, qui doit être une `Envelope`
fn parse_tree(xml: &[u8]) -> Result<SoapValue, SoapParseError> {
    let reader = EventReader::new(BufReader::new(xml));
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root = None;

    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                if stack.is_empty() && name.local_name != "Envelope" {
                    return Err(SoapParseError::MissingEnvelope(name.local_name));
                }
                if stack.len() > MAX_DEPTH {
                    return Err(SoapParseError::TooDeep(MAX_DEPTH));
                }

                // Les déclarations de namespace ne figurent pas dans `attributes`
                let attributes = attributes
                    .into_iter()
                    .map(|attribute| (attribute.name.local_name, attribute.value))
                    .collect();
                stack.push(OpenElement::new(name.local_name, attributes));
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            XmlEvent::EndElement { .. } => {
                let Some(closed) = stack.pop() else {
                    continue;
                };
                let (name, value) = closed.close();
                match stack.last_mut() {
                    Some(parent) => parent.node.push_field(name, value),
                    None => root = Some(value),
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }

    // xml-rs signale déjà un document sans racine ou mal fermé
    root.ok_or(SoapParseError::MissingBody)
}
