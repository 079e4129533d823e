//! Structures de l'enveloppe SOAP
//!
//! L'arbre produit par le parser ne garde que les noms locaux : les préfixes de
//! namespace (`soap:`, `ns:`...) sont retirés. Les attributs XML d'un élément sont
//! fusionnés avec ses éléments enfants, si bien que `<attributes Name="X"/>` et
//! `<attributes><Name>X</Name></attributes>` se lisent de la même manière. Quand un
//! attribut et un élément enfant portent le même nom, seul l'enfant est conservé.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Enveloppe SOAP complète
#[derive(Debug, Clone, PartialEq)]
pub struct SoapEnvelope {
    /// En-tête SOAP optionnel
    pub header: Option<SoapValue>,

    /// Corps SOAP contenant l'opération
    pub body: SoapValue,
}

impl SoapEnvelope {
    /// Enfant direct du Body
    pub fn body_child(&self, name: &str) -> Option<&SoapValue> {
        self.body.child(name)
    }

    /// Noms des éléments portés par le Body
    pub fn body_names(&self) -> Vec<String> {
        match &self.body {
            SoapValue::Element(element) => element.fields.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Valeur d'un nœud de l'arbre SOAP
///
/// Un nom présent une seule fois sous un parent donne une valeur simple ; un nom
/// répété donne une [`SoapValue::Sequence`]. Le XML ne permet pas de distinguer
/// « un seul élément » d'une « liste de longueur un » : toute lecture d'un champ
/// répétable doit passer par [`SoapValue::as_sequence`].
#[derive(Debug, Clone, PartialEq)]
pub enum SoapValue {
    /// Élément sans enfant ni attribut (ou valeur d'attribut)
    Text(String),
    /// Élément structuré
    Element(SoapElement),
    /// Occurrences répétées d'un même nom
    Sequence(Vec<SoapValue>),
}

/// Élément structuré : champs (enfants et attributs) et texte éventuel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoapElement {
    pub fields: BTreeMap<String, SoapValue>,
    pub text: Option<String>,
}

impl SoapElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un champ ; un nom déjà présent devient une séquence
    pub fn push_field(&mut self, name: impl Into<String>, value: SoapValue) {
        match self.fields.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                SoapValue::Sequence(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, SoapValue::Sequence(Vec::new()));
                    *existing = SoapValue::Sequence(vec![first, value]);
                }
            },
        }
    }

    /// Variante builder de [`push_field`](Self::push_field)
    pub fn with_field(mut self, name: impl Into<String>, value: SoapValue) -> Self {
        self.push_field(name, value);
        self
    }
}

impl SoapValue {
    /// Raccourci pour une valeur texte
    pub fn text_value(text: impl Into<String>) -> Self {
        SoapValue::Text(text.into())
    }

    /// Champ nommé d'un élément structuré
    ///
    /// Retourne `None` pour un texte ou une séquence.
    pub fn child(&self, name: &str) -> Option<&SoapValue> {
        match self {
            SoapValue::Element(element) => element.fields.get(name),
            _ => None,
        }
    }

    /// Suit un chemin de champs, ex: `&["notifyUpdated", "accessPoint"]`
    pub fn path(&self, names: &[&str]) -> Option<&SoapValue> {
        names
            .iter()
            .try_fold(self, |current, name| current.child(name))
    }

    /// Contenu textuel, pour un texte ou un élément qui porte du texte
    pub fn text(&self) -> Option<&str> {
        match self {
            SoapValue::Text(text) => Some(text),
            SoapValue::Element(element) => element.text.as_deref(),
            SoapValue::Sequence(_) => None,
        }
    }

    /// Vue séquence d'un champ répétable
    ///
    /// Une valeur simple est vue comme une séquence d'un seul élément.
    pub fn as_sequence(&self) -> &[SoapValue] {
        match self {
            SoapValue::Sequence(items) => items,
            single => std::slice::from_ref(single),
        }
    }

    /// Vrai pour un élément vide (`<accessPoint/>`)
    pub fn is_empty(&self) -> bool {
        match self {
            SoapValue::Text(text) => text.is_empty(),
            SoapValue::Element(element) => element.fields.is_empty() && element.text.is_none(),
            SoapValue::Sequence(items) => items.is_empty(),
        }
    }
}
