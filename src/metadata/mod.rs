//! Namespaced metadata properties
//!
//! The projection of an exposure is a [`PropertySet`]: an ordered list of
//! (namespace, name, value) assignments. A set can be replayed into any
//! [`PropertySink`], e.g. an [`xmp::XmpPacket`] that renders RDF/XML.

use std::fmt;

use serde::Serialize;

pub mod xmp;

/// An XMP schema namespace and its preferred prefix
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub uri: &'static str,
    pub prefix: &'static str,
}

pub const NS_EXIF: Namespace = Namespace {
    uri: "http://ns.adobe.com/exif/1.0/",
    prefix: "exif",
};

pub const NS_TIFF: Namespace = Namespace {
    uri: "http://ns.adobe.com/tiff/1.0/",
    prefix: "tiff",
};

pub const NS_DC: Namespace = Namespace {
    uri: "http://purl.org/dc/elements/1.1/",
    prefix: "dc",
};

pub const NS_EXIF_AUX: Namespace = Namespace {
    uri: "http://ns.adobe.com/exif/1.0/aux/",
    prefix: "aux",
};

/// Properties specific to film photography
pub const NS_ANALOG: Namespace = Namespace {
    uri: "http://ns.figuiere.net/ns/analog/1.0/",
    prefix: "analog",
};

pub const NS_RDF: Namespace = Namespace {
    uri: "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    prefix: "rdf",
};

pub const NS_META: Namespace = Namespace {
    uri: "adobe:ns:meta/",
    prefix: "x",
};

/// Namespaces known by [`namespace_for_prefix`]
const KNOWN_NAMESPACES: [Namespace; 7] = [
    NS_EXIF,
    NS_TIFF,
    NS_DC,
    NS_EXIF_AUX,
    NS_ANALOG,
    NS_RDF,
    NS_META,
];

pub fn namespace_for_prefix(prefix: &str) -> Option<Namespace> {
    KNOWN_NAMESPACES
        .into_iter()
        .find(|ns| ns.prefix == prefix)
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    /// Ordered array (`rdf:Seq`)
    Seq(Vec<String>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Seq(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Property {
    #[serde(serialize_with = "serialize_namespace")]
    pub namespace: Namespace,
    /// Property name; a `Parent/prefix:Field` path denotes a struct field
    pub name: String,
    pub value: PropertyValue,
}

fn serialize_namespace<S: serde::Serializer>(ns: &Namespace, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(ns.uri)
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{} = {}", self.namespace.prefix, self.name, self.value)
    }
}

/// Receives property assignments
pub trait PropertySink {
    /// Sets a simple property, replacing any previous value
    fn set_property(&mut self, namespace: Namespace, name: &str, value: &str);

    /// Appends an item to an ordered array, creating it if needed
    fn append_array_item(&mut self, namespace: Namespace, name: &str, value: &str);
}

/// Ordered property assignments, at most one per (namespace, name)
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct PropertySet {
    properties: Vec<Property>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, namespace: Namespace, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|p| p.namespace == namespace && p.name == name)
    }

    pub fn get(&self, namespace: Namespace, name: &str) -> Option<&PropertyValue> {
        self.position(namespace, name)
            .map(|ix| &self.properties[ix].value)
    }

    /// Text of a simple property
    pub fn text(&self, namespace: Namespace, name: &str) -> Option<&str> {
        match self.get(namespace, name) {
            Some(PropertyValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn contains(&self, namespace: Namespace, name: &str) -> bool {
        self.position(namespace, name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// Properties of one namespace, in order
    pub fn in_namespace(&self, namespace: Namespace) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(move |p| p.namespace == namespace)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Replays the assignments into a sink
    pub fn apply_to(&self, sink: &mut dyn PropertySink) {
        for property in self.properties.iter() {
            match &property.value {
                PropertyValue::Text(text) => {
                    sink.set_property(property.namespace, &property.name, text)
                }
                PropertyValue::Seq(items) => {
                    for item in items {
                        sink.append_array_item(property.namespace, &property.name, item);
                    }
                }
            }
        }
    }
}

impl PropertySink for PropertySet {
    fn set_property(&mut self, namespace: Namespace, name: &str, value: &str) {
        let value = PropertyValue::Text(value.to_string());
        match self.position(namespace, name) {
            Some(ix) => self.properties[ix].value = value,
            None => self.properties.push(Property {
                namespace,
                name: name.to_string(),
                value,
            }),
        }
    }

    fn append_array_item(&mut self, namespace: Namespace, name: &str, value: &str) {
        match self.position(namespace, name) {
            Some(ix) => match &mut self.properties[ix].value {
                PropertyValue::Seq(items) => items.push(value.to_string()),
                other => *other = PropertyValue::Seq(vec![value.to_string()]),
            },
            None => self.properties.push(Property {
                namespace,
                name: name.to_string(),
                value: PropertyValue::Seq(vec![value.to_string()]),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
