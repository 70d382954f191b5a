//! RDF/XML rendering of properties (an XMP packet)

use std::io::Write;

use derivative::Derivative;
use log::debug;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{namespace_for_prefix, Namespace, PropertySet, PropertySink, NS_META, NS_RDF};
use crate::error::Result;

const PACKET_BEGIN: &str = "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>";
const PACKET_END: &str = "<?xpacket end=\"w\"?>";

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct XmpOptions {
    /// Leave out the `<?xpacket?>` processing instructions
    #[derivative(Default(value = "true"))]
    pub omit_packet_wrapper: bool,

    /// Spaces per nesting level (0 writes everything on one line)
    #[derivative(Default(value = "1"))]
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum XmpValue {
    Simple(String),
    Seq(Vec<String>),
    /// Qualified fields of a struct (`rdf:parseType="Resource"`)
    Struct(Vec<(Namespace, String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
struct XmpProperty {
    namespace: Namespace,
    name: String,
    value: XmpValue,
}

/// A single `rdf:Description` collecting top-level properties
#[derive(Debug, Clone, Default)]
pub struct XmpPacket {
    properties: Vec<XmpProperty>,
}

impl XmpPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_properties(properties: &PropertySet) -> Self {
        let mut packet = Self::new();
        properties.apply_to(&mut packet);
        packet
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn entry(&mut self, namespace: Namespace, name: &str, empty: XmpValue) -> &mut XmpValue {
        let ix = match self
            .properties
            .iter()
            .position(|p| p.namespace == namespace && p.name == name)
        {
            Some(ix) => ix,
            None => {
                self.properties.push(XmpProperty {
                    namespace,
                    name: name.to_string(),
                    value: empty,
                });
                self.properties.len() - 1
            }
        };
        &mut self.properties[ix].value
    }

    /// Namespaces in order of first use
    fn namespaces(&self) -> Vec<Namespace> {
        let mut used: Vec<Namespace> = Vec::new();
        for property in self.properties.iter() {
            let mut namespaces = vec![property.namespace];
            if let XmpValue::Struct(fields) = &property.value {
                namespaces.extend(fields.iter().map(|(ns, _, _)| *ns));
            }
            for ns in namespaces {
                if !used.contains(&ns) {
                    used.push(ns);
                }
            }
        }
        used
    }

    /// Renders the packet as RDF/XML
    pub fn serialize(&self, options: &XmpOptions) -> Result<String> {
        let mut writer = if options.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', options.indent)
        } else {
            Writer::new(Vec::new())
        };

        let meta_tag = qualified(NS_META, "xmpmeta");
        let mut meta = BytesStart::new(meta_tag.as_str());
        meta.push_attribute(("xmlns:x", NS_META.uri));
        let toolkit = format!("e4f {}", env!("CARGO_PKG_VERSION"));
        meta.push_attribute(("x:xmptk", toolkit.as_str()));
        writer.write_event(Event::Start(meta))?;

        let rdf_tag = qualified(NS_RDF, "RDF");
        let mut rdf = BytesStart::new(rdf_tag.as_str());
        rdf.push_attribute(("xmlns:rdf", NS_RDF.uri));
        writer.write_event(Event::Start(rdf))?;

        let description_tag = qualified(NS_RDF, "Description");
        let mut description = BytesStart::new(description_tag.as_str());
        description.push_attribute(("rdf:about", ""));
        let declarations: Vec<(String, &str)> = self
            .namespaces()
            .into_iter()
            .map(|ns| (format!("xmlns:{}", ns.prefix), ns.uri))
            .collect();
        for (key, uri) in declarations.iter() {
            description.push_attribute((key.as_str(), *uri));
        }
        writer.write_event(Event::Start(description))?;

        for property in self.properties.iter() {
            write_property(&mut writer, property)?;
        }

        writer.write_event(Event::End(BytesEnd::new(description_tag.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new(rdf_tag.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new(meta_tag.as_str())))?;

        let body = String::from_utf8(writer.into_inner())?;
        debug!("Serialized {} XMP properties", self.properties.len());

        if options.omit_packet_wrapper {
            Ok(body)
        } else {
            Ok(format!("{}\n{}\n{}", PACKET_BEGIN, body, PACKET_END))
        }
    }
}

impl PropertySink for XmpPacket {
    fn set_property(&mut self, namespace: Namespace, name: &str, value: &str) {
        // `Parent/prefix:Field` sets a field of a struct property
        if let Some((parent, field)) = name.split_once('/') {
            let (field_ns, field_name) = match field.split_once(':') {
                Some((prefix, local)) => (namespace_for_prefix(prefix).unwrap_or(namespace), local),
                None => (namespace, field),
            };

            let entry = self.entry(namespace, parent, XmpValue::Struct(Vec::new()));
            if !matches!(entry, XmpValue::Struct(_)) {
                *entry = XmpValue::Struct(Vec::new());
            }
            if let XmpValue::Struct(fields) = entry {
                match fields
                    .iter_mut()
                    .find(|(ns, name, _)| *ns == field_ns && name == field_name)
                {
                    Some(existing) => existing.2 = value.to_string(),
                    None => fields.push((field_ns, field_name.to_string(), value.to_string())),
                }
            }
            return;
        }

        *self.entry(namespace, name, XmpValue::Simple(String::new())) =
            XmpValue::Simple(value.to_string());
    }

    fn append_array_item(&mut self, namespace: Namespace, name: &str, value: &str) {
        let entry = self.entry(namespace, name, XmpValue::Seq(Vec::new()));
        match entry {
            XmpValue::Seq(items) => items.push(value.to_string()),
            other => *other = XmpValue::Seq(vec![value.to_string()]),
        }
    }
}

fn qualified(namespace: Namespace, name: &str) -> String {
    format!("{}:{}", namespace.prefix, name)
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_property<W: Write>(writer: &mut Writer<W>, property: &XmpProperty) -> Result<()> {
    let tag = qualified(property.namespace, &property.name);

    match &property.value {
        XmpValue::Simple(text) => write_text_element(writer, &tag, text)?,
        XmpValue::Seq(items) => {
            let seq_tag = qualified(NS_RDF, "Seq");
            let li_tag = qualified(NS_RDF, "li");
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            writer.write_event(Event::Start(BytesStart::new(seq_tag.as_str())))?;
            for item in items {
                write_text_element(writer, &li_tag, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(seq_tag.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        XmpValue::Struct(fields) => {
            let mut start = BytesStart::new(tag.as_str());
            start.push_attribute(("rdf:parseType", "Resource"));
            writer.write_event(Event::Start(start))?;
            for (ns, name, value) in fields {
                write_text_element(writer, &qualified(*ns, name), value)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
    }
    Ok(())
}
