//! PDF form fixtures, shared by the unit tests in `src/form.rs` and the
//! integration tests in this directory
#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;

/// One field of a fixture form
pub enum FieldSpec<'a> {
    /// Text field merged with its widget
    Text {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// Non-terminal field whose kids are qualified as `name.kid`
    Group {
        name: &'a str,
        kids: Vec<FieldSpec<'a>>,
    },
    /// Checkbox merged with its widget, appearance states `on` and `Off`
    Checkbox {
        name: &'a str,
        on: &'a str,
        value: Option<&'a str>,
    },
    /// Radio group with one widget kid per state
    Radio {
        name: &'a str,
        states: Vec<&'a str>,
        value: Option<&'a str>,
    },
}

fn literal(text: &str) -> Object {
    Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
}

fn name(text: &str) -> Object {
    Object::Name(text.as_bytes().to_vec())
}

/// `/AP << /N << /<on> stream /Off stream >> >>`
fn appearances(doc: &mut Document, on: &str) -> Object {
    let on_stream = doc.add_object(Stream::new(Dictionary::new(), b"0 g".to_vec()));
    let off_stream = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
    let normal = Dictionary::from_iter(vec![
        (on, Object::Reference(on_stream)),
        ("Off", Object::Reference(off_stream)),
    ]);
    Object::Dictionary(Dictionary::from_iter(vec![("N", Object::Dictionary(normal))]))
}

fn widget(page_id: ObjectId) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", name("Annot")),
        ("Subtype", name("Widget")),
        ("P", Object::Reference(page_id)),
    ])
}

fn add_field(
    doc: &mut Document,
    page_id: ObjectId,
    spec: &FieldSpec<'_>,
    parent: Option<ObjectId>,
    annots: &mut Vec<Object>,
) -> ObjectId {
    let id = doc.new_object_id();
    let mut dict = match spec {
        FieldSpec::Text { name: field, value } => {
            let mut dict = widget(page_id);
            dict.set("FT", name("Tx"));
            dict.set("T", literal(field));
            if let Some(value) = value {
                dict.set("V", literal(value));
            }
            annots.push(Object::Reference(id));
            dict
        }
        FieldSpec::Group { name: field, kids } => {
            let kid_refs = kids
                .iter()
                .map(|kid| Object::Reference(add_field(doc, page_id, kid, Some(id), annots)))
                .collect();
            Dictionary::from_iter(vec![("T", literal(field)), ("Kids", Object::Array(kid_refs))])
        }
        FieldSpec::Checkbox {
            name: field,
            on,
            value,
        } => {
            let mut dict = widget(page_id);
            dict.set("FT", name("Btn"));
            dict.set("T", literal(field));
            dict.set("AP", appearances(doc, on));
            dict.set("AS", name(value.unwrap_or("Off")));
            if let Some(value) = value {
                dict.set("V", name(value));
            }
            annots.push(Object::Reference(id));
            dict
        }
        FieldSpec::Radio {
            name: field,
            states,
            value,
        } => {
            let mut kid_refs = Vec::new();
            for state in states {
                let mut kid = widget(page_id);
                kid.set("Parent", Object::Reference(id));
                kid.set("AP", appearances(doc, state));
                let shown = if *value == Some(*state) { *state } else { "Off" };
                kid.set("AS", name(shown));
                let kid_id = doc.add_object(kid);
                annots.push(Object::Reference(kid_id));
                kid_refs.push(Object::Reference(kid_id));
            }
            let mut dict = Dictionary::from_iter(vec![
                ("FT", name("Btn")),
                ("T", literal(field)),
                ("Ff", Object::Integer(1 << 15)),
                ("Kids", Object::Array(kid_refs)),
            ]);
            if let Some(value) = value {
                dict.set("V", name(value));
            }
            dict
        }
    };
    if let Some(parent) = parent {
        dict.set("Parent", Object::Reference(parent));
    }
    doc.objects.insert(id, Object::Dictionary(dict));
    id
}

/// A one-page PDF whose form holds the given fields
pub fn form_pdf(fields: &[FieldSpec<'_>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let mut annots = Vec::new();
    let field_refs: Vec<Object> = fields
        .iter()
        .map(|spec| Object::Reference(add_field(&mut doc, page_id, spec, None, &mut annots)))
        .collect();

    let page = Dictionary::from_iter(vec![
        ("Type", name("Page")),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Annots", Object::Array(annots)),
    ]);
    doc.objects.insert(page_id, Object::Dictionary(page));

    let pages = Dictionary::from_iter(vec![
        ("Type", name("Pages")),
        ("Count", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let acroform_id =
        doc.add_object(Dictionary::from_iter(vec![("Fields", Object::Array(field_refs))]));
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", name("Catalog")),
        ("Pages", Object::Reference(pages_id)),
        ("AcroForm", Object::Reference(acroform_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Flat text fields, optionally with a value
pub fn text_fields<'a>(fields: &[(&'a str, Option<&'a str>)]) -> Vec<FieldSpec<'a>> {
    fields
        .iter()
        .map(|&(name, value)| FieldSpec::Text { name, value })
        .collect()
}

/// Write a one-page PDF whose form holds the given text fields
pub fn write_form_pdf(path: &Path, fields: &[(&str, Option<&str>)]) {
    std::fs::write(path, form_pdf(&text_fields(fields))).unwrap();
}

/// Write a one-page PDF whose form holds the given fields
pub fn write_form_pdf_with(path: &Path, fields: &[FieldSpec<'_>]) {
    std::fs::write(path, form_pdf(fields)).unwrap();
}
