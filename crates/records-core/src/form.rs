//! Interactive form (AcroForm) access using lopdf.
//!
//! Fields are addressed by their fully qualified name (`parent.child`).
//! Only terminal fields are exposed; widget-only kids are folded into the
//! field that owns them.

use crate::error::{RecordsError, Result};
use crate::table::Record;
use lopdf::{Document, Object, ObjectId, StringFormat};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Field type as declared by `/FT`, inherited from ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl FieldKind {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"Tx" => FieldKind::Text,
            b"Btn" => FieldKind::Button,
            b"Ch" => FieldKind::Choice,
            b"Sig" => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub id: ObjectId,
    pub kind: FieldKind,
    /// Current `/V`, or `None` if the field has no value
    pub value: Option<String>,
}

/// A PDF document known to carry an interactive form
#[derive(Debug, Clone)]
pub struct FormDocument {
    path: PathBuf,
    doc: Document,
}

impl FormDocument {
    /// Read and parse a PDF; fails if it has no `/AcroForm`
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| RecordsError::io(path, e))?;
        Self::load_mem(&bytes, path)
    }

    /// Parse PDF bytes; `path` names the document in errors
    pub fn load_mem(bytes: &[u8], path: &Path) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| {
            RecordsError::Format(format!("{}: failed to parse PDF: {}", path.display(), e))
        })?;
        let form = Self {
            path: path.to_path_buf(),
            doc,
        };
        form.acroform()?;
        Ok(form)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the source document, e.g. `report.pdf`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Every terminal field in `/Fields` order
    pub fn fields(&self) -> Result<Vec<FormField>> {
        let roots = match self.acroform()?.get(b"Fields") {
            Ok(obj) => resolve(&self.doc, obj)
                .as_array()
                .map_err(|_| self.format_error("/Fields is not an array"))?
                .clone(),
            Err(_) => Vec::new(),
        };

        let mut fields = Vec::new();
        let mut visited = HashSet::new();
        self.collect_fields(&roots, None, FieldKind::Unknown, &mut visited, &mut fields)?;
        Ok(fields)
    }

    /// Current value of the named field: `None` if the form has no such
    /// field, `Some("")` if the field exists without a value
    pub fn field_value(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .fields()?
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.value.unwrap_or_default()))
    }

    /// Set every form field that has a same-named column in `record`.
    ///
    /// Columns without a field and fields without a column are left alone.
    /// Returns the number of fields written.
    pub fn fill(&mut self, record: &Record<'_>) -> Result<usize> {
        let mut filled = 0;
        for field in self.fields()? {
            if let Some(value) = record.get(&field.name) {
                self.set_value(&field, value)?;
                filled += 1;
            }
        }
        if filled > 0 {
            self.set_need_appearances()?;
        }
        tracing::debug!(document = %self.path.display(), filled, "Filled form fields");
        Ok(filled)
    }

    /// Set a single field by name; returns false if the form has no such field
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<bool> {
        let Some(field) = self.fields()?.into_iter().find(|f| f.name == name) else {
            return Ok(false);
        };
        self.set_value(&field, value)?;
        self.set_need_appearances()?;
        Ok(true)
    }

    /// Serialize the document
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer).map_err(|e| {
            RecordsError::Format(format!("{}: failed to save PDF: {}", self.path.display(), e))
        })?;
        Ok(buffer)
    }

    /// Write the document to a new file; never replaces an existing one
    pub fn save_new(&mut self, destination: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    RecordsError::DestinationExists(destination.to_path_buf())
                }
                _ => RecordsError::io(destination, e),
            })?;
        file.write_all(&bytes)
            .map_err(|e| RecordsError::io(destination, e))?;
        Ok(())
    }

    fn acroform(&self) -> Result<&lopdf::Dictionary> {
        let catalog = self
            .doc
            .catalog()
            .map_err(|e| self.format_error(&format!("no document catalog: {}", e)))?;
        let acroform = catalog
            .get(b"AcroForm")
            .map_err(|_| self.format_error("not a form document (no /AcroForm)"))?;
        resolve(&self.doc, acroform)
            .as_dict()
            .map_err(|_| self.format_error("/AcroForm is not a dictionary"))
    }

    fn collect_fields(
        &self,
        nodes: &[Object],
        parent_name: Option<&str>,
        parent_kind: FieldKind,
        visited: &mut HashSet<ObjectId>,
        out: &mut Vec<FormField>,
    ) -> Result<()> {
        for node in nodes {
            let Ok(id) = node.as_reference() else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            let dict = self
                .doc
                .get_dictionary(id)
                .map_err(|e| self.format_error(&format!("bad field object {:?}: {}", id, e)))?;

            let partial = dict
                .get(b"T")
                .ok()
                .and_then(|t| resolve(&self.doc, t).as_str().ok())
                .map(decode_text_string);
            let name = match (parent_name, partial) {
                (Some(parent), Some(partial)) => format!("{}.{}", parent, partial),
                (None, Some(partial)) => partial,
                (Some(parent), None) => parent.to_string(),
                (None, None) => continue,
            };
            let kind = dict
                .get(b"FT")
                .ok()
                .and_then(|ft| resolve(&self.doc, ft).as_name().ok())
                .map(FieldKind::from_name)
                .unwrap_or(parent_kind);

            let kids = dict
                .get(b"Kids")
                .ok()
                .and_then(|k| resolve(&self.doc, k).as_array().ok())
                .cloned()
                .unwrap_or_default();
            let has_field_kids = kids.iter().any(|kid| {
                kid.as_reference()
                    .ok()
                    .and_then(|kid_id| self.doc.get_dictionary(kid_id).ok())
                    .is_some_and(|kid| kid.has(b"T"))
            });

            if has_field_kids {
                self.collect_fields(&kids, Some(&name), kind, visited, out)?;
            } else {
                let value = dict
                    .get(b"V")
                    .ok()
                    .and_then(|v| value_text(&self.doc, v));
                out.push(FormField {
                    name,
                    id,
                    kind,
                    value,
                });
            }
        }
        Ok(())
    }

    fn set_value(&mut self, field: &FormField, value: &str) -> Result<()> {
        let new_value = match field.kind {
            FieldKind::Button => Object::Name(value.as_bytes().to_vec()),
            _ => encode_text_string(value),
        };

        // Each widget of a button shows the value only if it has that state
        let states: Vec<(ObjectId, Vec<u8>)> = if field.kind == FieldKind::Button {
            self.widget_ids(field.id)
                .into_iter()
                .filter_map(|id| self.appearance_state(id, value).map(|state| (id, state)))
                .collect()
        } else {
            Vec::new()
        };

        let path = self.path.clone();
        let dict = self
            .doc
            .get_object_mut(field.id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| {
                RecordsError::Format(format!(
                    "{}: field '{}' is not writable: {}",
                    path.display(),
                    field.name,
                    e
                ))
            })?;
        dict.set("V", new_value);

        for (widget_id, state) in states {
            if let Ok(widget) = self
                .doc
                .get_object_mut(widget_id)
                .and_then(Object::as_dict_mut)
            {
                widget.set("AS", Object::Name(state));
            }
        }
        Ok(())
    }

    /// The field itself (it may double as its widget) and its widget kids
    fn widget_ids(&self, field_id: ObjectId) -> Vec<ObjectId> {
        let mut ids = vec![field_id];
        let kids = self
            .doc
            .get_dictionary(field_id)
            .ok()
            .and_then(|d| d.get(b"Kids").ok())
            .and_then(|k| resolve(&self.doc, k).as_array().ok());
        if let Some(kids) = kids {
            ids.extend(kids.iter().filter_map(|k| k.as_reference().ok()));
        }
        ids
    }

    /// `/AS` for a widget: `value` if its `/AP /N` has that state, else `Off`.
    /// `None` when the object has no normal appearances to choose from.
    fn appearance_state(&self, widget_id: ObjectId, value: &str) -> Option<Vec<u8>> {
        let widget = self.doc.get_dictionary(widget_id).ok()?;
        let ap = resolve(&self.doc, widget.get(b"AP").ok()?).as_dict().ok()?;
        let normal = resolve(&self.doc, ap.get(b"N").ok()?).as_dict().ok()?;
        if normal.has(value.as_bytes()) {
            Some(value.as_bytes().to_vec())
        } else {
            Some(b"Off".to_vec())
        }
    }

    /// Ask viewers to regenerate field appearances from the new values
    fn set_need_appearances(&mut self) -> Result<()> {
        let acroform_ref = self
            .doc
            .catalog()
            .ok()
            .and_then(|c| c.get(b"AcroForm").ok())
            .and_then(|a| a.as_reference().ok());

        let acroform = match acroform_ref {
            Some(id) => self.doc.get_object_mut(id).and_then(Object::as_dict_mut),
            None => self
                .doc
                .catalog_mut()
                .and_then(|c| c.get_mut(b"AcroForm"))
                .and_then(Object::as_dict_mut),
        };
        let acroform = acroform.map_err(|e| {
            RecordsError::Format(format!("{}: /AcroForm not writable: {}", self.path.display(), e))
        })?;
        acroform.set("NeedAppearances", Object::Boolean(true));
        Ok(())
    }

    fn format_error(&self, message: &str) -> RecordsError {
        RecordsError::Format(format!("{}: {}", self.path.display(), message))
    }
}

static NULL: Object = Object::Null;

/// Follow one level of indirection; dangling references resolve to Null
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(&NULL),
        other => other,
    }
}

fn value_text(doc: &Document, obj: &Object) -> Option<String> {
    match resolve(doc, obj) {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(|i| value_text(doc, i)).collect();
            Some(parts.join(","))
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE or UTF-8 with a byte order mark,
/// otherwise PDFDocEncoding (treated as Latin-1)
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a value as a PDF text string: plain bytes for ASCII, UTF-16BE otherwise
pub fn encode_text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod fixtures;
