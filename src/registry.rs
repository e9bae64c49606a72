use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentFamily {
    Text,
    Spreadsheet,
    Presentation,
    Drawing,
}

impl DocumentFamily {
    fn parse(val: &str) -> Option<Self> {
        match val.trim() {
            "Text" => Some(DocumentFamily::Text),
            "Spreadsheet" => Some(DocumentFamily::Spreadsheet),
            "Presentation" => Some(DocumentFamily::Presentation),
            "Drawing" => Some(DocumentFamily::Drawing),
            _ => None,
        }
    }

    /// Document type name as the office bridge spells it.
    pub fn doctype(self) -> &'static str {
        match self {
            DocumentFamily::Text => "document",
            DocumentFamily::Spreadsheet => "spreadsheet",
            DocumentFamily::Presentation => "presentation",
            DocumentFamily::Drawing => "graphics",
        }
    }
}

impl fmt::Display for DocumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFamily::Text => "Text",
            DocumentFamily::Spreadsheet => "Spreadsheet",
            DocumentFamily::Presentation => "Presentation",
            DocumentFamily::Drawing => "Drawing",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormatDescriptor {
    /// File extension the format is keyed by, e.g. `pdf`.
    pub identifier: String,
    pub name: String,
    pub mime_type: String,
    /// Format the bridge is asked for when it differs from the identifier,
    /// e.g. `pdf` for `pdfa`.
    pub base_format: Option<String>,
    /// Family of documents in this format when it is read as input.
    pub family: Option<DocumentFamily>,
    pub export_filters: HashMap<DocumentFamily, String>,
    pub export_options: Vec<(String, String)>,
}

impl FormatDescriptor {
    pub fn filter_name(&self, family: DocumentFamily) -> Option<&str> {
        self.export_filters.get(&family).map(String::as_str)
    }

    pub fn bridge_format(&self) -> &str {
        self.base_format.as_deref().unwrap_or(&self.identifier)
    }
}

#[derive(Debug, Default)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
}

impl FormatRegistry {
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            let shown = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            return Err(Error::Config(format!(
                "Document registry file {} doesn't exist.",
                shown.display()
            )));
        }
        let xml_content = std::fs::read_to_string(path)?;
        Self::parse(&xml_content).map_err(|e| match e {
            Error::Xml(e) => Error::Registry {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
            Error::Config(reason) => Error::Registry {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    pub fn parse(xml_content: &str) -> Result<Self, Error> {
        let xml = roxmltree::Document::parse(xml_content)?;
        let root = xml.root_element();
        if root.tag_name().name() != "document-formats" {
            return Err(Error::Config(format!(
                "expected <document-formats> root, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut formats = Vec::new();
        for node in root.children().filter(|n| n.has_tag_name("document-format")) {
            formats.push(parse_format(node)?);
        }
        Ok(FormatRegistry { formats })
    }

    pub fn formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }

    pub fn by_extension(&self, extension: &str) -> Option<&FormatDescriptor> {
        self.formats
            .iter()
            .find(|f| f.identifier.eq_ignore_ascii_case(extension))
    }

    /// Look up the output format; it must name exactly one registry entry.
    pub fn descriptor(&self, identifier: &str) -> Result<&FormatDescriptor, Error> {
        let mut matches = self
            .formats
            .iter()
            .filter(|f| f.identifier.eq_ignore_ascii_case(identifier));
        let Some(found) = matches.next() else {
            return Err(Error::Config(format!(
                "output format '{identifier}' is not defined in the document registry"
            )));
        };
        if matches.next().is_some() {
            return Err(Error::Config(format!(
                "output format '{identifier}' is defined more than once in the document registry"
            )));
        }
        Ok(found)
    }

    /// Family of a file judged by its extension.
    pub fn family_of(&self, path: &Path) -> Option<DocumentFamily> {
        let ext = path.extension()?.to_str()?;
        self.by_extension(ext)?.family
    }
}

fn child<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn entries<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> {
    child(node, name)
        .into_iter()
        .flat_map(|n| n.children().filter(|e| e.has_tag_name("entry")))
}

fn parse_format(node: roxmltree::Node) -> Result<FormatDescriptor, Error> {
    let Some(identifier) = child_text(node, "file-extension") else {
        return Err(Error::Config(format!(
            "document-format at byte {} has no <file-extension>",
            node.range().start
        )));
    };
    let name = child_text(node, "name").unwrap_or(identifier).to_string();
    let mime_type = child_text(node, "mime-type").unwrap_or_default().to_string();
    let base_format = child_text(node, "base-format").map(str::to_string);

    let family = match child_text(node, "family") {
        Some(val) => Some(DocumentFamily::parse(val).ok_or_else(|| {
            Error::Config(format!("unknown document family '{val}' for format '{identifier}'"))
        })?),
        None => None,
    };

    let mut export_filters = HashMap::new();
    for entry in entries(node, "export-filters") {
        let Some(family_val) = child_text(entry, "family") else {
            continue;
        };
        let Some(filter) = child_text(entry, "string") else {
            continue;
        };
        let Some(family) = DocumentFamily::parse(family_val) else {
            log::warn!("ignoring export filter {filter} for unknown family {family_val}");
            continue;
        };
        export_filters.insert(family, filter.to_string());
    }

    // Entries are key/value pairs: a <string> name followed by a typed value.
    let mut export_options = Vec::new();
    for entry in entries(node, "export-options") {
        let mut values = entry.children().filter(|n| n.is_element());
        let (Some(key), Some(value)) = (values.next(), values.next()) else {
            continue;
        };
        let (Some(key), Some(value)) = (key.text(), value.text()) else {
            continue;
        };
        export_options.push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(FormatDescriptor {
        identifier: identifier.to_string(),
        name,
        mime_type,
        base_format,
        family,
        export_filters,
        export_options,
    })
}
