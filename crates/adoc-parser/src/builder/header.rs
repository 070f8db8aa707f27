//! Document header: title, authors, revision and front matter.

use std::collections::BTreeMap;

use adoc_types::{
    DocumentAttributes, DocumentAuthor, DocumentHeader, DocumentRevision, Fragment, FrontMatter,
    Node, plain_text,
};

use super::fragments::{StringifyOption, merge, stringify};
use crate::error::BuildError;

/// Author from name fragments and an optional email.
///
/// Name parts are separated by whitespace; underscores inside a part stand
/// for spaces. One part is a first name, two are first and last names,
/// three or more are first, middle and last names.
pub fn new_document_author(
    full_name: Vec<Fragment>,
    email: Option<Vec<Fragment>>,
) -> Result<DocumentAuthor, BuildError> {
    let raw = stringify(full_name, &[StringifyOption::Trim])?;
    let parts: Vec<String> = raw
        .split_whitespace()
        .map(|p| p.replace('_', " ").trim().to_owned())
        .filter(|p| !p.is_empty())
        .collect();

    let (first_name, middle_name, last_name) = match parts.as_slice() {
        [] => return Err(BuildError::MalformedAuthor(raw)),
        [first] => (first.clone(), None, None),
        [first, last] => (first.clone(), None, Some(last.clone())),
        [first, middle, rest @ ..] => (first.clone(), Some(middle.clone()), Some(rest.join(" "))),
    };

    let initials = [Some(&first_name), middle_name.as_ref(), last_name.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(|part| part.chars().next())
        .collect();

    let email = match email {
        Some(fragments) => {
            let email = stringify(
                fragments,
                &[
                    StringifyOption::Trim,
                    StringifyOption::TrimPrefix("<"),
                    StringifyOption::TrimSuffix(">"),
                ],
            )?;
            Some(email).filter(|e| !e.is_empty())
        }
        None => None,
    };

    Ok(DocumentAuthor {
        full_name: parts.join(" "),
        first_name,
        middle_name,
        last_name,
        initials,
        email,
    })
}

/// Revision from its optional number, date and remark.
///
/// A leading `v` or `V` is stripped from the number; empty values are
/// dropped.
pub fn new_document_revision(
    number: Option<Vec<Fragment>>,
    date: Option<Vec<Fragment>>,
    remark: Option<Vec<Fragment>>,
) -> Result<DocumentRevision, BuildError> {
    let clean = |fragments: Option<Vec<Fragment>>| -> Result<Option<String>, BuildError> {
        let Some(fragments) = fragments else {
            return Ok(None);
        };
        let text = stringify(fragments, &[StringifyOption::Trim])?;
        Ok(Some(text).filter(|t| !t.is_empty()))
    };
    let number = clean(number)?.map(|n| {
        n.strip_prefix(['v', 'V'])
            .map_or_else(|| n.clone(), str::to_owned)
    });
    Ok(DocumentRevision {
        number,
        date: clean(date)?,
        remark: clean(remark)?,
    })
}

/// Document header from its parts.
///
/// `entries` are the attribute declarations and resets of the header, in
/// order.
pub fn new_document_header(
    title: Vec<Fragment>,
    authors: Vec<DocumentAuthor>,
    revision: Option<DocumentRevision>,
    entries: Vec<Node>,
) -> Result<DocumentHeader, BuildError> {
    let mut attributes = DocumentAttributes::new();
    for entry in entries {
        match entry {
            Node::AttributeDeclaration(decl) => attributes.set(decl.name, decl.value),
            Node::AttributeReset(reset) => attributes.reset(&reset.name),
            other => return Err(BuildError::malformed("attribute entry", other.kind().name())),
        }
    }
    Ok(DocumentHeader {
        title: merge(title),
        authors,
        revision,
        attributes,
    })
}

/// Attributes implied by a header: title, author fields, revision fields,
/// then the explicit entries.
#[must_use]
pub fn header_attributes(header: &DocumentHeader) -> DocumentAttributes {
    let mut attributes = DocumentAttributes::new();
    if !header.title.is_empty() {
        attributes.set("doctitle", plain_text(&header.title));
    }
    for (index, author) in header.authors.iter().enumerate() {
        let suffix = if index == 0 {
            String::new()
        } else {
            format!("_{}", index + 1)
        };
        attributes.set(format!("author{suffix}"), author.full_name.clone());
        attributes.set(format!("firstname{suffix}"), author.first_name.clone());
        if let Some(middle) = &author.middle_name {
            attributes.set(format!("middlename{suffix}"), middle.clone());
        }
        if let Some(last) = &author.last_name {
            attributes.set(format!("lastname{suffix}"), last.clone());
        }
        attributes.set(format!("authorinitials{suffix}"), author.initials.clone());
        if let Some(email) = &author.email {
            attributes.set(format!("email{suffix}"), email.clone());
        }
    }
    if let Some(revision) = &header.revision {
        let fields = [
            ("revnumber", &revision.number),
            ("revdate", &revision.date),
            ("revremark", &revision.remark),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                attributes.set(key, value.clone());
            }
        }
    }
    attributes.merge(&header.attributes);
    attributes
}

/// Parse YAML front matter into an opaque string map.
///
/// Scalars are kept as text; sequences and mappings are kept as their YAML
/// source.
pub fn new_yaml_front_matter(content: &str) -> Result<FrontMatter, BuildError> {
    if content.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| BuildError::MalformedFrontMatter(e.to_string()))?;
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err(BuildError::MalformedFrontMatter(
            "expected a mapping".to_owned(),
        ));
    };

    let mut entries = BTreeMap::new();
    for (key, value) in mapping {
        let key = scalar_to_string(&key).ok_or_else(|| {
            BuildError::MalformedFrontMatter("keys must be scalars".to_owned())
        })?;
        let value = match scalar_to_string(&value) {
            Some(text) => text,
            None => serde_yaml::to_string(&value)
                .map_err(|e| BuildError::MalformedFrontMatter(e.to_string()))?
                .trim_end()
                .to_owned(),
        };
        entries.insert(key, value);
    }
    Ok(FrontMatter { content: entries })
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_)
        | serde_yaml::Value::Tagged(_) => None,
    }
}
