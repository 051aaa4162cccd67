//! Namespace names and fully qualified display titles.

use std::collections::BTreeMap;

use crate::models::{Document, NamespaceId};

/// The main (article) namespace. Its titles carry no prefix.
pub const MAIN: NamespaceId = 0;

const CANONICAL: &[(NamespaceId, &str)] = &[
    (1, "Talk"),
    (2, "User"),
    (3, "User talk"),
    (4, "Project"),
    (5, "Project talk"),
    (6, "File"),
    (7, "File talk"),
    (8, "MediaWiki"),
    (9, "MediaWiki talk"),
    (10, "Template"),
    (11, "Template talk"),
    (12, "Help"),
    (13, "Help talk"),
    (14, "Category"),
    (15, "Category talk"),
];

/// Maps namespace ids to their display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    names: BTreeMap<NamespaceId, String>,
}

impl Namespaces {
    /// The canonical namespace table with no site-specific additions.
    pub fn canonical() -> Self {
        Self {
            names: CANONICAL
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
        }
    }

    /// Add or replace the name of a namespace.
    pub fn with_name(mut self, id: NamespaceId, name: impl Into<String>) -> Self {
        self.names.insert(id, name.into());
        self
    }

    /// Display name of `id`. Empty for the main namespace.
    pub fn name(&self, id: NamespaceId) -> String {
        if id == MAIN {
            return String::new();
        }
        match self.names.get(&id) {
            Some(name) => name.clone(),
            None => format!("Namespace{}", id),
        }
    }

    /// Full display title of a document: `Name:Title text`, underscores
    /// shown as spaces, no prefix in the main namespace.
    pub fn full_title(&self, doc: &Document) -> String {
        let text = doc.title.replace('_', " ");
        if doc.namespace == MAIN {
            text
        } else {
            format!("{}:{}", self.name(doc.namespace), text)
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::canonical()
    }
}
