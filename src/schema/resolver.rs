use std::collections::BTreeMap;

use super::fields::CanonicalField;
use crate::error::SchemaError;

/// Ordered label variants per canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    aliases: Vec<Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            aliases: CanonicalField::ALL
                .iter()
                .map(|f| f.default_aliases().iter().map(|a| a.to_string()).collect())
                .collect(),
        }
    }
}

impl AliasTable {
    /// Default aliases with per-field replacements from config.
    /// Unknown field names are ignored here; config validation reports them.
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();
        for (name, aliases) in overrides {
            if let Some(field) = CanonicalField::parse(name) {
                table.set(field, aliases.clone());
            }
        }
        table
    }

    pub fn set(&mut self, field: CanonicalField, aliases: Vec<String>) {
        self.aliases[field.index()] = aliases;
    }

    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        &self.aliases[field.index()]
    }
}

/// Outcome of resolving every canonical field against a table's labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    columns: Vec<Option<String>>,
}

impl ResolvedSchema {
    /// Source label for a field, if one was matched.
    pub fn label(&self, field: CanonicalField) -> Option<&str> {
        self.columns[field.index()].as_deref()
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.columns[field.index()].is_some()
    }

    /// All fields in canonical order with their matched label.
    pub fn entries(&self) -> impl Iterator<Item = (CanonicalField, Option<&str>)> + '_ {
        CanonicalField::ALL
            .into_iter()
            .map(move |f| (f, self.label(f)))
    }

    /// Pairs of fields that matched the same source label, in canonical order.
    pub fn shared_columns(&self) -> Vec<(CanonicalField, CanonicalField, &str)> {
        let mut shared = Vec::new();
        for (i, (first, label)) in self.entries().enumerate() {
            let Some(label) = label else { continue };
            for (second, other) in self.entries().skip(i + 1) {
                if other == Some(label) {
                    shared.push((first, second, label));
                }
            }
        }
        shared
    }

    pub fn unresolved(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| !self.has(*f))
            .collect()
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Find the column matching the first acceptable candidate.
///
/// Two passes: trimmed case-insensitive equality against every candidate in
/// priority order, then case-insensitive substring containment in the same
/// order. An exact hit on a low-priority candidate beats a substring hit on a
/// high-priority one. Within a pass, columns are scanned in table order.
pub fn find_column<'a>(labels: &'a [String], candidates: &[String]) -> Option<&'a str> {
    let lowered: Vec<String> = labels.iter().map(|l| normalize(l)).collect();

    for cand in candidates {
        let key = normalize(cand);
        if key.is_empty() {
            continue;
        }
        if let Some(pos) = lowered.iter().position(|l| *l == key) {
            return Some(labels[pos].as_str());
        }
    }

    for cand in candidates {
        let key = normalize(cand);
        if key.is_empty() {
            continue;
        }
        if let Some(pos) = lowered.iter().position(|l| l.contains(&key)) {
            return Some(labels[pos].as_str());
        }
    }

    None
}

/// Resolve every canonical field. Fails only when a mandatory field is missing.
pub fn resolve_schema(labels: &[String], aliases: &AliasTable) -> Result<ResolvedSchema, SchemaError> {
    let columns: Vec<Option<String>> = CanonicalField::ALL
        .iter()
        .map(|field| find_column(labels, aliases.aliases(*field)).map(str::to_string))
        .collect();

    let schema = ResolvedSchema { columns };

    for (field, label) in schema.entries() {
        match label {
            Some(label) => tracing::debug!(field = %field, column = label, "resolved column"),
            None => tracing::debug!(field = %field, "column not found"),
        }
    }

    for (first, second, label) in schema.shared_columns() {
        tracing::warn!(
            column = label,
            first = %first,
            second = %second,
            "column resolved for more than one field"
        );
    }

    let missing: Vec<CanonicalField> = schema
        .unresolved()
        .into_iter()
        .filter(|f| f.is_mandatory())
        .collect();

    if missing.is_empty() {
        Ok(schema)
    } else {
        Err(SchemaError {
            missing,
            available: labels.to_vec(),
        })
    }
}
