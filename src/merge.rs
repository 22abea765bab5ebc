//! Platform merge engine
//!
//! The same namespace is described once per platform. Merging folds those
//! descriptions into one tree where every node's platform mask says where it
//! exists. Merging never mutates its inputs.

use crate::ast::{Node, NodeKind};
use crate::error::{CompilerError, Result};
use crate::model::{Namespace, RegisteredType, Repository};
use indexmap::IndexMap;

/// Insertion-ordered union of two child lists. The first occurrence of a
/// member keeps its position and content; the platform masks of all
/// occurrences are combined.
pub fn union_children(first: &[Node], second: &[Node]) -> Vec<Node> {
    let mut result: Vec<Node> = first.to_vec();

    for child in second {
        match result.iter().position(|existing| existing.is_same_member(child)) {
            Some(index) => {
                let existing = &result[index];
                let platforms = existing.platforms() | child.platforms();
                if platforms != existing.platforms() {
                    result[index] = existing.clone().with_own_platforms(platforms);
                }
            }
            None => result.push(child.clone()),
        }
    }

    result
}

fn merge_default(a: &Node, b: &Node) -> Node {
    Node::new(
        a.kind,
        a.attributes().clone(),
        union_children(a.children(), b.children()),
        a.platforms() | b.platforms(),
    )
    .with_text(a.text())
}

/// Records whose fields differ between platforms lose all fields: an accessor
/// that is only valid on some platforms would read the wrong offsets elsewhere
fn merge_record(a: &Node, b: &Node) -> Node {
    let fields_a: Vec<&Node> = a.children_of(NodeKind::Field).collect();
    let fields_b: Vec<&Node> = b.children_of(NodeKind::Field).collect();
    let same_fields = fields_a.len() == fields_b.len()
        && fields_a.iter().zip(&fields_b).all(|(x, y)| x.same_shape(y));

    let mut children = union_children(a.children(), b.children());
    if !same_fields {
        log::debug!(
            "Record {} has platform-specific fields, omitting all fields",
            a.name().unwrap_or_default()
        );
        children.retain(|c| c.kind != NodeKind::Field);
    }

    Node::new(a.kind, a.attributes().clone(), children, a.platforms() | b.platforms()).with_text(a.text())
}

impl RegisteredType {
    /// Merge two platform variants of the same type
    pub fn merge_with(&self, other: &RegisteredType) -> Result<RegisteredType> {
        let merged = match (self, other) {
            (Self::Alias(a), Self::Alias(b)) => Self::Alias(merge_default(a, b)),
            (Self::Boxed(a), Self::Boxed(b)) => Self::Boxed(merge_default(a, b)),
            (Self::Callback(a), Self::Callback(b)) => Self::Callback(merge_default(a, b)),
            (Self::Class(a), Self::Class(b)) => Self::Class(merge_default(a, b)),
            (Self::Enumeration(a), Self::Enumeration(b)) => Self::Enumeration(merge_default(a, b)),
            (Self::Interface(a), Self::Interface(b)) => Self::Interface(merge_default(a, b)),
            (Self::Record(a), Self::Record(b)) => Self::Record(merge_record(a, b)),
            (Self::Union(a), Self::Union(b)) => Self::Union(merge_default(a, b)),
            (a, b) => {
                return Err(CompilerError::Merge {
                    message: format!(
                        "'{}' is a {} on {} but a {} on {}",
                        a.name(),
                        a.variant_name(),
                        a.platforms(),
                        b.variant_name(),
                        b.platforms()
                    ),
                })
            }
        };
        Ok(merged)
    }
}

/// Merge two platform variants of the same namespace, key by key
pub fn merge_namespaces(a: &Namespace, b: &Namespace) -> Result<Namespace> {
    if a.name != b.name {
        return Err(CompilerError::Merge {
            message: format!("Cannot merge namespace {} with {}", a.name, b.name),
        });
    }

    let mut types: IndexMap<String, RegisteredType> = IndexMap::new();
    for (name, rt) in &a.types {
        let merged = match b.types.get(name) {
            Some(other) => rt.merge_with(other)?,
            None => rt.clone(),
        };
        types.insert(name.clone(), merged);
    }
    for (name, rt) in &b.types {
        if !types.contains_key(name) {
            types.insert(name.clone(), rt.clone());
        }
    }

    let mut attributes = a.attributes.clone();
    for (key, value) in &b.attributes {
        attributes.entry(key.clone()).or_insert_with(|| value.clone());
    }

    Ok(Namespace {
        name: a.name.clone(),
        version: a.version.clone(),
        attributes,
        types,
        functions: union_children(&a.functions, &b.functions),
        constants: union_children(&a.constants, &b.constants),
        other: union_children(&a.other, &b.other),
        platforms: a.platforms | b.platforms,
    })
}

pub fn merge_repositories(a: &Repository, b: &Repository) -> Result<Repository> {
    let mut includes = a.includes.clone();
    for include in &b.includes {
        if !includes.contains(include) {
            includes.push(include.clone());
        }
    }

    Ok(Repository {
        includes,
        packages: union_strings(&a.packages, &b.packages),
        c_includes: union_strings(&a.c_includes, &b.c_includes),
        namespace: merge_namespaces(&a.namespace, &b.namespace)?,
        platforms: a.platforms | b.platforms,
    })
}

fn union_strings(a: &[String], b: &[String]) -> Vec<String> {
    let mut result = a.to_vec();
    for s in b {
        if !result.contains(s) {
            result.push(s.clone());
        }
    }
    result
}

/// Group repositories by namespace (first-seen order) and left-fold each group
pub fn merge_all(repositories: Vec<Repository>) -> Result<Vec<Repository>> {
    let mut groups: IndexMap<String, Repository> = IndexMap::new();

    for repo in repositories {
        let key = repo.namespace.name.clone();
        let merged = match groups.get(&key) {
            Some(existing) => merge_repositories(existing, &repo)?,
            None => repo,
        };
        groups.insert(key, merged);
    }

    for repo in groups.values() {
        log::debug!(
            "Merged namespace {} for platforms [{}]",
            repo.namespace.name,
            repo.platforms
        );
    }

    Ok(groups.into_values().collect())
}
