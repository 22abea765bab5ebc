//! Ownership classifier
//!
//! Decides per class whether new instances start with a floating reference
//! that the bindings must sink before treating the instance as owned.

use crate::model::RegisteredType;
use crate::resolver::SymbolTable;
use crate::types::{
    INITIALLY_UNOWNED_C_TYPE, INITIALLY_UNOWNED_NAME, OBJECT_NAMESPACE, OBJECT_ROOT_C_TYPE,
    OBJECT_ROOT_NAME, SINK_METHOD_NAME,
};
use std::collections::{HashMap, HashSet};

fn is_root(namespace: &str, rt: &RegisteredType, name: &str, c_type: &str) -> bool {
    (namespace == OBJECT_NAMESPACE && rt.name() == name) || rt.c_type() == Some(c_type)
}

fn is_object_root(namespace: &str, rt: &RegisteredType) -> bool {
    is_root(namespace, rt, OBJECT_ROOT_NAME, OBJECT_ROOT_C_TYPE)
}

fn is_initially_unowned(namespace: &str, rt: &RegisteredType) -> bool {
    is_root(namespace, rt, INITIALLY_UNOWNED_NAME, INITIALLY_UNOWNED_C_TYPE)
}

/// Whether the parent chain of a class reaches the initially-unowned root.
/// Unresolvable parents end the chain.
fn descends_from_initially_unowned(table: &SymbolTable<'_>, namespace: &str, rt: &RegisteredType) -> bool {
    let mut seen = HashSet::new();
    let mut current = (namespace.to_string(), rt);

    while let Some(parent) = current.1.parent_ref() {
        if !seen.insert((current.0.clone(), current.1.name().to_string())) {
            log::warn!("Class hierarchy cycle at {}.{}", current.0, current.1.name());
            return false;
        }
        let Some((parent_ns, parent_rt)) = table.lookup_type(&current.0, parent) else {
            return false;
        };
        if is_initially_unowned(parent_ns, parent_rt) {
            return true;
        }
        current = (parent_ns.to_string(), parent_rt);
    }

    false
}

/// Floating-reference flag of one class
pub fn is_floating(table: &SymbolTable<'_>, namespace: &str, rt: &RegisteredType) -> bool {
    if !matches!(rt, RegisteredType::Class(_)) {
        return false;
    }
    if is_object_root(namespace, rt) || is_initially_unowned(namespace, rt) {
        return false;
    }
    // Inherited from the initially-unowned root; the emitter handles it there
    if descends_from_initially_unowned(table, namespace, rt) {
        return false;
    }
    rt.has_method(SINK_METHOD_NAME)
}

/// Flags for every class of every namespace, computed once
#[derive(Debug, Default)]
pub struct OwnershipTable {
    floating: HashMap<(String, String), bool>,
}

impl OwnershipTable {
    pub fn build(table: &SymbolTable<'_>) -> Self {
        let mut floating = HashMap::new();

        for ns in table.namespaces() {
            for rt in ns.types.values() {
                if let RegisteredType::Class(_) = rt {
                    let flag = is_floating(table, &ns.name, rt);
                    if flag {
                        log::trace!("{}.{} is floating", ns.name, rt.name());
                    }
                    floating.insert((ns.name.clone(), rt.name().to_string()), flag);
                }
            }
        }

        Self { floating }
    }

    /// `None` for types that are not classes
    pub fn get(&self, namespace: &str, type_name: &str) -> Option<bool> {
        self.floating
            .get(&(namespace.to_string(), type_name.to_string()))
            .copied()
    }

    pub fn is_floating(&self, namespace: &str, type_name: &str) -> bool {
        self.get(namespace, type_name).unwrap_or(false)
    }

    pub fn floating_count(&self) -> usize {
        self.floating.values().filter(|f| **f).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Repository;
    use crate::parser::parse_repository;
    use crate::types::{Platform, DEFAULT_PACKAGE_PREFIX};

    const GOBJECT: &str = r#"<repository><namespace name="GObject" version="2.0">
        <class name="Object" c:type="GObject">
          <method name="ref_sink" c:identifier="g_object_ref_sink"/>
        </class>
        <class name="InitiallyUnowned" c:type="GInitiallyUnowned" parent="Object"/>
      </namespace></repository>"#;

    const GTK: &str = r#"<repository><namespace name="Gtk" version="4.0">
        <class name="Widget" c:type="GtkWidget" parent="GObject.InitiallyUnowned">
          <method name="ref_sink" c:identifier="gtk_widget_ref_sink"/>
        </class>
        <class name="Button" c:type="GtkButton" parent="Widget"/>
        <class name="ExpressionWatch" c:type="GtkExpressionWatch" parent="GObject.Object">
          <method name="ref_sink" c:identifier="gtk_expression_watch_ref_sink"/>
        </class>
        <class name="Settings" c:type="GtkSettings" parent="GObject.Object">
          <method name="reset_property" c:identifier="gtk_settings_reset_property"/>
        </class>
        <class name="Left" c:type="GtkLeft" parent="Right"/>
        <class name="Right" c:type="GtkRight" parent="Left"/>
        <record name="Border" c:type="GtkBorder"/>
      </namespace></repository>"#;

    fn repositories() -> Vec<Repository> {
        vec![
            parse_repository(GTK, "Gtk-4.0.gir", Platform::ALL).unwrap(),
            parse_repository(GOBJECT, "GObject-2.0.gir", Platform::ALL).unwrap(),
        ]
    }

    #[test]
    fn test_floating_classification() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        let ownership = OwnershipTable::build(&table);

        // Roots
        assert_eq!(ownership.get("GObject", "Object"), Some(false));
        assert_eq!(ownership.get("GObject", "InitiallyUnowned"), Some(false));
        // Initially unowned ancestry, sink method or not
        assert_eq!(ownership.get("Gtk", "Widget"), Some(false));
        assert_eq!(ownership.get("Gtk", "Button"), Some(false));
        // Sink method declared directly on the class
        assert_eq!(ownership.get("Gtk", "ExpressionWatch"), Some(true));
        // Neither
        assert_eq!(ownership.get("Gtk", "Settings"), Some(false));
        // Not a class
        assert_eq!(ownership.get("Gtk", "Border"), None);

        assert_eq!(ownership.floating_count(), 1);
    }

    #[test]
    fn test_inherited_sink_method_does_not_count() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        let (ns, settings) = table.lookup_type("Gtk", "Settings").unwrap();
        assert!(!is_floating(&table, ns, settings));
    }

    #[test]
    fn test_hierarchy_cycle_terminates() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        let (ns, left) = table.lookup_type("Gtk", "Left").unwrap();
        assert!(!is_floating(&table, ns, left));
    }
}
