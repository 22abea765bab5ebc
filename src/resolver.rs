//! Symbol & type resolver
//!
//! [`SymbolTable`] is built once per compilation run from the merged
//! repositories of every namespace. Building indexes everything first; after
//! that the table is only read, so it can be shared freely between the
//! decision engine and the documentation transformer.

use crate::ast::{Node, NodeKind};
use crate::error::{CompilerError, Result};
use crate::model::{split_qualified, Namespace, RegisteredType, Repository, TypeRef};
use crate::types::Primitive;
use crate::utils::to_java_simple_type;
use std::collections::{HashMap, HashSet};

/// A declaration found through its native symbol identifier
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'a> {
    pub namespace: &'a str,
    /// Declaring type, or `None` for namespace-level declarations
    pub owner: Option<&'a str>,
    pub name: &'a str,
    pub node: &'a Node,
}

impl<'a> Symbol<'a> {
    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }
}

/// Outcome of resolving a type reference
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    Registered { namespace: &'a str, ty: &'a RegisteredType },
    Primitive(Primitive),
}

impl<'a> ResolvedType<'a> {
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(*p),
            Self::Registered { .. } => None,
        }
    }

    pub fn registered(&self) -> Option<(&'a str, &'a RegisteredType)> {
        match self {
            Self::Registered { namespace, ty } => Some((*namespace, *ty)),
            Self::Primitive(_) => None,
        }
    }
}

pub struct SymbolTable<'a> {
    namespaces: HashMap<&'a str, &'a Namespace>,
    order: Vec<&'a str>,
    packages: HashMap<String, String>,
    package_prefix: String,
    by_c_identifier: HashMap<&'a str, Symbol<'a>>,
    by_c_type: HashMap<&'a str, (&'a str, &'a RegisteredType)>,
}

impl<'a> SymbolTable<'a> {
    /// Index all repositories. `packages` overrides the default package name
    /// of individual namespaces.
    pub fn build(
        repositories: &'a [Repository],
        package_prefix: &str,
        packages: &HashMap<String, String>,
    ) -> Self {
        let mut table = Self {
            namespaces: HashMap::new(),
            order: Vec::new(),
            packages: packages.clone(),
            package_prefix: package_prefix.to_string(),
            by_c_identifier: HashMap::new(),
            by_c_type: HashMap::new(),
        };

        for repo in repositories {
            let ns = &repo.namespace;
            if table.namespaces.insert(ns.name.as_str(), ns).is_none() {
                table.order.push(ns.name.as_str());
            }
            table.index_namespace(ns);
        }

        log::debug!(
            "Symbol table: {} namespaces, {} identifiers, {} native types",
            table.order.len(),
            table.by_c_identifier.len(),
            table.by_c_type.len()
        );

        table
    }

    fn index_namespace(&mut self, ns: &'a Namespace) {
        let namespace = ns.name.as_str();

        for function in &ns.functions {
            self.add_identifier(namespace, None, function, function.c_identifier());
        }
        for constant in &ns.constants {
            self.add_identifier(namespace, None, constant, constant.c_type());
        }

        for (type_name, rt) in &ns.types {
            let type_name = type_name.as_str();
            if let Some(c_type) = rt.c_type().or_else(|| rt.glib_type_name()) {
                self.by_c_type.entry(c_type).or_insert((namespace, rt));
            }

            for child in rt.node().children() {
                match child.kind {
                    NodeKind::Constructor | NodeKind::Method | NodeKind::Function | NodeKind::Member => {
                        self.add_identifier(namespace, Some(type_name), child, child.c_identifier());
                    }
                    _ => {}
                }
            }
        }
    }

    fn add_identifier(&mut self, namespace: &'a str, owner: Option<&'a str>, node: &'a Node, ident: Option<&'a str>) {
        let (Some(ident), Some(name)) = (ident, node.name()) else {
            return;
        };
        if self.by_c_identifier.contains_key(ident) {
            log::trace!("Duplicate native identifier {}", ident);
            return;
        }
        self.by_c_identifier.insert(ident, Symbol { namespace, owner, name, node });
    }

    /// Namespaces in the order they were indexed
    pub fn namespaces(&self) -> impl Iterator<Item = &'a Namespace> + '_ {
        self.order.iter().filter_map(|name| self.namespaces.get(name).copied())
    }

    pub fn namespace(&self, name: &str) -> Option<&'a Namespace> {
        self.namespaces.get(name).copied()
    }

    /// Java package of a namespace: "Gtk" -> "org.gnome.gtk"
    pub fn package(&self, namespace: &str) -> String {
        match self.packages.get(namespace) {
            Some(package) => package.clone(),
            None => format!("{}.{}", self.package_prefix, namespace.to_lowercase()),
        }
    }

    /// Fully qualified Java class name of a declared type
    pub fn qualified_java_name(&self, namespace: &str, type_name: &str) -> String {
        format!("{}.{}", self.package(namespace), to_java_simple_type(type_name))
    }

    pub fn by_c_identifier(&self, ident: &str) -> Option<&Symbol<'a>> {
        self.by_c_identifier.get(ident)
    }

    pub fn by_c_type(&self, c_type: &str) -> Option<(&'a str, &'a RegisteredType)> {
        self.by_c_type.get(c_type).copied()
    }

    /// Look up a declared type by a possibly qualified name
    pub fn lookup_type(&self, current_ns: &str, name: &str) -> Option<(&'a str, &'a RegisteredType)> {
        let (qualifier, bare) = split_qualified(name);
        let ns = self.namespace(qualifier.unwrap_or(current_ns))?;
        ns.get_type(bare).map(|rt| (ns.name.as_str(), rt))
    }

    /// Resolve a type name: declared types first, then the primitive table
    pub fn resolve_type(&self, current_ns: &str, declaration: &str, name: &str) -> Result<ResolvedType<'a>> {
        if let Some((namespace, ty)) = self.lookup_type(current_ns, name) {
            return Ok(ResolvedType::Registered { namespace, ty });
        }
        if let Some(primitive) = Primitive::from_name(name) {
            return Ok(ResolvedType::Primitive(primitive));
        }
        Err(CompilerError::unresolved(current_ns, declaration, name))
    }

    /// Resolve a `<type>` reference. Arrays are marshalled as pointers and
    /// resolve their element type only for validation.
    pub fn resolve_type_ref(&self, current_ns: &str, declaration: &str, type_ref: TypeRef<'_>) -> Result<ResolvedType<'a>> {
        if type_ref.is_array() {
            if let Some(name) = type_ref.element().and_then(|e| e.name()) {
                self.resolve_type(current_ns, declaration, name)?;
            }
            return Ok(ResolvedType::Primitive(Primitive::Pointer));
        }

        match type_ref.name() {
            Some(name) => self.resolve_type(current_ns, declaration, name),
            // Untyped references such as `<type c:type="GtkWidget*"/>` are opaque pointers
            None => Ok(ResolvedType::Primitive(Primitive::Pointer)),
        }
    }

    /// Follow alias chains to the first non-alias target
    pub fn underlying(&self, resolved: ResolvedType<'a>, declaration: &str) -> Result<ResolvedType<'a>> {
        let mut current = resolved;
        let mut seen = HashSet::new();

        loop {
            let (namespace, ty) = match current {
                ResolvedType::Registered { namespace, ty } if matches!(ty, RegisteredType::Alias(_)) => (namespace, ty),
                _ => return Ok(current),
            };
            if !seen.insert((namespace, ty.name())) {
                return Err(CompilerError::unsupported(
                    namespace,
                    declaration,
                    format!("alias cycle through {}", ty.name()),
                ));
            }
            let target = ty.alias_target().ok_or_else(|| {
                CompilerError::unsupported(namespace, declaration, format!("alias {} has no target", ty.name()))
            })?;
            current = self.resolve_type_ref(namespace, declaration, target)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_repository;
    use crate::types::{Platform, DEFAULT_PACKAGE_PREFIX};

    const GOBJECT: &str = r#"<repository>
      <namespace name="GObject" version="2.0">
        <class name="Object" c:type="GObject">
          <method name="ref_sink" c:identifier="g_object_ref_sink"/>
        </class>
        <alias name="SignalCMarshaller" c:type="GSignalCMarshaller"><type name="ClosureMarshal"/></alias>
        <callback name="ClosureMarshal" c:type="GClosureMarshal"/>
      </namespace>
    </repository>"#;

    const GTK: &str = r#"<repository>
      <namespace name="Gtk" version="4.0">
        <class name="Widget" c:type="GtkWidget" parent="GObject.InitiallyUnowned">
          <method name="show" c:identifier="gtk_widget_show"/>
        </class>
        <alias name="Allocation" c:type="GtkAllocation"><type name="Gdk.Rectangle"/></alias>
        <alias name="Loop" c:type="GtkLoop"><type name="Loop"/></alias>
        <enumeration name="Align" c:type="GtkAlign">
          <member name="fill" value="0" c:identifier="GTK_ALIGN_FILL"/>
        </enumeration>
        <function name="init" c:identifier="gtk_init"/>
        <constant name="MAJOR_VERSION" value="4" c:type="GTK_MAJOR_VERSION"><type name="gint"/></constant>
      </namespace>
    </repository>"#;

    fn repositories() -> Vec<Repository> {
        vec![
            parse_repository(GTK, "Gtk-4.0.gir", Platform::ALL).unwrap(),
            parse_repository(GOBJECT, "GObject-2.0.gir", Platform::ALL).unwrap(),
        ]
    }

    #[test]
    fn test_forward_qualified_reference() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());

        let resolved = table.resolve_type("Gtk", "Widget", "GObject.Object").unwrap();
        let (ns, ty) = resolved.registered().unwrap();
        assert_eq!(ns, "GObject");
        assert_eq!(ty.name(), "Object");

        assert!(table.resolve_type("Gtk", "Widget", "Widget").unwrap().registered().is_some());
        assert_eq!(
            table.resolve_type("Gtk", "init", "gboolean").unwrap().primitive(),
            Some(Primitive::Boolean)
        );
    }

    #[test]
    fn test_unresolved_type() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        let err = table.resolve_type("Gtk", "Widget.frob", "Frobnicator").unwrap_err();
        assert!(matches!(err, CompilerError::UnresolvedType { .. }));
        assert!(table.resolve_type("Gtk", "x", "Gdk.Rectangle").is_err());
    }

    #[test]
    fn test_lookup_tables() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());

        let show = table.by_c_identifier("gtk_widget_show").unwrap();
        assert_eq!((show.namespace, show.owner, show.name), ("Gtk", Some("Widget"), "show"));
        assert_eq!(table.by_c_identifier("gtk_init").unwrap().owner, None);
        assert_eq!(table.by_c_identifier("GTK_ALIGN_FILL").unwrap().kind(), NodeKind::Member);
        assert_eq!(table.by_c_identifier("GTK_MAJOR_VERSION").unwrap().kind(), NodeKind::Constant);
        assert_eq!(table.by_c_type("GtkWidget").unwrap().1.name(), "Widget");
        assert!(table.by_c_type("GtkButton").is_none());
    }

    #[test]
    fn test_packages() {
        let repos = repositories();
        let mut overrides = HashMap::new();
        overrides.insert("GObject".to_string(), "org.gnome.gobject.core".to_string());
        let table = SymbolTable::build(&repos, "org.example", &overrides);

        assert_eq!(table.package("Gtk"), "org.example.gtk");
        assert_eq!(table.package("GObject"), "org.gnome.gobject.core");
        assert_eq!(table.qualified_java_name("Gtk", "widget_paintable"), "org.example.gtk.WidgetPaintable");
        assert_eq!(table.namespaces().map(|ns| ns.name.as_str()).collect::<Vec<_>>(), vec!["Gtk", "GObject"]);
    }

    #[test]
    fn test_alias_chains() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());

        let alias = table.resolve_type("GObject", "x", "SignalCMarshaller").unwrap();
        let target = table.underlying(alias, "x").unwrap();
        assert!(matches!(target.registered(), Some((_, RegisteredType::Callback(_)))));

        let looping = table.resolve_type("Gtk", "x", "Loop").unwrap();
        assert!(matches!(table.underlying(looping, "x"), Err(CompilerError::UnsupportedConstruct { .. })));

        let dangling = table.resolve_type("Gtk", "x", "Allocation").unwrap();
        assert!(matches!(table.underlying(dangling, "x"), Err(CompilerError::UnresolvedType { .. })));
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<SymbolTable<'static>>();
    }
}
