//! Typed model over the node tree: repositories, namespaces, registered types
//! and borrowed views for callables, parameters and type references.

use crate::ast::{Node, NodeKind};
use crate::types::{Direction, Platform, TransferOwnership, When};
use indexmap::IndexMap;

/// One parsed GIR document
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub includes: Vec<Include>,
    pub packages: Vec<String>,
    pub c_includes: Vec<String>,
    pub namespace: Namespace,
    pub platforms: Platform,
}

/// Dependency on another namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub name: String,
    pub version: Option<String>,
}

/// All top-level declarations of one library
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub version: String,
    pub attributes: IndexMap<String, String>,
    pub types: IndexMap<String, RegisteredType>,
    pub functions: Vec<Node>,
    pub constants: Vec<Node>,
    /// Function macros, inline functions, docsections
    pub other: Vec<Node>,
    pub platforms: Platform,
}

impl Namespace {
    pub fn new(name: impl Into<String>, version: impl Into<String>, platforms: Platform) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            attributes: IndexMap::new(),
            types: IndexMap::new(),
            functions: Vec::new(),
            constants: Vec::new(),
            other: Vec::new(),
            platforms,
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&RegisteredType> {
        self.types.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Node> {
        self.functions.iter().find(|f| f.name() == Some(name))
    }

    pub fn constant(&self, name: &str) -> Option<&Node> {
        self.constants.iter().find(|c| c.name() == Some(name))
    }

    pub fn shared_library(&self) -> Option<&str> {
        self.attributes.get("shared-library").map(String::as_str)
    }
}

/// Closed set of type declarations. Bitfields are flag-style enumerations and
/// share the `Enumeration` variant; the node kind tells them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisteredType {
    Alias(Node),
    Boxed(Node),
    Callback(Node),
    Class(Node),
    Enumeration(Node),
    Interface(Node),
    Record(Node),
    Union(Node),
}

impl RegisteredType {
    pub fn from_node(node: Node) -> Option<Self> {
        let rt = match node.kind {
            NodeKind::Alias => Self::Alias(node),
            NodeKind::Boxed => Self::Boxed(node),
            NodeKind::Callback => Self::Callback(node),
            NodeKind::Class => Self::Class(node),
            NodeKind::Enumeration | NodeKind::Bitfield => Self::Enumeration(node),
            NodeKind::Interface => Self::Interface(node),
            NodeKind::Record => Self::Record(node),
            NodeKind::Union => Self::Union(node),
            _ => return None,
        };
        Some(rt)
    }

    pub fn node(&self) -> &Node {
        match self {
            Self::Alias(n)
            | Self::Boxed(n)
            | Self::Callback(n)
            | Self::Class(n)
            | Self::Enumeration(n)
            | Self::Interface(n)
            | Self::Record(n)
            | Self::Union(n) => n,
        }
    }

    pub(crate) fn node_mut(&mut self) -> &mut Node {
        match self {
            Self::Alias(n)
            | Self::Boxed(n)
            | Self::Callback(n)
            | Self::Class(n)
            | Self::Enumeration(n)
            | Self::Interface(n)
            | Self::Record(n)
            | Self::Union(n) => n,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Alias(_) => "alias",
            Self::Boxed(_) => "boxed",
            Self::Callback(_) => "callback",
            Self::Class(_) => "class",
            Self::Enumeration(_) => "enumeration",
            Self::Interface(_) => "interface",
            Self::Record(_) => "record",
            Self::Union(_) => "union",
        }
    }

    /// The parser guarantees that every registered type is named
    pub fn name(&self) -> &str {
        self.node().name().unwrap_or_default()
    }

    pub fn c_type(&self) -> Option<&str> {
        self.node().c_type()
    }

    pub fn platforms(&self) -> Platform {
        self.node().platforms()
    }

    pub fn doc(&self) -> Option<&str> {
        self.node().doc()
    }

    pub fn is_bitfield(&self) -> bool {
        self.node().kind == NodeKind::Bitfield
    }

    pub fn glib_type_name(&self) -> Option<&str> {
        self.node().attr("glib:type-name")
    }

    pub fn get_type_func(&self) -> Option<&str> {
        self.node().attr("glib:get-type")
    }

    /// Parent class reference of a Class, possibly namespace-qualified
    pub fn parent_ref(&self) -> Option<&str> {
        match self {
            Self::Class(n) => n.attr("parent"),
            _ => None,
        }
    }

    pub fn is_abstract(&self) -> bool {
        self.node().attr_bool("abstract", false)
    }

    pub fn is_final(&self) -> bool {
        self.node().attr_bool("final", false)
    }

    pub fn error_domain(&self) -> Option<&str> {
        match self {
            Self::Enumeration(n) => n.attr("glib:error-domain").or_else(|| n.attr("error-domain")),
            _ => None,
        }
    }

    pub fn disguised(&self) -> bool {
        self.node().attr_bool("disguised", false)
    }

    pub fn opaque(&self) -> bool {
        self.node().attr_bool("opaque", false)
    }

    pub fn pointer(&self) -> bool {
        self.node().attr_bool("pointer", false)
    }

    pub fn foreign(&self) -> bool {
        self.node().attr_bool("foreign", false)
    }

    pub fn is_gtype_struct_for(&self) -> Option<&str> {
        self.node().attr("glib:is-gtype-struct-for")
    }

    pub fn copy_function(&self) -> Option<&str> {
        self.node().attr("copy-function")
    }

    pub fn free_function(&self) -> Option<&str> {
        self.node().attr("free-function")
    }

    /// A struct without any fields or unions cannot be allocated by value
    pub fn has_no_layout(&self) -> bool {
        self.fields().next().is_none() && self.node().child(NodeKind::Union).is_none()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node().children_of(NodeKind::Field)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node().children_of(NodeKind::Method)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods().any(|m| m.name() == Some(name))
    }

    pub fn implements(&self) -> impl Iterator<Item = &str> + '_ {
        self.node()
            .children_of(NodeKind::Implements)
            .filter_map(|n| n.name())
    }

    pub fn prerequisites(&self) -> impl Iterator<Item = &str> + '_ {
        self.node()
            .children_of(NodeKind::Prerequisite)
            .filter_map(|n| n.name())
    }

    /// Enumeration members
    pub fn members(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node().children_of(NodeKind::Member)
    }

    /// Every callable child in declaration order
    pub fn callables(&self) -> impl Iterator<Item = Callable<'_>> + '_ {
        self.node().children().iter().filter_map(Callable::new)
    }

    /// Target type of an Alias
    pub fn alias_target(&self) -> Option<TypeRef<'_>> {
        match self {
            Self::Alias(n) => TypeRef::from_parent(n),
            _ => None,
        }
    }
}

/// Borrowed view of a function, method, constructor, signal or callback
/// node. Virtual methods are not bound and never become callables.
#[derive(Debug, Clone, Copy)]
pub struct Callable<'a> {
    node: &'a Node,
}

impl<'a> Callable<'a> {
    pub fn new(node: &'a Node) -> Option<Self> {
        node.kind.is_callable().then_some(Self { node })
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn name(&self) -> &'a str {
        self.node.name().unwrap_or_default()
    }

    pub fn c_identifier(&self) -> Option<&'a str> {
        self.node.c_identifier()
    }

    pub fn deprecated(&self) -> bool {
        self.node.deprecated()
    }

    pub fn throws(&self) -> bool {
        self.node.attr_bool("throws", false)
    }

    pub fn introspectable(&self) -> bool {
        self.node.introspectable()
    }

    pub fn shadowed_by(&self) -> Option<&'a str> {
        self.node.attr("shadowed-by")
    }

    pub fn shadows(&self) -> Option<&'a str> {
        self.node.attr("shadows")
    }

    pub fn moved_to(&self) -> Option<&'a str> {
        self.node.attr("moved-to")
    }

    pub fn platforms(&self) -> Platform {
        self.node.platforms()
    }

    pub fn doc(&self) -> Option<&'a str> {
        self.node.doc()
    }

    /// Explicit parameters, without the instance parameter
    pub fn parameters(&self) -> Vec<Parameter<'a>> {
        self.node
            .child(NodeKind::Parameters)
            .map(|ps| {
                ps.children_of(NodeKind::Parameter)
                    .map(|node| Parameter { node })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn instance_parameter(&self) -> Option<Parameter<'a>> {
        self.node
            .child(NodeKind::Parameters)
            .and_then(|ps| ps.child(NodeKind::InstanceParameter))
            .map(|node| Parameter { node })
    }

    pub fn return_value(&self) -> Option<Parameter<'a>> {
        self.node
            .child(NodeKind::ReturnValue)
            .map(|node| Parameter { node })
    }

    // Signal attributes

    pub fn detailed(&self) -> bool {
        self.node.attr_bool("detailed", false)
    }

    pub fn action(&self) -> bool {
        self.node.attr_bool("action", false)
    }

    pub fn no_hooks(&self) -> bool {
        self.node.attr_bool("no-hooks", false)
    }

    pub fn no_recurse(&self) -> bool {
        self.node.attr_bool("no-recurse", false)
    }

    pub fn when(&self) -> When {
        When::from_attr(self.node.attr("when"))
    }
}

/// Borrowed view of a parameter, instance parameter or return value
#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    node: &'a Node,
}

impl<'a> Parameter<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.name()
    }

    pub fn type_ref(&self) -> Option<TypeRef<'a>> {
        TypeRef::from_parent(self.node)
    }

    pub fn transfer_ownership(&self) -> TransferOwnership {
        TransferOwnership::from_attr(self.node.attr("transfer-ownership"))
    }

    pub fn nullable(&self) -> bool {
        self.node.attr_bool("nullable", false) || self.node.attr_bool("allow-none", false)
    }

    pub fn optional(&self) -> bool {
        self.node.attr_bool("optional", false)
    }

    pub fn direction(&self) -> Direction {
        Direction::from_attr(self.node.attr("direction"))
    }

    pub fn caller_allocates(&self) -> bool {
        self.node.attr_bool("caller-allocates", false)
    }

    pub fn is_varargs(&self) -> bool {
        self.node.child(NodeKind::Varargs).is_some() || self.name() == Some("...")
    }

    /// Index of the parameter that holds this array's length
    pub fn array_length(&self) -> Option<usize> {
        self.type_ref().and_then(|t| t.length())
    }

    /// Index of the user-data parameter of a callback parameter
    pub fn closure(&self) -> Option<usize> {
        self.node.attr("closure").and_then(|v| v.parse().ok())
    }

    /// Index of the destroy-notify parameter of a callback parameter
    pub fn destroy(&self) -> Option<usize> {
        self.node.attr("destroy").and_then(|v| v.parse().ok())
    }

    pub fn scope(&self) -> Option<&'a str> {
        self.node.attr("scope")
    }

    pub fn doc(&self) -> Option<&'a str> {
        self.node.doc()
    }
}

/// Deferred reference to a type: a `<type>` or `<array>` element. Nothing is
/// looked up here; the resolver interprets the name once every namespace is
/// indexed.
#[derive(Debug, Clone, Copy)]
pub struct TypeRef<'a> {
    node: &'a Node,
}

impl<'a> TypeRef<'a> {
    pub fn new(node: &'a Node) -> Option<Self> {
        matches!(node.kind, NodeKind::Type | NodeKind::Array).then_some(Self { node })
    }

    /// First `<type>` or `<array>` child of a parameter, field, alias or constant
    pub fn from_parent(parent: &'a Node) -> Option<Self> {
        parent
            .children()
            .iter()
            .find(|c| matches!(c.kind, NodeKind::Type | NodeKind::Array))
            .map(|node| Self { node })
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn is_array(&self) -> bool {
        self.node.kind == NodeKind::Array
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.name()
    }

    pub fn c_type(&self) -> Option<&'a str> {
        self.node.c_type()
    }

    pub fn is_pointer(&self) -> bool {
        self.c_type().map(|c| c.ends_with('*')).unwrap_or(false)
    }

    /// Element type of an array
    pub fn element(&self) -> Option<TypeRef<'a>> {
        if self.is_array() {
            TypeRef::from_parent(self.node)
        } else {
            None
        }
    }

    pub fn length(&self) -> Option<usize> {
        self.node.attr("length").and_then(|v| v.parse().ok())
    }

    pub fn fixed_size(&self) -> Option<usize> {
        self.node.attr("fixed-size").and_then(|v| v.parse().ok())
    }

    pub fn zero_terminated(&self) -> bool {
        self.node.attr_bool("zero-terminated", false)
    }
}

/// Split "Gtk.Widget" into (Some("Gtk"), "Widget"); unqualified names have no namespace
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((ns, rest)) if !ns.is_empty() => (Some(ns), rest),
        _ => (None, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_method() -> Node {
        Node::with_attrs(
            NodeKind::Method,
            &[("name", "set_label"), ("c:identifier", "gtk_button_set_label"), ("throws", "1")],
            vec![
                Node::with_attrs(
                    NodeKind::ReturnValue,
                    &[("transfer-ownership", "none")],
                    vec![Node::with_attrs(NodeKind::Type, &[("name", "none"), ("c:type", "void")], vec![])],
                ),
                Node::with_attrs(
                    NodeKind::Parameters,
                    &[],
                    vec![
                        Node::with_attrs(
                            NodeKind::InstanceParameter,
                            &[("name", "button")],
                            vec![Node::with_attrs(NodeKind::Type, &[("name", "Button"), ("c:type", "GtkButton*")], vec![])],
                        ),
                        Node::with_attrs(
                            NodeKind::Parameter,
                            &[("name", "label"), ("nullable", "1"), ("transfer-ownership", "full")],
                            vec![Node::with_attrs(NodeKind::Type, &[("name", "utf8"), ("c:type", "const char*")], vec![])],
                        ),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_callable_view() {
        let node = sample_method();
        let callable = Callable::new(&node).unwrap();
        assert_eq!(callable.name(), "set_label");
        assert!(callable.throws());
        assert!(!callable.deprecated());
        assert_eq!(callable.parameters().len(), 1);
        assert!(callable.instance_parameter().is_some());

        let label = callable.parameters()[0];
        assert!(label.nullable());
        assert_eq!(label.transfer_ownership(), TransferOwnership::Full);
        assert_eq!(label.type_ref().unwrap().name(), Some("utf8"));
        assert!(label.type_ref().unwrap().is_pointer());
    }

    #[test]
    fn test_bitfield_is_enumeration() {
        let node = Node::with_attrs(NodeKind::Bitfield, &[("name", "StateFlags")], vec![]);
        let rt = RegisteredType::from_node(node).unwrap();
        assert!(matches!(rt, RegisteredType::Enumeration(_)));
        assert!(rt.is_bitfield());
        assert_eq!(rt.name(), "StateFlags");
    }

    #[test]
    fn test_array_type_ref() {
        let array = Node::with_attrs(
            NodeKind::Array,
            &[("length", "2"), ("c:type", "guint8*")],
            vec![Node::with_attrs(NodeKind::Type, &[("name", "guint8")], vec![])],
        );
        let t = TypeRef::new(&array).unwrap();
        assert!(t.is_array());
        assert_eq!(t.length(), Some(2));
        assert_eq!(t.element().unwrap().name(), Some("guint8"));
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("Gtk.Widget"), (Some("Gtk"), "Widget"));
        assert_eq!(split_qualified("Widget"), (None, "Widget"));
    }
}
