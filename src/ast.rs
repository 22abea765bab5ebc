//! Generic node tree for introspection data
//!
//! Every element of a GIR document becomes a [`Node`]: a closed [`NodeKind`],
//! an ordered attribute map and an ordered list of children. Attribute values
//! are kept verbatim; typed accessors parse them on demand.

use crate::types::Platform;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Repository,
    Include,
    Package,
    CInclude,
    Namespace,

    // Registered types
    Alias,
    Boxed,
    Callback,
    Class,
    Interface,
    Record,
    Union,
    Enumeration,
    Bitfield,

    // Members
    Member,
    Constant,
    Field,
    Property,
    Constructor,
    Method,
    VirtualMethod,
    Function,
    FunctionMacro,
    FunctionInline,
    MethodInline,
    Signal,

    // Callable signature
    Parameters,
    Parameter,
    InstanceParameter,
    ReturnValue,
    Type,
    Array,
    Varargs,

    // Documentation and metadata
    Doc,
    DocDeprecated,
    DocVersion,
    DocStability,
    SourcePosition,
    Implements,
    Prerequisite,
    Attribute,
    Docsection,
}

impl NodeKind {
    /// Map an element name to its kind. Unknown elements have no kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "repository" => Self::Repository,
            "include" => Self::Include,
            "package" => Self::Package,
            "c:include" => Self::CInclude,
            "namespace" => Self::Namespace,
            "alias" => Self::Alias,
            "glib:boxed" | "boxed" => Self::Boxed,
            "callback" => Self::Callback,
            "class" => Self::Class,
            "interface" => Self::Interface,
            "record" => Self::Record,
            "union" => Self::Union,
            "enumeration" => Self::Enumeration,
            "bitfield" => Self::Bitfield,
            "member" => Self::Member,
            "constant" => Self::Constant,
            "field" => Self::Field,
            "property" => Self::Property,
            "constructor" => Self::Constructor,
            "method" => Self::Method,
            "virtual-method" => Self::VirtualMethod,
            "function" => Self::Function,
            "function-macro" => Self::FunctionMacro,
            "function-inline" => Self::FunctionInline,
            "method-inline" => Self::MethodInline,
            "glib:signal" | "signal" => Self::Signal,
            "parameters" => Self::Parameters,
            "parameter" => Self::Parameter,
            "instance-parameter" => Self::InstanceParameter,
            "return-value" => Self::ReturnValue,
            "type" => Self::Type,
            "array" => Self::Array,
            "varargs" => Self::Varargs,
            "doc" => Self::Doc,
            "doc-deprecated" => Self::DocDeprecated,
            "doc-version" => Self::DocVersion,
            "doc-stability" => Self::DocStability,
            "source-position" => Self::SourcePosition,
            "implements" => Self::Implements,
            "prerequisite" => Self::Prerequisite,
            "attribute" => Self::Attribute,
            "docsection" => Self::Docsection,
            _ => return None,
        };
        Some(kind)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Include => "include",
            Self::Package => "package",
            Self::CInclude => "c:include",
            Self::Namespace => "namespace",
            Self::Alias => "alias",
            Self::Boxed => "glib:boxed",
            Self::Callback => "callback",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Record => "record",
            Self::Union => "union",
            Self::Enumeration => "enumeration",
            Self::Bitfield => "bitfield",
            Self::Member => "member",
            Self::Constant => "constant",
            Self::Field => "field",
            Self::Property => "property",
            Self::Constructor => "constructor",
            Self::Method => "method",
            Self::VirtualMethod => "virtual-method",
            Self::Function => "function",
            Self::FunctionMacro => "function-macro",
            Self::FunctionInline => "function-inline",
            Self::MethodInline => "method-inline",
            Self::Signal => "glib:signal",
            Self::Parameters => "parameters",
            Self::Parameter => "parameter",
            Self::InstanceParameter => "instance-parameter",
            Self::ReturnValue => "return-value",
            Self::Type => "type",
            Self::Array => "array",
            Self::Varargs => "varargs",
            Self::Doc => "doc",
            Self::DocDeprecated => "doc-deprecated",
            Self::DocVersion => "doc-version",
            Self::DocStability => "doc-stability",
            Self::SourcePosition => "source-position",
            Self::Implements => "implements",
            Self::Prerequisite => "prerequisite",
            Self::Attribute => "attribute",
            Self::Docsection => "docsection",
        }
    }

    /// Elements whose content is character data rather than child elements
    pub fn holds_text(&self) -> bool {
        matches!(
            self,
            Self::Doc | Self::DocDeprecated | Self::DocVersion | Self::DocStability
        )
    }

    /// Kinds that occur at most once per parent, so two unnamed instances
    /// always describe the same thing
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            Self::Doc
                | Self::DocDeprecated
                | Self::DocVersion
                | Self::DocStability
                | Self::SourcePosition
                | Self::Parameters
                | Self::InstanceParameter
                | Self::ReturnValue
                | Self::Type
                | Self::Array
                | Self::Varargs
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Self::Constructor
                | Self::Method
                | Self::Function
                | Self::Signal
                | Self::Callback
        )
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
    text: String,
    platforms: Platform,
    /// Source line of the start tag, 0 for synthesized nodes
    line: usize,
}

// Source position is not part of a node's identity
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.attributes == other.attributes
            && self.children == other.children
            && self.text == other.text
            && self.platforms == other.platforms
    }
}

impl Node {
    pub fn new(kind: NodeKind, attributes: IndexMap<String, String>, children: Vec<Node>, platforms: Platform) -> Self {
        Self {
            kind,
            attributes,
            children,
            text: String::new(),
            platforms,
            line: 0,
        }
    }

    /// Convenience constructor for tests and synthesized nodes
    pub fn with_attrs(kind: NodeKind, attrs: &[(&str, &str)], children: Vec<Node>) -> Self {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(kind, attributes, children, Platform::ALL)
    }

    pub fn text_node(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            children: Vec::new(),
            text: text.into(),
            platforms: Platform::ALL,
            line: 0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Return a copy with the platform mask applied to this node and all descendants
    pub fn with_platforms(mut self, platforms: Platform) -> Self {
        self.set_platforms_recursive(platforms);
        self
    }

    fn set_platforms_recursive(&mut self, platforms: Platform) {
        self.platforms = platforms;
        for child in &mut self.children {
            child.set_platforms_recursive(platforms);
        }
    }

    /// Return a copy with only this node's mask changed
    pub(crate) fn with_own_platforms(mut self, platforms: Platform) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub(crate) fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn platforms(&self) -> Platform {
        self.platforms
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Parse a boolean attribute, "1"/"true" and "0"/"false"
    pub fn attr_bool(&self, key: &str, default: bool) -> bool {
        match self.attr(key) {
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            _ => default,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    pub fn c_type(&self) -> Option<&str> {
        self.attr("c:type")
    }

    pub fn c_identifier(&self) -> Option<&str> {
        self.attr("c:identifier")
    }

    pub fn deprecated(&self) -> bool {
        self.attr_bool("deprecated", false)
    }

    pub fn introspectable(&self) -> bool {
        self.attr_bool("introspectable", true)
    }

    pub fn version(&self) -> Option<&str> {
        self.attr("version")
    }

    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> + '_ {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Raw documentation text, if any
    pub fn doc(&self) -> Option<&str> {
        self.child(NodeKind::Doc).map(|d| d.text()).filter(|t| !t.is_empty())
    }

    pub fn doc_deprecated(&self) -> Option<&str> {
        self.child(NodeKind::DocDeprecated)
            .map(|d| d.text())
            .filter(|t| !t.is_empty())
    }

    /// Structural equality that ignores platform masks
    pub fn same_shape(&self, other: &Node) -> bool {
        self.kind == other.kind
            && self.attributes == other.attributes
            && self.text == other.text
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Whether two children of the same parent describe the same member:
    /// equal by name, or for unnamed nodes equal by kind (singletons) or shape
    pub fn is_same_member(&self, other: &Node) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match (self.name(), other.name()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.kind.is_singleton() || self.same_shape(other),
            _ => false,
        }
    }
}
