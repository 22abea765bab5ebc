//! Tree builder: GIR tokens to a typed repository tree
//!
//! The builder only shapes the document. It does not look at type names,
//! so a document may refer to namespaces that have not been read yet.

use crate::ast::{Node, NodeKind};
use crate::error::{CompilerError, Result};
use crate::lexer::{Lexer, Token, TokenType};
use crate::model::{Include, Namespace, RegisteredType, Repository};
use crate::types::Platform;
use indexmap::IndexMap;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    filename: String,
    platform: Platform,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, filename: impl Into<String>, platform: Platform) -> Self {
        Self {
            tokens,
            position: 0,
            filename: filename.into(),
            platform,
        }
    }

    pub fn parse(&mut self) -> Result<Repository> {
        let root = self.parse_document()?;
        self.build_repository(root)
    }

    /// Parse the element tree without interpreting it
    pub fn parse_document(&mut self) -> Result<Node> {
        let mut root = None;

        loop {
            let token = self.advance();
            match token.token_type {
                TokenType::Eof => break,
                TokenType::Comment(_) | TokenType::Declaration(_) => {}
                TokenType::Text(text) if text.trim().is_empty() => {}
                TokenType::StartTag { name, attributes, self_closing } => {
                    if root.is_some() {
                        return Err(self.error(token.line, "Multiple root elements"));
                    }
                    root = Some(self.parse_element(&name, attributes, self_closing, token.line)?);
                }
                other => {
                    return Err(self.error(token.line, format!("Unexpected {} outside the root element", other)));
                }
            }
        }

        root.ok_or_else(|| self.error(1, "Empty document"))
    }

    fn parse_element(
        &mut self,
        tag: &str,
        attributes: Vec<(String, String)>,
        self_closing: bool,
        line: usize,
    ) -> Result<Node> {
        let kind = NodeKind::from_tag(tag)
            .ok_or_else(|| self.error(line, format!("Unknown element <{}>", tag)))?;

        let attributes: IndexMap<String, String> = attributes.into_iter().collect();
        let mut children = Vec::new();
        let mut text = String::new();

        if !self_closing {
            loop {
                let token = self.advance();
                match token.token_type {
                    TokenType::StartTag { name, attributes, self_closing } => {
                        children.push(self.parse_element(&name, attributes, self_closing, token.line)?);
                    }
                    TokenType::EndTag(name) => {
                        if name != tag {
                            return Err(self.error(
                                token.line,
                                format!("Expected </{}>, found </{}>", tag, name),
                            ));
                        }
                        break;
                    }
                    TokenType::Text(content) => {
                        if kind.holds_text() {
                            text.push_str(&content);
                        } else if !content.trim().is_empty() {
                            return Err(self.error(
                                token.line,
                                format!("Unexpected character data in <{}>", tag),
                            ));
                        }
                    }
                    TokenType::Comment(_) | TokenType::Declaration(_) => {}
                    TokenType::Eof => {
                        return Err(self.error(token.line, format!("Unclosed element <{}>", tag)));
                    }
                }
            }
        }

        Ok(Node::new(kind, attributes, children, self.platform)
            .with_text(text)
            .with_line(line))
    }

    fn build_repository(&self, root: Node) -> Result<Repository> {
        if root.kind != NodeKind::Repository {
            return Err(self.error(root.line(), format!("Expected <repository>, found <{}>", root.kind.tag())));
        }

        let mut includes = Vec::new();
        let mut packages = Vec::new();
        let mut c_includes = Vec::new();
        let mut namespace = None;

        for child in root.children() {
            match child.kind {
                NodeKind::Include => includes.push(Include {
                    name: self.required_name(child)?.to_string(),
                    version: child.version().map(str::to_string),
                }),
                NodeKind::Package => packages.push(self.required_name(child)?.to_string()),
                NodeKind::CInclude => c_includes.push(self.required_name(child)?.to_string()),
                NodeKind::Namespace => {
                    if namespace.is_some() {
                        return Err(self.error(child.line(), "Multiple <namespace> elements in one repository"));
                    }
                    namespace = Some(self.build_namespace(child)?);
                }
                NodeKind::Doc | NodeKind::Attribute => {}
                other => {
                    return Err(self.error(child.line(), format!("<{}> is not allowed in <repository>", other.tag())));
                }
            }
        }

        let namespace = namespace.ok_or_else(|| self.error(root.line(), "Repository has no <namespace>"))?;

        log::debug!(
            "Parsed {} {} from {} ({} types, {} functions, {} constants)",
            namespace.name,
            namespace.version,
            self.filename,
            namespace.types.len(),
            namespace.functions.len(),
            namespace.constants.len()
        );

        Ok(Repository {
            includes,
            packages,
            c_includes,
            namespace,
            platforms: self.platform,
        })
    }

    fn build_namespace(&self, node: &Node) -> Result<Namespace> {
        let name = self.required_name(node)?;
        let version = node.version().unwrap_or_default();
        let mut namespace = Namespace::new(name, version, self.platform);

        for (key, value) in node.attributes() {
            if key != "name" && key != "version" {
                namespace.attributes.insert(key.clone(), value.clone());
            }
        }

        for child in node.children() {
            match child.kind {
                NodeKind::Alias
                | NodeKind::Boxed
                | NodeKind::Callback
                | NodeKind::Class
                | NodeKind::Interface
                | NodeKind::Record
                | NodeKind::Union
                | NodeKind::Enumeration
                | NodeKind::Bitfield => {
                    let type_name = self.required_name(child)?.to_string();
                    if namespace.types.contains_key(&type_name) {
                        return Err(self.error(child.line(), format!("Duplicate type '{}' in namespace {}", type_name, name)));
                    }
                    if let Some(rt) = RegisteredType::from_node(child.clone()) {
                        namespace.types.insert(type_name, rt);
                    }
                }
                NodeKind::Function => {
                    self.required_name(child)?;
                    namespace.functions.push(child.clone());
                }
                NodeKind::Constant => {
                    self.required_name(child)?;
                    namespace.constants.push(child.clone());
                }
                NodeKind::FunctionMacro
                | NodeKind::FunctionInline
                | NodeKind::Docsection
                | NodeKind::Doc
                | NodeKind::Attribute => namespace.other.push(child.clone()),
                other => {
                    return Err(self.error(child.line(), format!("<{}> is not allowed in <namespace>", other.tag())));
                }
            }
        }

        Ok(namespace)
    }

    fn required_name<'n>(&self, node: &'n Node) -> Result<&'n str> {
        node.name()
            .ok_or_else(|| self.error(node.line(), format!("<{}> without a name attribute", node.kind.tag())))
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens.get(self.position).cloned().unwrap_or(Token {
            token_type: TokenType::Eof,
            line: 0,
            column: 0,
        });
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn error(&self, line: usize, message: impl Into<String>) -> CompilerError {
        CompilerError::schema(&self.filename, line, message)
    }
}

/// Tokenize and build one GIR document for a platform
pub fn parse_repository(source: &str, filename: &str, platform: Platform) -> Result<Repository> {
    let mut lexer = Lexer::new(source, filename);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens, filename, platform);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIR: &str = r#"<?xml version="1.0"?>
<repository version="1.2" xmlns="http://www.gtk.org/introspection/core/1.0">
  <include name="GObject" version="2.0"/>
  <package name="gtk4"/>
  <c:include name="gtk/gtk.h"/>
  <namespace name="Gtk" version="4.0" shared-library="libgtk-4.so.1" c:identifier-prefixes="Gtk">
    <class name="Button" c:type="GtkButton" parent="Widget" glib:get-type="gtk_button_get_type">
      <doc xml:space="preserve">A #GtkButton &amp; friends.</doc>
      <constructor name="new" c:identifier="gtk_button_new">
        <return-value transfer-ownership="none">
          <type name="Widget" c:type="GtkWidget*"/>
        </return-value>
      </constructor>
    </class>
    <bitfield name="StateFlags" c:type="GtkStateFlags">
      <member name="normal" value="0" c:identifier="GTK_STATE_FLAG_NORMAL"/>
    </bitfield>
    <function name="init" c:identifier="gtk_init">
      <return-value transfer-ownership="none"><type name="none" c:type="void"/></return-value>
    </function>
    <constant name="MAJOR_VERSION" value="4" c:type="GTK_MAJOR_VERSION">
      <type name="gint" c:type="gint"/>
    </constant>
  </namespace>
</repository>
"#;

    #[test]
    fn test_parse_repository() {
        let repo = parse_repository(GIR, "Gtk-4.0.gir", Platform::LINUX).unwrap();
        assert_eq!(repo.includes, vec![Include { name: "GObject".into(), version: Some("2.0".into()) }]);
        assert_eq!(repo.packages, vec!["gtk4"]);
        assert_eq!(repo.c_includes, vec!["gtk/gtk.h"]);

        let ns = &repo.namespace;
        assert_eq!(ns.name, "Gtk");
        assert_eq!(ns.version, "4.0");
        assert_eq!(ns.shared_library(), Some("libgtk-4.so.1"));
        assert_eq!(ns.types.keys().collect::<Vec<_>>(), vec!["Button", "StateFlags"]);
        assert_eq!(ns.functions.len(), 1);
        assert_eq!(ns.constants.len(), 1);

        let button = ns.get_type("Button").unwrap();
        assert!(matches!(button, RegisteredType::Class(_)));
        assert_eq!(button.platforms(), Platform::LINUX);
        assert_eq!(button.doc(), Some("A #GtkButton & friends."));
        assert_eq!(button.parent_ref(), Some("Widget"));
        assert!(ns.get_type("StateFlags").unwrap().is_bitfield());
    }

    #[test]
    fn test_unknown_element_is_schema_error() {
        let src = r#"<repository><namespace name="X"><gadget name="Y"/></namespace></repository>"#;
        let err = parse_repository(src, "x.gir", Platform::ALL).unwrap_err();
        assert!(matches!(err, CompilerError::Schema { .. }));
        assert!(err.to_string().contains("gadget"));
    }

    #[test]
    fn test_mismatched_end_tag() {
        let src = r#"<repository><namespace name="X"></repository></namespace>"#;
        assert!(parse_repository(src, "x.gir", Platform::ALL).is_err());
    }

    #[test]
    fn test_missing_namespace() {
        let src = r#"<repository><include name="GLib" version="2.0"/></repository>"#;
        assert!(parse_repository(src, "x.gir", Platform::ALL).is_err());
    }

    #[test]
    fn test_structural_errors_report_element_line() {
        let duplicate = "<repository>\n<namespace name=\"X\">\n<record name=\"A\"/>\n<record name=\"A\"/>\n</namespace>\n</repository>";
        match parse_repository(duplicate, "x.gir", Platform::ALL).unwrap_err() {
            CompilerError::Schema { line, message, .. } => {
                assert_eq!(line, 4);
                assert!(message.contains("Duplicate type 'A'"));
            }
            other => panic!("unexpected error: {}", other),
        }

        let misplaced = "<repository>\n<namespace name=\"X\">\n\n<member name=\"m\"/>\n</namespace>\n</repository>";
        let err = parse_repository(misplaced, "x.gir", Platform::ALL).unwrap_err();
        assert!(matches!(err, CompilerError::Schema { line: 4, .. }));

        let nameless = "<repository>\n<namespace name=\"X\">\n<function c:identifier=\"x_f\"/>\n</namespace>\n</repository>";
        let err = parse_repository(nameless, "x.gir", Platform::ALL).unwrap_err();
        assert!(matches!(err, CompilerError::Schema { line: 3, .. }));
    }

    #[test]
    fn test_forward_references_are_not_resolved() {
        let src = r#"<repository><namespace name="X" version="1">
            <alias name="Handle" c:type="XHandle"><type name="Later.Thing"/></alias>
        </namespace></repository>"#;
        let repo = parse_repository(src, "x.gir", Platform::ALL).unwrap();
        let alias = repo.namespace.get_type("Handle").unwrap();
        assert_eq!(alias.alias_target().unwrap().name(), Some("Later.Thing"));
    }
}
