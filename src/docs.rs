//! Documentation markup transformer
//!
//! GtkDoc markdown is converted to Javadoc with one alternation of named
//! patterns, scanned left to right. Matches are replaced by their rendering;
//! everything between matches is copied verbatim. The only state is whether
//! a bullet list is open.

use crate::ast::{Node, NodeKind};
use crate::model::{Callable, Parameter, RegisteredType};
use crate::resolver::{Symbol, SymbolTable};
use crate::types::{Platform, PRIMARY_CONSTRUCTOR_NAME};
use crate::utils::{to_camel_case, to_java_name, to_java_simple_type};
use regex::{Captures, Regex};
use std::collections::HashSet;

const MARKUP_PATTERN: &str = concat!(
    // ^ in header and bullet patterns matches at line starts
    r"(?m)",
    r"(?P<codeblock>```(?P<content>(?s:.+?))```)",
    r"|(?P<codeblock2>\|\[(?P<content2>(?s:.+?))\]\|)",
    r"|(?P<code>`[^`]+`)",
    r"|(?P<link>\[(?P<type>.+)@(?P<path>(?P<part1>[^.\]]+)?\.?(?P<part2>[^.\]:]+)?[.:]?(?P<part3>.+)?)\])",
    r"|(?P<macroref>%\w+)",
    r"|(?P<typeref>#[^#\s]\w+)",
    r"|(?P<paramref>@[^@\s]\w+)",
    r"|(?P<hyperlink>\[(?P<desc>.+)\]\((?P<url>.+)\))",
    r"|(?P<img>!\[(?P<imgdesc>.+)\]\((?P<imgurl>.+)\))",
    r"|^(?P<header>(?P<headerlevel>#{1,6})\s.+)\n*",
    r"|^\s*(?P<bulletpoint>-)\s",
    r"|(?P<strong>\*.+\*)",
    r"|(?P<tag><[^>]+>)",
    r"|(?P<p>\n{2,})",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Codeblock,
    Codeblock2,
    Code,
    Link,
    Macroref,
    Typeref,
    Paramref,
    Hyperlink,
    Img,
    Header,
    Bulletpoint,
    Strong,
    Tag,
    Paragraph,
}

impl Token {
    /// Tie-break order among alternatives starting at the same position
    const ALL: [(Token, &'static str); 14] = [
        (Token::Codeblock, "codeblock"),
        (Token::Codeblock2, "codeblock2"),
        (Token::Code, "code"),
        (Token::Link, "link"),
        (Token::Macroref, "macroref"),
        (Token::Typeref, "typeref"),
        (Token::Paramref, "paramref"),
        (Token::Hyperlink, "hyperlink"),
        (Token::Img, "img"),
        (Token::Header, "header"),
        (Token::Bulletpoint, "bulletpoint"),
        (Token::Strong, "strong"),
        (Token::Tag, "tag"),
        (Token::Paragraph, "p"),
    ];

    fn of(caps: &Captures<'_>) -> Option<Token> {
        Self::ALL
            .iter()
            .find(|(_, group)| caps.name(group).is_some())
            .map(|(token, _)| *token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    OutsideList,
    InsideList,
}

impl ListState {
    fn bullet(&mut self) -> &'static str {
        match self {
            ListState::OutsideList => {
                *self = ListState::InsideList;
                "<ul>\n<li>"
            }
            ListState::InsideList => "<li>",
        }
    }

    fn paragraph(&mut self) -> &'static str {
        match self {
            ListState::InsideList => {
                *self = ListState::OutsideList;
                "\n</ul>\n<p>\n"
            }
            ListState::OutsideList => "\n<p>\n",
        }
    }
}

/// Paragraph breaks are not taken when a header, code block or bullet list
/// follows directly
fn starts_block(rest: &str) -> bool {
    if rest.starts_with("```") {
        return true;
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some('-') => chars.next().map(char::is_whitespace).unwrap_or(false),
        Some('#') => {
            let hashes = 1 + rest[1..].chars().take_while(|c| *c == '#').count();
            hashes <= 6 && rest[hashes..].chars().next().map(char::is_whitespace).unwrap_or(false)
        }
        _ => false,
    }
}

/// Result of converting one documentation text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedDoc {
    pub text: String,
    /// References that could not be resolved and were rendered as code
    pub misses: usize,
}

/// Compiled markup pattern. Build once and reuse for every conversion.
pub struct DocTransformer {
    pattern: Regex,
}

impl DocTransformer {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(MARKUP_PATTERN).unwrap(),
        }
    }

    /// Convert one documentation text. `namespace` is the namespace the
    /// documented element belongs to; links into it are not package-qualified.
    pub fn convert(&self, text: &str, table: &SymbolTable<'_>, namespace: &str) -> ConvertedDoc {
        let mut ctx = RenderContext { table, namespace, misses: 0 };
        let mut state = ListState::OutsideList;
        let mut output = String::with_capacity(text.len() + text.len() / 4);
        let mut last = 0;
        let mut at = 0;

        while at < text.len() {
            let Some(caps) = self.pattern.captures_at(text, at) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let Some(token) = Token::of(&caps) else {
                break;
            };
            let (start, mut end) = (whole.start(), whole.end());

            let replacement = match token {
                Token::Paragraph => {
                    if starts_block(&text[end..]) {
                        if end - start < 3 {
                            // Leave both newlines and retry one position later
                            at = start + 1;
                            continue;
                        }
                        // Keep the last newline so the block still starts a line
                        end -= 1;
                    }
                    state.paragraph().to_string()
                }
                Token::Bulletpoint => state.bullet().to_string(),
                _ => ctx.render(token, &caps),
            };

            output.push_str(&text[last..start]);
            output.push_str(&replacement);
            last = end;
            at = end;
        }

        output.push_str(&text[last..]);
        ConvertedDoc { text: output, misses: ctx.misses }
    }
}

impl Default for DocTransformer {
    fn default() -> Self {
        Self::new()
    }
}

struct RenderContext<'t, 'a> {
    table: &'t SymbolTable<'a>,
    namespace: &'t str,
    misses: usize,
}

impl RenderContext<'_, '_> {
    fn render(&mut self, token: Token, caps: &Captures<'_>) -> String {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();

        match token {
            Token::Codeblock => format!("<pre>{{@code {}}}</pre>", group("content").unwrap_or_default()),
            Token::Codeblock2 => format!("<pre>{{@code {}}}</pre>", group("content2").unwrap_or_default()),
            Token::Code => format!("{{@code {}}}", &whole[1..whole.len() - 1]),
            Token::Link => self.link(
                group("type").unwrap_or_default(),
                group("path").unwrap_or_default(),
                group("part1"),
                group("part2"),
                group("part3"),
            ),
            Token::Macroref => self.macroref(&whole[1..]),
            Token::Typeref => self.typeref(&whole[1..]),
            Token::Paramref => format!("{{@code {}}}", &whole[1..]),
            Token::Hyperlink => format!(
                "<a href=\"{}\">{}</a>",
                group("url").unwrap_or_default(),
                group("desc").unwrap_or_default()
            ),
            Token::Img => format!(
                "<img src=\"./doc-files/{}\" alt=\"{}\">",
                group("imgurl").unwrap_or_default(),
                group("imgdesc").unwrap_or_default().replace('"', "\\\"")
            ),
            Token::Header => {
                let header = group("header").unwrap_or_default();
                let level = group("headerlevel").map(str::len).unwrap_or(1);
                format!("<h{}>{}</h{}>\n", level, header[level..].trim(), level)
            }
            Token::Strong => format!("<strong>{}</strong>", &whole[1..whole.len() - 1]),
            Token::Tag => format!("&lt;{}&gt;", &whole[1..whole.len() - 1]),
            // Stateful tokens are handled by the scanner
            Token::Bulletpoint | Token::Paragraph => whole.to_string(),
        }
    }

    fn miss(&mut self, reference: &str) -> String {
        log::debug!("Unresolved documentation reference {} in {}", reference, self.namespace);
        self.misses += 1;
        format!("{{@code {}}}", reference)
    }

    /// Package prefix for links into another namespace
    fn format_ns(&self, namespace: &str) -> String {
        if namespace == self.namespace {
            String::new()
        } else {
            format!("{}.", self.table.package(namespace))
        }
    }

    /// Java class of a declared type, or `None` if it does not exist
    fn type_link(&self, namespace: Option<&str>, type_name: &str) -> Option<String> {
        let name = match namespace {
            Some(ns) => format!("{}.{}", ns, type_name),
            None => type_name.to_string(),
        };
        let (ns, rt) = self.table.lookup_type(self.namespace, &name)?;
        Some(format!("{}{}", self.format_ns(ns), to_java_simple_type(rt.name())))
    }

    fn link(
        &mut self,
        kind: &str,
        path: &str,
        part1: Option<&str>,
        part2: Option<&str>,
        part3: Option<&str>,
    ) -> String {
        let rendered = match kind {
            "ctor" if part3 == Some(PRIMARY_CONSTRUCTOR_NAME) => part2
                .and_then(|ty| self.type_link(part1, ty))
                .map(|class| {
                    let simple = class.rsplit('.').next().unwrap_or(&class).to_string();
                    format!("{{@link {}#{}}}", class, simple)
                }),
            "ctor" | "method" | "vfunc" => match (part2, part3) {
                (Some(ty), Some(method)) => self
                    .type_link(part1, ty)
                    .map(|class| format!("{{@link {}#{}}}", class, to_java_name(method))),
                (Some(method), None) => part1
                    .and_then(|ty| self.type_link(None, ty))
                    .map(|class| format!("{{@link {}#{}}}", class, to_java_name(method))),
                _ => None,
            },
            "property" | "signal" => return format!("{{@code {}}}", path),
            "func" => match (part1, part2, part3) {
                (Some(ns), Some(ty), Some(func)) => self
                    .type_link(Some(ns), ty)
                    .map(|class| format!("{{@link {}#{}}}", class, to_java_name(func))),
                (Some(ns), Some(func), None) => self
                    .table
                    .namespace(ns)
                    .filter(|n| n.function(func).is_some())
                    .map(|n| format!("{{@link {}{}#{}}}", self.format_ns(&n.name), n.name, to_java_name(func))),
                _ => None,
            },
            "class" | "iface" | "struct" | "enum" | "flags" | "error" | "callback" | "alias" | "type" => {
                match (part1, part2) {
                    (Some(ns), Some(ty)) => self.type_link(Some(ns), ty),
                    (Some(ty), None) => self.type_link(None, ty),
                    _ => None,
                }
                .map(|class| format!("{{@link {}}}", class))
            }
            "id" => part1
                .and_then(|id| self.table.by_c_identifier(id).copied())
                .map(|symbol| {
                    let uppercase = matches!(symbol.kind(), NodeKind::Member | NodeKind::Constant);
                    format!("{{@link {}}}", self.symbol_link(&symbol, uppercase))
                }),
            _ => return format!("{{@code {}}}", path),
        };

        match rendered {
            Some(rendered) => rendered,
            None => self.miss(path),
        }
    }

    fn macroref(&mut self, name: &str) -> String {
        match name {
            "NULL" => "{@code null}".to_string(),
            "TRUE" => "{@code true}".to_string(),
            "FALSE" => "{@code false}".to_string(),
            _ => match self.table.by_c_identifier(name).copied() {
                Some(symbol) => format!("{{@link {}}}", self.symbol_link(&symbol, true)),
                None => self.miss(name),
            },
        }
    }

    fn typeref(&mut self, c_type: &str) -> String {
        match self.table.by_c_type(c_type) {
            Some((ns, rt)) => format!("{{@link {}{}}}", self.format_ns(ns), to_java_simple_type(rt.name())),
            None => self.miss(c_type),
        }
    }

    /// `Class#member`, where namespace-level declarations live in the class
    /// named after their namespace
    fn symbol_link(&self, symbol: &Symbol<'_>, uppercase: bool) -> String {
        let class = match symbol.owner {
            Some(owner) => to_java_simple_type(owner),
            None => symbol.namespace.to_string(),
        };
        let member = if uppercase {
            symbol.name.to_uppercase()
        } else {
            to_java_name(symbol.name)
        };
        format!("{}{}#{}", self.format_ns(symbol.namespace), class, member)
    }
}

/// What the Javadoc of a callable needs to know besides the callable itself
#[derive(Debug, Clone, Copy)]
pub struct CallableDocInfo {
    pub primary_constructor: bool,
    /// Platforms the generated body runs on
    pub platforms: Platform,
    /// Signal connect method, documented with handler parameters
    pub signal: bool,
}

/// Lines of one Javadoc comment
#[derive(Debug, Default)]
struct Block {
    lines: Vec<String>,
}

impl Block {
    /// Write text line by line, escaping backslashes; the tag goes in
    /// front of the first line
    fn write(&mut self, text: &str, tag: Option<&str>) {
        for (index, line) in text.trim().lines().enumerate() {
            let escaped = line.replace('\\', "\\\\");
            let line = match tag {
                Some(tag) if index == 0 => format!("{} {}", tag, escaped),
                _ => escaped,
            };
            self.lines.push(format!(" * {}", line).trim_end().to_string());
        }
    }

    fn finish(self) -> String {
        format!("/**\n{}\n */", self.lines.join("\n"))
    }
}

/// Javadoc assembly for the declarations of one namespace
pub struct DocWriter<'d, 'a> {
    transformer: &'d DocTransformer,
    table: &'d SymbolTable<'a>,
    namespace: &'d str,
    misses: usize,
}

impl<'d, 'a> DocWriter<'d, 'a> {
    pub fn new(transformer: &'d DocTransformer, table: &'d SymbolTable<'a>, namespace: &'d str) -> Self {
        Self {
            transformer,
            table,
            namespace,
            misses: 0,
        }
    }

    /// Unresolved references seen so far
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn convert(&mut self, text: &str) -> String {
        let converted = self.transformer.convert(text, self.table, self.namespace);
        self.misses += converted.misses;
        converted.text
    }

    /// Javadoc of a type, with `@version`
    pub fn type_doc(&mut self, rt: &RegisteredType) -> Option<String> {
        let doc = rt.doc()?;
        let mut block = Block::default();
        let text = self.convert(doc);
        block.write(&text, None);
        if let Some(version) = rt.node().version() {
            block.write(version, Some("@version"));
        }
        Some(block.finish())
    }

    /// Javadoc of a constant, enumeration member, field or property
    pub fn node_doc(&mut self, node: &Node) -> Option<String> {
        let doc = node.doc()?;
        let mut block = Block::default();
        let text = self.convert(doc);
        block.write(&text, None);
        Some(block.finish())
    }

    pub fn callable_doc(&mut self, callable: &Callable<'_>, info: CallableDocInfo) -> Option<String> {
        let doc = callable.doc()?;
        let mut block = Block::default();
        let text = self.convert(doc);
        block.write(&text, None);

        let plain_callable = !matches!(callable.kind(), NodeKind::Signal | NodeKind::Callback);

        if plain_callable {
            let parameters = callable.parameters();
            let hidden = hidden_parameters(&parameters);
            for (index, param) in parameters.iter().enumerate() {
                if hidden.contains(&index) {
                    continue;
                }
                if let Some(param_doc) = param.doc() {
                    let name = if param.is_varargs() {
                        "varargs".to_string()
                    } else {
                        to_java_name(param.name().unwrap_or_default())
                    };
                    let text = self.convert(param_doc);
                    block.write(&text, Some(&format!("@param {}", name)));
                }
            }

            if !info.primary_constructor {
                if let Some(return_doc) = callable.return_value().and_then(|rv| rv.doc()) {
                    let text = self.convert(return_doc);
                    block.write(&text, Some("@return"));
                }
            }

            if callable.throws() {
                block.write("GErrorException see {@link org.gnome.glib.GError}", Some("@throws"));
            }

            if info.platforms.needs_guard() {
                let names: Vec<String> = info
                    .platforms
                    .names()
                    .iter()
                    .map(|p| to_camel_case(p, true))
                    .collect();
                let text = format!(
                    "UnsupportedPlatformException when run on a platform other than {}",
                    names.join(" or ")
                );
                block.write(&text, Some("@throws"));
            }
        }

        if info.signal && callable.kind() == NodeKind::Signal {
            if callable.detailed() {
                block.write("the signal detail", Some("@param detail"));
            }
            block.write("the signal handler", Some("@param handler"));
            block.write(
                "a {@link SignalConnection} object to keep track of the signal connection",
                Some("@return"),
            );
        }

        if callable.deprecated() {
            if let Some(deprecated) = callable.node().doc_deprecated() {
                let text = self.convert(deprecated);
                block.write(&text, Some("@deprecated"));
            }
        }

        Some(block.finish())
    }
}

/// Indexes of parameters that do not appear in the Java signature: user
/// data and destroy notifiers of callbacks, and array lengths
pub fn hidden_parameters(parameters: &[Parameter<'_>]) -> HashSet<usize> {
    let mut hidden = HashSet::new();

    for param in parameters {
        if let Some(index) = param.closure() {
            let is_user_data = parameters
                .get(index)
                .and_then(|p| p.type_ref())
                .and_then(|t| t.name())
                .map(|name| name == "gpointer")
                .unwrap_or(false);
            if is_user_data {
                hidden.insert(index);
            }
        }
        if let Some(index) = param.destroy() {
            hidden.insert(index);
        }
        if let Some(index) = param.array_length() {
            hidden.insert(index);
        }
    }

    hidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Repository;
    use crate::parser::parse_repository;
    use crate::types::DEFAULT_PACKAGE_PREFIX;
    use std::collections::HashMap;

    const GTK: &str = r#"<repository><namespace name="Gtk" version="4.0">
        <class name="Widget" c:type="GtkWidget">
          <constructor name="new" c:identifier="gtk_widget_new"/>
          <method name="show" c:identifier="gtk_widget_show"/>
        </class>
        <enumeration name="Align" c:type="GtkAlign">
          <member name="fill" value="0" c:identifier="GTK_ALIGN_FILL"/>
        </enumeration>
        <function name="init" c:identifier="gtk_init"/>
      </namespace></repository>"#;

    const GIO: &str = r#"<repository><namespace name="Gio" version="2.0">
        <class name="Application" c:type="GApplication">
          <method name="run" c:identifier="g_application_run"/>
        </class>
      </namespace></repository>"#;

    fn repositories() -> Vec<Repository> {
        vec![
            parse_repository(GTK, "Gtk-4.0.gir", Platform::ALL).unwrap(),
            parse_repository(GIO, "Gio-2.0.gir", Platform::ALL).unwrap(),
        ]
    }

    fn convert(text: &str) -> ConvertedDoc {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        DocTransformer::new().convert(text, &table, "Gtk")
    }

    #[test]
    fn test_macro_literals() {
        assert_eq!(convert("Returns %NULL").text, "Returns {@code null}");
        assert_eq!(convert("%TRUE or %FALSE").text, "{@code true} or {@code false}");
        assert_eq!(convert("see %GTK_ALIGN_FILL").text, "see {@link Align#FILL}");
        let missed = convert("%G_MAXINT");
        assert_eq!(missed.text, "{@code G_MAXINT}");
        assert_eq!(missed.misses, 1);
    }

    #[test]
    fn test_type_references() {
        assert_eq!(convert("A #GtkWidget.").text, "A {@link Widget}.");
        assert_eq!(convert("A #GApplication").text, "A {@link org.gnome.gio.Application}");
        let missed = convert("A #Widget");
        assert_eq!(missed.text, "A {@code Widget}");
        assert_eq!(missed.misses, 1);
    }

    #[test]
    fn test_links() {
        assert_eq!(convert("[method@Gtk.Widget.show]").text, "{@link Widget#show}");
        assert_eq!(convert("[ctor@Gtk.Widget.new]").text, "{@link Widget#Widget}");
        assert_eq!(
            convert("[method@Gio.Application.run]").text,
            "{@link org.gnome.gio.Application#run}"
        );
        assert_eq!(convert("[class@Gtk.Widget]").text, "{@link Widget}");
        assert_eq!(convert("[func@Gtk.init]").text, "{@link Gtk#init}");
        assert_eq!(convert("[id@gtk_widget_show]").text, "{@link Widget#show}");
        assert_eq!(convert("[id@GTK_ALIGN_FILL]").text, "{@link Align#FILL}");
        assert_eq!(convert("[property@Gtk.Widget:visible]").text, "{@code Gtk.Widget:visible}");

        let missed = convert("[method@Gtk.Missing.show]");
        assert_eq!(missed.text, "{@code Gtk.Missing.show}");
        assert_eq!(missed.misses, 1);
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(convert("call `foo()` with @widget").text, "call {@code foo()} with {@code widget}");
        assert_eq!(convert("*bold*").text, "<strong>bold</strong>");
        assert_eq!(convert("a <child> tag").text, "a &lt;child&gt; tag");
        assert_eq!(
            convert("see [the docs](https://docs.gtk.org)").text,
            "see <a href=\"https://docs.gtk.org\">the docs</a>"
        );
        assert_eq!(
            convert("![A button](button.png)").text,
            "<img src=\"./doc-files/button.png\" alt=\"A button\">"
        );
    }

    #[test]
    fn test_code_blocks() {
        assert_eq!(
            convert("Example:\n```c\nint x = 1;\n```").text,
            "Example:\n<pre>{@code c\nint x = 1;\n}</pre>"
        );
        assert_eq!(convert("|[\nfoo ();\n]|").text, "<pre>{@code \nfoo ();\n}</pre>");
    }

    #[test]
    fn test_header() {
        assert_eq!(convert("## Overview\n\nText").text, "<h2>Overview</h2>\nText");
    }

    #[test]
    fn test_bullet_list() {
        let result = convert("Items:\n- one\n- two\n- three\n\nAfter");
        assert_eq!(
            result.text,
            "Items:\n<ul>\n<li>one\n<li>two\n<li>three\n</ul>\n<p>\nAfter"
        );
        assert_eq!(result.text.matches("<ul>").count(), 1);
        assert_eq!(result.text.matches("<li>").count(), 3);
        assert_eq!(result.text.matches("</ul>").count(), 1);
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(convert("One.\n\nTwo.").text, "One.\n<p>\nTwo.");
        // A break before a header is not a paragraph
        assert_eq!(convert("One.\n\n# Title").text, "One.\n\n<h1>Title</h1>\n");
        // With more newlines, all but the last one form the paragraph
        assert_eq!(convert("One.\n\n\n# Title").text, "One.\n<p>\n\n<h1>Title</h1>\n");
    }

    #[test]
    fn test_list_state_is_per_conversion() {
        let repos = repositories();
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        let transformer = DocTransformer::new();
        let first = transformer.convert("- open", &table, "Gtk");
        let second = transformer.convert("- again", &table, "Gtk");
        assert_eq!(first.text, "<ul>\n<li>open");
        assert_eq!(second.text, "<ul>\n<li>again");
    }

    #[test]
    fn test_callable_javadoc() {
        let src = r#"<repository><namespace name="Gtk" version="4.0">
          <function name="load" c:identifier="gtk_load" throws="1" deprecated="1">
            <doc>Loads @data.</doc>
            <doc-deprecated>Use [func@Gtk.init].</doc-deprecated>
            <return-value><doc>%TRUE on success</doc><type name="gboolean"/></return-value>
            <parameters>
              <parameter name="data"><doc>the bytes</doc><array length="1"><type name="guint8"/></array></parameter>
              <parameter name="len"><doc>length</doc><type name="gsize"/></parameter>
            </parameters>
          </function>
          <function name="init" c:identifier="gtk_init"/>
        </namespace></repository>"#;
        let repos = vec![parse_repository(src, "Gtk-4.0.gir", Platform::ALL).unwrap()];
        let table = SymbolTable::build(&repos, DEFAULT_PACKAGE_PREFIX, &HashMap::new());
        let transformer = DocTransformer::new();
        let mut writer = DocWriter::new(&transformer, &table, "Gtk");

        let node = repos[0].namespace.function("load").unwrap();
        let callable = Callable::new(node).unwrap();
        let info = CallableDocInfo {
            primary_constructor: false,
            platforms: Platform::LINUX | Platform::MACOS,
            signal: false,
        };
        let doc = writer.callable_doc(&callable, info).unwrap();

        assert_eq!(
            doc,
            "/**\n\
             \x20* Loads {@code data}.\n\
             \x20* @param data the bytes\n\
             \x20* @return {@code true} on success\n\
             \x20* @throws GErrorException see {@link org.gnome.glib.GError}\n\
             \x20* @throws UnsupportedPlatformException when run on a platform other than Linux or Macos\n\
             \x20* @deprecated Use {@link Gtk#init}.\n\
             \x20*/"
        );
        assert_eq!(writer.misses(), 0);
    }

    #[test]
    fn test_backslashes_are_escaped() {
        let mut block = Block::default();
        block.write("a \\n b", None);
        assert_eq!(block.finish(), "/**\n * a \\\\n b\n */");
    }
}
