//! Name and literal conversions for the generated Java sources

use crate::types::Primitive;

/// Java reserved words. Generated names that collide get a trailing `_`.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "continue", "for", "new", "switch", "assert", "default", "goto", "package",
    "synchronized", "boolean", "do", "if", "private", "this", "break", "double", "implements",
    "protected", "throw", "byte", "else", "import", "public", "throws", "case", "enum",
    "instanceof", "return", "transient", "catch", "extends", "int", "short", "try", "char",
    "final", "interface", "static", "void", "class", "finally", "long", "strictfp", "volatile",
    "const", "float", "native", "super", "while",
];

/// Public methods of `java.lang.Object` that a default interface method must not override
const OBJECT_METHODS: &[&str] = &[
    "equals", "getClass", "hashCode", "notify", "notifyAll", "toString", "wait",
];

/// Convert "snake_case" or "kebab-case" to camel case. Every `_` or `-` is
/// dropped and forces the next character to upper case; other characters are
/// kept as they are.
pub fn to_camel_case(name: &str, start_upper: bool) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper = start_upper;

    for c in name.chars() {
        if c == '_' || c == '-' {
            upper = true;
        } else {
            if upper {
                result.extend(c.to_uppercase());
            } else {
                result.push(c);
            }
            upper = false;
        }
    }

    result
}

/// Append `_` to names that are Java keywords (case-insensitive)
pub fn escape_keyword(name: &str) -> String {
    if JAVA_KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(name)) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Append `_` to names that would override a `java.lang.Object` method
pub fn escape_object_method(name: &str) -> String {
    if OBJECT_METHODS.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// "identifier_name" -> "identifierName", keyword-escaped
pub fn to_java_name(name: &str) -> String {
    escape_keyword(&to_camel_case(name, false))
}

/// "GLib.type_name" -> "TypeName"
pub fn to_java_simple_type(name: &str) -> String {
    match name.split_once('.') {
        Some((ns, rest)) if !ns.is_empty() => to_camel_case(rest, true),
        _ => to_camel_case(name, true),
    }
}

/// Java identifiers cannot start with a digit
pub fn prefix_digits(name: &str) -> String {
    if name.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Upper-case member name for enumerations and constants
pub fn to_constant_name(name: &str) -> String {
    prefix_digits(&name.to_uppercase())
}

/// Render a constant value as a Java literal of the given type. Returns
/// `None` when the value does not fit the type.
pub fn java_literal(primitive: Primitive, value: &str) -> Option<String> {
    let value = value.trim();
    let literal = match primitive {
        Primitive::Boolean => value.eq_ignore_ascii_case("true").to_string(),
        Primitive::Byte => value.parse::<i8>().ok()?.to_string(),
        Primitive::Short => value.parse::<i16>().ok()?.to_string(),
        Primitive::Int => value.parse::<i32>().ok()?.to_string(),
        Primitive::Long => format!("{}L", value.parse::<i64>().ok()?),
        Primitive::Double => {
            let v = value.parse::<f64>().ok().filter(|v| v.is_finite())?;
            format!("{:?}d", v)
        }
        Primitive::Float => {
            let v = value.parse::<f32>().ok().filter(|v| v.is_finite())?;
            format!("{:?}f", v)
        }
        Primitive::String => format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")),
        Primitive::Void | Primitive::Pointer | Primitive::GType | Primitive::VaList => return None,
    };
    Some(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("set_visible_child_name", true), "SetVisibleChildName");
        assert_eq!(to_camel_case("set_visible_child_name", false), "setVisibleChildName");
        assert_eq!(to_camel_case("notify::label", false), "notify::label");
        assert_eq!(to_camel_case("activate-link", false), "activateLink");
        assert_eq!(to_camel_case("DBusProxy", true), "DBusProxy");
    }

    #[test]
    fn test_keyword_escape_is_idempotent() {
        for name in ["new", "Class", "default", "show", "int", "get_child"] {
            let once = escape_keyword(name);
            assert_eq!(escape_keyword(&once), once);
        }
        assert_eq!(escape_keyword("new"), "new_");
        assert_eq!(escape_keyword("Class"), "Class_");
        assert_eq!(to_java_name("continue"), "continue_");
        assert_eq!(to_java_name("get_child"), "getChild");
    }

    #[test]
    fn test_object_method_escape() {
        assert_eq!(escape_object_method("toString"), "toString_");
        assert_eq!(escape_object_method(&escape_object_method("notify")), "notify_");
        assert_eq!(escape_object_method("present"), "present");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(to_java_simple_type("GLib.type_name"), "TypeName");
        assert_eq!(to_java_simple_type("Widget"), "Widget");
        assert_eq!(prefix_digits("2big"), "_2big");
        assert_eq!(to_constant_name("mouse_button"), "MOUSE_BUTTON");
        assert_eq!(to_constant_name("2d"), "_2D");
    }

    #[test]
    fn test_java_literals() {
        assert_eq!(java_literal(Primitive::Boolean, "true").as_deref(), Some("true"));
        assert_eq!(java_literal(Primitive::Int, "42").as_deref(), Some("42"));
        assert_eq!(java_literal(Primitive::Long, "9").as_deref(), Some("9L"));
        assert_eq!(java_literal(Primitive::Double, "1.5").as_deref(), Some("1.5d"));
        assert_eq!(java_literal(Primitive::Double, "3").as_deref(), Some("3.0d"));
        assert_eq!(java_literal(Primitive::Float, "0.25").as_deref(), Some("0.25f"));
        assert_eq!(java_literal(Primitive::String, "a\"b").as_deref(), Some("\"a\\\"b\""));
        assert_eq!(java_literal(Primitive::Int, "4294967295"), None);
        assert_eq!(java_literal(Primitive::Pointer, "0"), None);
    }
}
