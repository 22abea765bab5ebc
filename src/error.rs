//! Error types for the GIR compiler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema error in {file} at line {line}: {message}")]
    Schema { file: String, line: usize, message: String },

    #[error("Unresolved type '{type_name}' in {namespace}.{declaration}")]
    UnresolvedType { namespace: String, declaration: String, type_name: String },

    #[error("Unsupported construct in {namespace}.{declaration}: {message}")]
    UnsupportedConstruct { namespace: String, declaration: String, message: String },

    #[error("Merge error: {message}")]
    Merge { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl CompilerError {
    pub fn schema(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Schema {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn unresolved(
        namespace: impl Into<String>,
        declaration: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnresolvedType {
            namespace: namespace.into(),
            declaration: declaration.into(),
            type_name: type_name.into(),
        }
    }

    pub fn unsupported(
        namespace: impl Into<String>,
        declaration: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnsupportedConstruct {
            namespace: namespace.into(),
            declaration: declaration.into(),
            message: message.into(),
        }
    }

    /// Schema-class errors abort the whole run. Everything else only costs
    /// the declaration that raised it.
    pub fn is_fatal_for_run(&self) -> bool {
        !matches!(
            self,
            Self::UnresolvedType { .. } | Self::UnsupportedConstruct { .. }
        )
    }
}

impl From<serde_json::Error> for CompilerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(CompilerError::schema("a.gir", 3, "unknown element 'foo'").is_fatal_for_run());
        assert!(!CompilerError::unresolved("Gtk", "Widget.show", "Missing").is_fatal_for_run());
        assert!(!CompilerError::unsupported("GLib", "clear_error", "incomplete").is_fatal_for_run());
    }

    #[test]
    fn test_display() {
        let err = CompilerError::schema("Gtk-4.0.gir", 12, "unknown element 'frobnicate'");
        assert_eq!(
            err.to_string(),
            "Schema error in Gtk-4.0.gir at line 12: unknown element 'frobnicate'"
        );
        let err = CompilerError::unresolved("Gtk", "Button.set_child", "Gtk.Missing");
        assert_eq!(err.to_string(), "Unresolved type 'Gtk.Missing' in Gtk.Button.set_child");
    }
}
