//! Core types and constants for the GIR compiler

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

/// Default prefix for generated Java packages ("Gtk" -> "org.gnome.gtk")
pub const DEFAULT_PACKAGE_PREFIX: &str = "org.gnome";

// Fixed root types of the GObject type system
pub const OBJECT_NAMESPACE: &str = "GObject";
pub const OBJECT_ROOT_NAME: &str = "Object";
pub const OBJECT_ROOT_C_TYPE: &str = "GObject";
pub const INITIALLY_UNOWNED_NAME: &str = "InitiallyUnowned";
pub const INITIALLY_UNOWNED_C_TYPE: &str = "GInitiallyUnowned";

/// Method that claims a floating reference
pub const SINK_METHOD_NAME: &str = "ref_sink";

/// Instance method that hands ownership back to the native side
pub const UNREF_METHOD_NAME: &str = "unref";

/// Name of the primary constructor
pub const PRIMARY_CONSTRUCTOR_NAME: &str = "new";

bitflags! {
    /// Platforms a declaration is available on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Platform: u8 {
        const LINUX = 1 << 0;
        const WINDOWS = 1 << 1;
        const MACOS = 1 << 2;
        const ALL = Self::LINUX.bits() | Self::WINDOWS.bits() | Self::MACOS.bits();
    }
}

impl Platform {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Some(Self::LINUX),
            "windows" => Some(Self::WINDOWS),
            "macos" => Some(Self::MACOS),
            "all" => Some(Self::ALL),
            _ => None,
        }
    }

    /// Names of the platforms in this set, in fixed order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::LINUX) {
            names.push("linux");
        }
        if self.contains(Self::WINDOWS) {
            names.push("windows");
        }
        if self.contains(Self::MACOS) {
            names.push("macos");
        }
        names
    }

    /// A declaration that is not available everywhere needs a runtime guard
    pub fn needs_guard(&self) -> bool {
        *self != Self::ALL
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}

/// Ownership transfer annotation on parameters and return values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferOwnership {
    None,
    Container,
    Full,
}

impl TransferOwnership {
    /// Missing or unknown values mean "none"
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("full") => Self::Full,
            Some("container") => Self::Container,
            _ => Self::None,
        }
    }
}

/// Parameter direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("out") => Self::Out,
            Some("inout") => Self::InOut,
            _ => Self::In,
        }
    }
}

/// Signal emission stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum When {
    First,
    Last,
    Cleanup,
}

impl When {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("first") => Self::First,
            Some("cleanup") => Self::Cleanup,
            _ => Self::Last,
        }
    }
}

/// Native scalar layouts a value can be passed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl ScalarKind {
    pub fn layout(&self) -> &'static str {
        match self {
            ScalarKind::Byte => "ValueLayout.JAVA_BYTE",
            ScalarKind::Short => "ValueLayout.JAVA_SHORT",
            ScalarKind::Int => "ValueLayout.JAVA_INT",
            ScalarKind::Long => "ValueLayout.JAVA_LONG",
            ScalarKind::Float => "ValueLayout.JAVA_FLOAT",
            ScalarKind::Double => "ValueLayout.JAVA_DOUBLE",
        }
    }
}

/// Fundamental types that are not declared in any namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    String,
    Pointer,
    GType,
    VaList,
}

impl Primitive {
    /// Look up a fundamental type name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name.to_ascii_lowercase().as_str() {
            "gboolean" => Self::Boolean,
            "gchar" | "guchar" | "gint8" | "guint8" => Self::Byte,
            "gshort" | "gushort" | "gint16" | "guint16" => Self::Short,
            "gint" | "guint" | "gint32" | "guint32" | "gunichar" | "gunichar2" => Self::Int,
            "glong" | "gulong" | "gint64" | "guint64" | "gssize" | "gsize" | "goffset"
            | "gintptr" | "guintptr" => Self::Long,
            "gdouble" | "long double" => Self::Double,
            "gfloat" => Self::Float,
            "none" => Self::Void,
            "utf8" | "filename" => Self::String,
            "gpointer" | "gconstpointer" => Self::Pointer,
            "gtype" => Self::GType,
            "va_list" | "valist" => Self::VaList,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn java_type(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
            Self::String => "java.lang.String",
            Self::Pointer => "java.lang.foreign.MemorySegment",
            Self::GType => "org.gnome.glib.Type",
            Self::VaList => "VaList",
        }
    }

    /// Scalar layout used to pass this value natively. Booleans are C ints.
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Boolean | Self::Int => Some(ScalarKind::Int),
            Self::Byte => Some(ScalarKind::Byte),
            Self::Short => Some(ScalarKind::Short),
            Self::Long | Self::GType => Some(ScalarKind::Long),
            Self::Float => Some(ScalarKind::Float),
            Self::Double => Some(ScalarKind::Double),
            Self::Void | Self::String | Self::Pointer | Self::VaList => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::ALL.names(), vec!["linux", "windows", "macos"]);
        assert_eq!((Platform::LINUX | Platform::MACOS).to_string(), "linux, macos");
        assert!(!Platform::ALL.needs_guard());
        assert!(Platform::WINDOWS.needs_guard());
        assert_eq!(Platform::parse("MacOS"), Some(Platform::MACOS));
        assert_eq!(Platform::parse("beos"), None);
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(Primitive::from_name("gboolean"), Some(Primitive::Boolean));
        assert_eq!(Primitive::from_name("guint64"), Some(Primitive::Long));
        assert_eq!(Primitive::from_name("utf8"), Some(Primitive::String));
        assert_eq!(Primitive::from_name("GType"), Some(Primitive::GType));
        assert_eq!(Primitive::from_name("Widget"), None);
        assert_eq!(Primitive::Boolean.scalar(), Some(ScalarKind::Int));
        assert_eq!(Primitive::String.scalar(), None);
    }

    #[test]
    fn test_annotation_defaults() {
        assert_eq!(TransferOwnership::from_attr(None), TransferOwnership::None);
        assert_eq!(TransferOwnership::from_attr(Some("full")), TransferOwnership::Full);
        assert_eq!(Direction::from_attr(Some("inout")), Direction::InOut);
        assert_eq!(When::from_attr(None), When::Last);
    }
}
