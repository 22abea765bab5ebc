//! Patch registry
//!
//! A short list of edits applied to the merged model before indexing. They
//! remove or rename declarations that cannot be represented in the bindings,
//! so those never reach the decision engine.

use crate::ast::NodeKind;
use crate::model::{Namespace, Repository};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Patch {
    RemoveType {
        namespace: String,
        name: String,
    },
    RemoveFunction {
        namespace: String,
        name: String,
    },
    RemoveMethod {
        namespace: String,
        #[serde(rename = "type")]
        type_name: String,
        name: String,
    },
    RenameMethod {
        namespace: String,
        #[serde(rename = "type")]
        type_name: String,
        old: String,
        new: String,
    },
    RemoveConstant {
        namespace: String,
        name: String,
    },
}

impl Patch {
    pub fn remove_type(namespace: &str, name: &str) -> Self {
        Self::RemoveType { namespace: namespace.into(), name: name.into() }
    }

    pub fn remove_function(namespace: &str, name: &str) -> Self {
        Self::RemoveFunction { namespace: namespace.into(), name: name.into() }
    }

    pub fn remove_method(namespace: &str, type_name: &str, name: &str) -> Self {
        Self::RemoveMethod {
            namespace: namespace.into(),
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn rename_method(namespace: &str, type_name: &str, old: &str, new: &str) -> Self {
        Self::RenameMethod {
            namespace: namespace.into(),
            type_name: type_name.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn remove_constant(namespace: &str, name: &str) -> Self {
        Self::RemoveConstant { namespace: namespace.into(), name: name.into() }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::RemoveType { namespace, .. }
            | Self::RemoveFunction { namespace, .. }
            | Self::RemoveMethod { namespace, .. }
            | Self::RenameMethod { namespace, .. }
            | Self::RemoveConstant { namespace, .. } => namespace,
        }
    }

    /// Apply to a namespace. Returns whether anything changed.
    pub fn apply(&self, ns: &mut Namespace) -> bool {
        if ns.name != self.namespace() {
            return false;
        }

        match self {
            Self::RemoveType { name, .. } => ns.types.shift_remove(name).is_some(),
            Self::RemoveFunction { name, .. } => {
                let before = ns.functions.len();
                ns.functions.retain(|f| f.name() != Some(name.as_str()));
                ns.functions.len() != before
            }
            Self::RemoveConstant { name, .. } => {
                let before = ns.constants.len();
                ns.constants.retain(|c| c.name() != Some(name.as_str()));
                ns.constants.len() != before
            }
            Self::RemoveMethod { type_name, name, .. } => match ns.types.get_mut(type_name) {
                Some(rt) => {
                    let children = rt.node_mut().children_mut();
                    let before = children.len();
                    children.retain(|c| !(c.kind == NodeKind::Method && c.name() == Some(name.as_str())));
                    children.len() != before
                }
                None => false,
            },
            Self::RenameMethod { type_name, old, new, .. } => {
                let Some(rt) = ns.types.get_mut(type_name) else {
                    return false;
                };
                match rt
                    .node_mut()
                    .children_mut()
                    .iter_mut()
                    .find(|c| c.kind == NodeKind::Method && c.name() == Some(old.as_str()))
                {
                    Some(method) => {
                        method.set_attribute("name", new.clone());
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatchRegistry {
    patches: Vec<Patch>,
}

impl PatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known declarations of the GNOME platform libraries that the bindings
    /// cannot represent
    pub fn with_defaults() -> Self {
        let patches = vec![
            // Defined in the GIR but unavailable in default builds
            Patch::remove_type("Gsk", "BroadwayRenderer"),
            Patch::remove_type("Gsk", "BroadwayRendererClass"),
            // Need va_list marshalling
            Patch::remove_type("GObject", "VaClosureMarshal"),
            Patch::remove_type("GObject", "SignalCVaMarshaller"),
            Patch::remove_function("GObject", "signal_set_va_marshaller"),
            // Parameters without a native descriptor
            Patch::remove_function("GLib", "assertion_message_cmpnum"),
            // Override a parent method with a different return type
            Patch::rename_method("Gtk", "PrintUnixDialog", "get_settings", "get_print_settings"),
            Patch::rename_method("Gio", "BufferedInputStream", "read_byte", "read_int"),
            Patch::rename_method("Gtk", "MenuButton", "get_direction", "get_arrow_direction"),
            Patch::rename_method("GObject", "TypeModule", "use", "use_type_module"),
            Patch::rename_method("Adw", "ActionRow", "activate", "activate_row"),
            Patch::rename_method("Adw", "SplitButton", "get_direction", "get_arrow_direction"),
            // A static factory declared as an interface method
            Patch::remove_method("Gio", "AsyncInitable", "new_finish"),
            // Two callback parameters
            Patch::remove_function("GObject", "signal_new_valist"),
            Patch::remove_function("GObject", "signal_newv"),
            // Incompletely specified
            Patch::remove_function("cairo", "image_surface_create"),
            Patch::remove_function("GLib", "clear_error"),
            // Type cannot be instantiated
            Patch::remove_constant("HarfBuzz", "LANGUAGE_INVALID"),
        ];
        Self { patches }
    }

    pub fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn extend(&mut self, patches: impl IntoIterator<Item = Patch>) {
        self.patches.extend(patches);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    /// Apply every patch to every repository, returning how many took effect.
    /// Patches for absent namespaces or declarations are no-ops.
    pub fn apply(&self, repositories: &mut [Repository]) -> usize {
        let mut applied = 0;
        for patch in &self.patches {
            for repo in repositories.iter_mut() {
                if patch.apply(&mut repo.namespace) {
                    log::debug!("Applied patch {:?}", patch);
                    applied += 1;
                }
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::model::RegisteredType;
    use crate::types::Platform;

    fn namespace() -> Namespace {
        let mut ns = Namespace::new("Gtk", "4.0", Platform::ALL);
        ns.types.insert(
            "MenuButton".into(),
            RegisteredType::Class(Node::with_attrs(
                NodeKind::Class,
                &[("name", "MenuButton")],
                vec![
                    Node::with_attrs(NodeKind::Method, &[("name", "get_direction")], vec![]),
                    Node::with_attrs(NodeKind::Method, &[("name", "popup")], vec![]),
                ],
            )),
        );
        ns.types.insert(
            "Broken".into(),
            RegisteredType::Record(Node::with_attrs(NodeKind::Record, &[("name", "Broken")], vec![])),
        );
        ns.functions.push(Node::with_attrs(NodeKind::Function, &[("name", "init")], vec![]));
        ns.constants.push(Node::with_attrs(NodeKind::Constant, &[("name", "MAJOR_VERSION")], vec![]));
        ns
    }

    #[test]
    fn test_rename_and_remove_method() {
        let mut ns = namespace();
        assert!(Patch::rename_method("Gtk", "MenuButton", "get_direction", "get_arrow_direction").apply(&mut ns));
        assert!(Patch::remove_method("Gtk", "MenuButton", "popup").apply(&mut ns));

        let names: Vec<_> = ns.get_type("MenuButton").unwrap().methods().filter_map(|m| m.name()).collect();
        assert_eq!(names, vec!["get_arrow_direction"]);
    }

    #[test]
    fn test_remove_declarations() {
        let mut ns = namespace();
        assert!(Patch::remove_type("Gtk", "Broken").apply(&mut ns));
        assert!(Patch::remove_function("Gtk", "init").apply(&mut ns));
        assert!(Patch::remove_constant("Gtk", "MAJOR_VERSION").apply(&mut ns));
        assert!(ns.get_type("Broken").is_none());
        assert!(ns.functions.is_empty());
        assert!(ns.constants.is_empty());
    }

    #[test]
    fn test_other_namespace_is_untouched() {
        let mut ns = namespace();
        assert!(!Patch::remove_type("Adw", "Broken").apply(&mut ns));
        assert!(!Patch::remove_function("Gtk", "missing").apply(&mut ns));
        assert!(ns.get_type("Broken").is_some());
    }

    #[test]
    fn test_registry_applies_defaults() {
        let mut repos = vec![Repository {
            includes: vec![],
            packages: vec![],
            c_includes: vec![],
            namespace: namespace(),
            platforms: Platform::ALL,
        }];
        let registry = PatchRegistry::with_defaults();
        assert!(!registry.is_empty());
        assert_eq!(registry.apply(&mut repos), 1);
        assert!(repos[0].namespace.get_type("MenuButton").unwrap().has_method("get_arrow_direction"));
    }

    #[test]
    fn test_patch_deserializes_from_toml() {
        let patch: Patch = toml::from_str(
            r#"
op = "rename-method"
namespace = "Gtk"
type = "MenuButton"
old = "get_direction"
new = "get_arrow_direction"
"#,
        )
        .unwrap();
        assert_eq!(patch, Patch::rename_method("Gtk", "MenuButton", "get_direction", "get_arrow_direction"));
    }
}
