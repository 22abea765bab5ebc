//! Decision records handed to the source emitter, one file per namespace

use crate::codegen::{BindingForm, ConstructorHelper, Descriptor, MarshalRule, SignalInfo, Suppression};
use crate::types::{Direction, TransferOwnership};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamespaceDecision {
    pub name: String,
    pub version: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_library: Option<String>,
    pub platforms: Vec<&'static str>,
    pub types: Vec<TypeDecision>,
    pub functions: Vec<MemberDecision>,
    pub constants: Vec<ConstantDecision>,
    pub skipped: Vec<SkippedDeclaration>,
    /// Documentation references rendered as code because they did not resolve
    pub doc_misses: usize,
}

impl NamespaceDecision {
    pub fn get_type(&self, name: &str) -> Option<&TypeDecision> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn callables(&self) -> impl Iterator<Item = &MemberDecision> + '_ {
        self.types
            .iter()
            .flat_map(|t| t.members.iter().chain(t.callback.iter()))
            .chain(self.functions.iter())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypeDecision {
    pub name: String,
    pub java_name: String,
    pub qualified_name: String,
    pub variant: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_type: Option<String>,
    pub platforms: Vec<&'static str>,
    pub platform_guard: bool,
    pub deprecated: bool,
    /// Only for classes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<EnumerationDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<AliasDecision>,
    /// Signature of a callback type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<MemberDecision>,
    pub members: Vec<MemberDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl TypeDecision {
    pub fn member(&self, name: &str) -> Option<&MemberDecision> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordDecision {
    pub disguised: bool,
    /// Declared opaque, or without any fields to lay out
    pub opaque: bool,
    pub pointer: bool,
    pub foreign: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_function: Option<String>,
    pub fields: Vec<FieldDecision>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDecision {
    pub name: String,
    pub visible_name: String,
    pub java_type: String,
    pub rule: MarshalRule,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnumerationDecision {
    pub bitfield: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_domain: Option<String>,
    pub members: Vec<EnumMemberDecision>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnumMemberDecision {
    pub name: String,
    pub visible_name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_identifier: Option<String>,
    pub platforms: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AliasDecision {
    pub target: String,
    /// Primitive and string targets are wrapped; declared types are inherited
    pub wraps_value: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemberDecision {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_identifier: Option<String>,
    pub visible_name: String,
    pub binding: BindingForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed: Option<Suppression>,
    /// Absent for suppressed members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Descriptor>,
    /// "void" and no parameters for suppressed members
    pub return_type: String,
    pub parameters: Vec<ParameterDecision>,
    pub throws: bool,
    pub deprecated: bool,
    pub platforms: Vec<&'static str>,
    pub platform_guard: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor: Option<ConstructorHelper>,
    pub yields_ownership: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl MemberDecision {
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParameterDecision {
    pub name: String,
    pub java_type: String,
    pub direction: Direction,
    pub transfer_ownership: TransferOwnership,
    pub nullable: bool,
    /// User data, destroy notifiers and array lengths are filled in by the binding
    pub hidden: bool,
    pub varargs: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConstantDecision {
    pub name: String,
    pub visible_name: String,
    pub java_type: String,
    pub value: String,
    pub platforms: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// A declaration left out of the bindings, with the error that caused it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SkippedDeclaration {
    pub name: String,
    pub reason: String,
}
