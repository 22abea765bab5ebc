//! Callable codegen decision engine
//!
//! Runs after every namespace is indexed. For each callable it decides the
//! native call descriptor, the Java binding form, the visible name and any
//! suppression, then assembles per-type and per-namespace decision records
//! for the emitter.

use crate::ast::{Node, NodeKind};
use crate::docs::{hidden_parameters, CallableDocInfo, DocTransformer, DocWriter};
use crate::error::{CompilerError, Result};
use crate::model::{Callable, Namespace, Parameter, RegisteredType, TypeRef};
use crate::output::{
    AliasDecision, ConstantDecision, EnumMemberDecision, EnumerationDecision, FieldDecision,
    MemberDecision, NamespaceDecision, ParameterDecision, RecordDecision, SkippedDeclaration,
    TypeDecision,
};
use crate::ownership::OwnershipTable;
use crate::resolver::{ResolvedType, SymbolTable};
use crate::types::{
    Direction, Platform, Primitive, ScalarKind, TransferOwnership, When, PRIMARY_CONSTRUCTOR_NAME,
    UNREF_METHOD_NAME,
};
use crate::utils::{
    escape_object_method, java_literal, to_camel_case, to_constant_name, to_java_name,
    to_java_simple_type,
};
use serde::Serialize;

const MEMORY_SEGMENT: &str = "java.lang.foreign.MemorySegment";
const VARARGS_TYPE: &str = "java.lang.Object...";

/// How one value crosses the native boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarshalRule {
    /// Only valid as a return rule
    Void,
    Scalar(ScalarKind),
    Pointer,
    /// Native instance pointer wrapped in a proxy object
    Handle,
    /// Trailing `GError**` of a fallible callable
    ErrorSlot,
}

impl MarshalRule {
    pub fn layout(&self) -> Option<&'static str> {
        match self {
            MarshalRule::Void => None,
            MarshalRule::Scalar(kind) => Some(kind.layout()),
            MarshalRule::Pointer | MarshalRule::Handle | MarshalRule::ErrorSlot => {
                Some("ValueLayout.ADDRESS")
            }
        }
    }
}

/// Ordered marshalling rules of one native call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Descriptor {
    pub return_rule: MarshalRule,
    pub parameters: Vec<MarshalRule>,
    /// Set instead of rules for the variadic tail
    pub varargs: bool,
}

impl Descriptor {
    pub fn last_rule(&self) -> Option<MarshalRule> {
        self.parameters.last().copied()
    }

    /// `FunctionDescriptor` expression for the native downcall or upcall
    pub fn to_java(&self) -> String {
        let args: Vec<&str> = self.parameters.iter().filter_map(|r| r.layout()).collect();
        match self.return_rule.layout() {
            Some(ret) if args.is_empty() => format!("FunctionDescriptor.of({})", ret),
            Some(ret) => format!("FunctionDescriptor.of({}, {})", ret, args.join(", ")),
            None => format!("FunctionDescriptor.ofVoid({})", args.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingForm {
    InstanceMethod,
    StaticFunction,
    /// Java constructor, for the primary constructor
    Constructor,
    /// Static factory method, for named constructors
    Factory,
    InterfaceDefaultMethod,
    /// Functional interface method called from native code
    Upcall,
}

/// Why a callable gets no binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "reason", content = "target")]
pub enum Suppression {
    ShadowedBy(String),
    MovedTo(String),
    NotIntrospectable,
    /// A replacement constructor usually has the same Java signature
    DeprecatedConstructor,
}

/// Private helper that performs the native constructor call. The public
/// constructor or factory calls it first and only wraps the handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConstructorHelper {
    pub name: String,
    /// The native side hands over a full reference
    pub transfers_ownership: bool,
    /// Register the new instance in the runtime instance cache
    pub caches_instance: bool,
    /// Qualified Java name of the constructed type
    pub returns: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SignalInfo {
    pub callback_type: String,
    pub emit_name: String,
    pub detailed: bool,
    pub action: bool,
    pub no_hooks: bool,
    pub no_recurse: bool,
    pub when: When,
}

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Constructor => "constructor",
        NodeKind::Method => "method",
        NodeKind::Function => "function",
        NodeKind::Signal => "signal",
        NodeKind::Callback => "callback",
        other => other.tag(),
    }
}

fn boxed(java_type: &str) -> &str {
    match java_type {
        "boolean" => "Boolean",
        "byte" => "Byte",
        "short" => "Short",
        "int" => "Integer",
        "long" => "Long",
        "float" => "Float",
        "double" => "Double",
        other => other,
    }
}

fn binding_form(owner: Option<&RegisteredType>, callable: &Callable<'_>) -> BindingForm {
    match (callable.kind(), owner) {
        (NodeKind::Callback, _) => BindingForm::Upcall,
        (NodeKind::Function, _) | (_, None) => BindingForm::StaticFunction,
        // Interfaces have no Java constructors
        (_, Some(RegisteredType::Interface(_))) => BindingForm::InterfaceDefaultMethod,
        (NodeKind::Constructor, Some(_)) if callable.name() == PRIMARY_CONSTRUCTOR_NAME => {
            BindingForm::Constructor
        }
        (NodeKind::Constructor, Some(_)) => BindingForm::Factory,
        _ => BindingForm::InstanceMethod,
    }
}

fn suppression(callable: &Callable<'_>, form: BindingForm) -> Option<Suppression> {
    if let Some(target) = callable.shadowed_by() {
        return Some(Suppression::ShadowedBy(target.to_string()));
    }
    if let Some(target) = callable.moved_to().filter(|t| t.contains('.')) {
        return Some(Suppression::MovedTo(target.to_string()));
    }
    if !callable.introspectable() {
        return Some(Suppression::NotIntrospectable);
    }
    if form == BindingForm::Constructor && callable.deprecated() {
        return Some(Suppression::DeprecatedConstructor);
    }
    None
}

/// Public name: a shadowing callable takes the name it shadows and a bare
/// `moved-to` renames. Nothing declared on an interface may hide a
/// `java.lang.Object` method.
fn visible_name(owner: Option<&RegisteredType>, callable: &Callable<'_>, form: BindingForm) -> String {
    let mut name = callable.shadows().unwrap_or(callable.name());
    if let Some(target) = callable.moved_to().filter(|t| !t.contains('.')) {
        name = target;
    }

    match (callable.kind(), form) {
        (NodeKind::Signal, _) => format!("on{}", to_camel_case(name, true)),
        (_, BindingForm::Upcall) => "run".to_string(),
        (_, BindingForm::Constructor) => owner
            .map(|o| to_java_simple_type(o.name()))
            .unwrap_or_else(|| to_java_name(name)),
        _ if matches!(owner, Some(RegisteredType::Interface(_))) => escape_object_method(&to_java_name(name)),
        _ => to_java_name(name),
    }
}

pub struct CodeGenerator<'t, 'a> {
    table: &'t SymbolTable<'a>,
    ownership: &'t OwnershipTable,
    transformer: &'t DocTransformer,
}

impl<'t, 'a> CodeGenerator<'t, 'a> {
    pub fn new(table: &'t SymbolTable<'a>, ownership: &'t OwnershipTable, transformer: &'t DocTransformer) -> Self {
        Self {
            table,
            ownership,
            transformer,
        }
    }

    /// Decisions for every indexed namespace, in indexing order
    pub fn generate_all(&self) -> Result<Vec<NamespaceDecision>> {
        self.table
            .namespaces()
            .map(|ns| self.generate_namespace(ns))
            .collect()
    }

    /// Only errors that abort the whole run are returned. Declarations that
    /// fail to resolve are recorded as skipped.
    pub fn generate_namespace(&self, ns: &Namespace) -> Result<NamespaceDecision> {
        let mut docs = DocWriter::new(self.transformer, self.table, &ns.name);
        let mut skipped = Vec::new();
        let mut types = Vec::new();
        let mut functions = Vec::new();
        let mut constants = Vec::new();

        for rt in ns.types.values() {
            match self.generate_type(ns, rt, &mut docs, &mut skipped) {
                Ok(decision) => types.push(decision),
                Err(e) => skip(&mut skipped, rt.name(), e)?,
            }
        }

        for callable in ns.functions.iter().filter_map(Callable::new) {
            match self.generate_callable(ns, None, &callable, &mut docs) {
                Ok(decision) => functions.push(decision),
                Err(e) => skip(&mut skipped, callable.name(), e)?,
            }
        }

        for constant in &ns.constants {
            match self.generate_constant(ns, constant, &mut docs) {
                Ok(decision) => constants.push(decision),
                Err(e) => skip(&mut skipped, constant.name().unwrap_or_default(), e)?,
            }
        }

        log::debug!(
            "Decided {}: {} types, {} functions, {} constants, {} skipped",
            ns.name,
            types.len(),
            functions.len(),
            constants.len(),
            skipped.len()
        );

        Ok(NamespaceDecision {
            name: ns.name.clone(),
            version: ns.version.clone(),
            package: self.table.package(&ns.name),
            shared_library: ns.shared_library().map(str::to_string),
            platforms: ns.platforms.names(),
            types,
            functions,
            constants,
            skipped,
            doc_misses: docs.misses(),
        })
    }

    pub fn generate_type(
        &self,
        ns: &Namespace,
        rt: &RegisteredType,
        docs: &mut DocWriter<'_, 'a>,
        skipped: &mut Vec<SkippedDeclaration>,
    ) -> Result<TypeDecision> {
        let name = rt.name();

        let parent = match rt.parent_ref() {
            Some(parent) => {
                let (parent_ns, parent_rt) = self
                    .table
                    .lookup_type(&ns.name, parent)
                    .ok_or_else(|| CompilerError::unresolved(&ns.name, name, parent))?;
                Some(self.table.qualified_java_name(parent_ns, parent_rt.name()))
            }
            None => None,
        };

        let implements = rt
            .implements()
            .chain(rt.prerequisites())
            .map(|iface| {
                self.table
                    .lookup_type(&ns.name, iface)
                    .map(|(iface_ns, iface_rt)| self.table.qualified_java_name(iface_ns, iface_rt.name()))
                    .ok_or_else(|| CompilerError::unresolved(&ns.name, name, iface))
            })
            .collect::<Result<Vec<_>>>()?;

        let record = match rt {
            RegisteredType::Record(_) | RegisteredType::Union(_) => Some(RecordDecision {
                disguised: rt.disguised(),
                opaque: rt.opaque() || rt.has_no_layout(),
                pointer: rt.pointer(),
                foreign: rt.foreign(),
                struct_for: rt.is_gtype_struct_for().map(str::to_string),
                copy_function: rt.copy_function().map(str::to_string),
                free_function: rt.free_function().map(str::to_string),
                fields: self.generate_fields(&ns.name, rt),
            }),
            _ => None,
        };

        let enumeration = match rt {
            RegisteredType::Enumeration(_) => Some(EnumerationDecision {
                bitfield: rt.is_bitfield(),
                error_domain: rt.error_domain().map(str::to_string),
                members: rt.members().map(|m| self.generate_enum_member(m, docs)).collect(),
            }),
            _ => None,
        };

        let alias = match rt.alias_target() {
            Some(target) => {
                let resolved = self.table.resolve_type_ref(&ns.name, name, target)?;
                let underlying = self.table.underlying(resolved, name)?;
                Some(AliasDecision {
                    target: self.java_type(&ns.name, name, target, Direction::In)?,
                    wraps_value: underlying.primitive().is_some(),
                })
            }
            None if matches!(rt, RegisteredType::Alias(_)) => {
                return Err(CompilerError::unsupported(&ns.name, name, "alias without a target type"));
            }
            None => None,
        };

        let callback = match rt {
            RegisteredType::Callback(node) => match Callable::new(node) {
                Some(callable) => Some(self.generate_callable(ns, Some(rt), &callable, docs)?),
                None => None,
            },
            _ => None,
        };

        let mut members = Vec::new();
        for callable in rt.callables() {
            match self.generate_callable(ns, Some(rt), &callable, docs) {
                Ok(decision) => members.push(decision),
                Err(e) => skip(skipped, &format!("{}.{}", name, callable.name()), e)?,
            }
        }

        Ok(TypeDecision {
            name: name.to_string(),
            java_name: to_java_simple_type(name),
            qualified_name: self.table.qualified_java_name(&ns.name, name),
            variant: rt.variant_name(),
            c_type: rt.c_type().map(str::to_string),
            platforms: rt.platforms().names(),
            platform_guard: rt.platforms().needs_guard(),
            deprecated: rt.node().deprecated(),
            floating: self.ownership.get(&ns.name, name),
            parent,
            implements,
            get_type: rt.get_type_func().map(str::to_string),
            record,
            enumeration,
            alias,
            callback,
            members,
            doc: docs.type_doc(rt),
        })
    }

    /// Fields whose type does not resolve are left out of the layout
    fn generate_fields(&self, namespace: &str, rt: &RegisteredType) -> Vec<FieldDecision> {
        let mut fields = Vec::new();

        for field in rt.fields() {
            let Some(name) = field.name() else {
                continue;
            };
            let declaration = format!("{}.{}", rt.name(), name);
            let decided = match TypeRef::from_parent(field) {
                Some(type_ref) => self
                    .marshal_rule(namespace, &declaration, type_ref, Direction::In, false)
                    .and_then(|rule| Ok((rule, self.java_type(namespace, &declaration, type_ref, Direction::In)?))),
                // Inline callback fields are function pointers
                None => Ok((MarshalRule::Pointer, MEMORY_SEGMENT.to_string())),
            };

            match decided {
                Ok((rule, java_type)) => fields.push(FieldDecision {
                    name: name.to_string(),
                    visible_name: to_java_name(name),
                    java_type,
                    rule,
                }),
                Err(e) => log::debug!("Leaving out field {}.{}: {}", namespace, declaration, e),
            }
        }

        fields
    }

    fn generate_enum_member(&self, member: &Node, docs: &mut DocWriter<'_, 'a>) -> EnumMemberDecision {
        let name = member.name().unwrap_or_default();
        EnumMemberDecision {
            name: name.to_string(),
            visible_name: to_constant_name(name),
            value: member.attr("value").unwrap_or("0").to_string(),
            c_identifier: member.c_identifier().map(str::to_string),
            platforms: member.platforms().names(),
            doc: docs.node_doc(member),
        }
    }

    pub fn generate_constant(&self, ns: &Namespace, constant: &Node, docs: &mut DocWriter<'_, 'a>) -> Result<ConstantDecision> {
        let name = constant.name().unwrap_or_default();
        let type_ref = TypeRef::from_parent(constant)
            .ok_or_else(|| CompilerError::unsupported(&ns.name, name, "constant without a type"))?;
        let resolved = self.table.resolve_type_ref(&ns.name, name, type_ref)?;
        let primitive = self
            .table
            .underlying(resolved, name)?
            .primitive()
            .ok_or_else(|| CompilerError::unsupported(&ns.name, name, "constant of a declared type"))?;

        let raw = constant.attr("value").unwrap_or_default();
        let value = java_literal(primitive, raw).ok_or_else(|| {
            CompilerError::unsupported(
                &ns.name,
                name,
                format!("value '{}' is not a valid {} literal", raw, primitive.java_type()),
            )
        })?;

        Ok(ConstantDecision {
            name: name.to_string(),
            visible_name: to_constant_name(name),
            java_type: primitive.java_type().to_string(),
            value,
            platforms: constant.platforms().names(),
            doc: docs.node_doc(constant),
        })
    }

    /// Decision for one callable. `owner` is `None` for namespace functions.
    pub fn generate_callable(
        &self,
        ns: &Namespace,
        owner: Option<&RegisteredType>,
        callable: &Callable<'_>,
        docs: &mut DocWriter<'_, 'a>,
    ) -> Result<MemberDecision> {
        let declaration = match owner {
            Some(o) if !std::ptr::eq(o.node(), callable.node()) => format!("{}.{}", o.name(), callable.name()),
            _ => callable.name().to_string(),
        };
        let form = binding_form(owner, callable);
        let suppressed = suppression(callable, form);

        let owner_platforms = owner.map(|o| o.platforms()).unwrap_or(ns.platforms);
        let platforms: Platform = owner_platforms & callable.platforms();
        let owner_java = owner.map(|o| self.table.qualified_java_name(&ns.name, o.name()));

        let (descriptor, return_type, parameters) = if suppressed.is_some() {
            log::trace!("{}.{} suppressed: {:?}", ns.name, declaration, suppressed);
            (None, "void".to_string(), Vec::new())
        } else {
            let descriptor = self.descriptor(&ns.name, &declaration, callable)?;
            let return_type = match (&owner_java, callable.kind()) {
                // Constructors always return the constructed type
                (Some(java), NodeKind::Constructor) => java.clone(),
                _ => match callable.return_value().and_then(|rv| rv.type_ref()) {
                    Some(type_ref) => self.java_type(&ns.name, &declaration, type_ref, Direction::In)?,
                    None => "void".to_string(),
                },
            };
            let parameters = self.parameter_decisions(&ns.name, &declaration, &callable.parameters())?;
            (Some(descriptor), return_type, parameters)
        };

        let constructor = match (callable.kind(), &owner_java) {
            (NodeKind::Constructor, Some(returns)) if suppressed.is_none() => Some(ConstructorHelper {
                name: format!("construct{}", to_camel_case(callable.name(), true)),
                transfers_ownership: callable
                    .return_value()
                    .map(|rv| rv.transfer_ownership() == TransferOwnership::Full)
                    .unwrap_or(false),
                caches_instance: form == BindingForm::Constructor
                    && !matches!(owner, Some(RegisteredType::Record(_))),
                returns: returns.clone(),
            }),
            _ => None,
        };

        let signal = (callable.kind() == NodeKind::Signal).then(|| SignalInfo {
            callback_type: to_camel_case(&format!("{}_callback", callable.name()), true),
            emit_name: format!("emit{}", to_camel_case(callable.name(), true)),
            detailed: callable.detailed(),
            action: callable.action(),
            no_hooks: callable.no_hooks(),
            no_recurse: callable.no_recurse(),
            when: callable.when(),
        });

        let doc = docs.callable_doc(
            callable,
            CallableDocInfo {
                primary_constructor: form == BindingForm::Constructor,
                platforms,
                signal: signal.is_some(),
            },
        );

        Ok(MemberDecision {
            name: callable.name().to_string(),
            kind: kind_name(callable.kind()),
            c_identifier: callable.c_identifier().map(str::to_string),
            visible_name: visible_name(owner, callable, form),
            binding: form,
            suppressed,
            descriptor,
            return_type,
            parameters,
            throws: callable.throws(),
            deprecated: callable.deprecated(),
            platforms: platforms.names(),
            platform_guard: platforms.needs_guard(),
            constructor,
            yields_ownership: callable.kind() == NodeKind::Method && callable.name() == UNREF_METHOD_NAME,
            signal,
            doc,
        })
    }

    /// Native call descriptor. Instance methods and signal handlers start
    /// with the instance handle; fallible calls end with the error slot.
    pub fn descriptor(&self, namespace: &str, declaration: &str, callable: &Callable<'_>) -> Result<Descriptor> {
        let mut return_rule = match callable.return_value().and_then(|rv| rv.type_ref()) {
            Some(type_ref) => self.marshal_rule(namespace, declaration, type_ref, Direction::In, true)?,
            None => MarshalRule::Void,
        };
        if callable.kind() == NodeKind::Constructor {
            return_rule = MarshalRule::Handle;
        }

        let mut parameters = Vec::new();
        if matches!(callable.kind(), NodeKind::Method | NodeKind::Signal) {
            parameters.push(MarshalRule::Handle);
        }

        let mut varargs = false;
        for param in callable.parameters() {
            if param.is_varargs() {
                varargs = true;
                break;
            }
            let type_ref = param.type_ref().ok_or_else(|| {
                CompilerError::unsupported(
                    namespace,
                    declaration,
                    format!("parameter '{}' has no type", param.name().unwrap_or_default()),
                )
            })?;
            parameters.push(self.marshal_rule(namespace, declaration, type_ref, param.direction(), false)?);
        }

        if callable.kind() == NodeKind::Signal {
            // Handler user data
            parameters.push(MarshalRule::Pointer);
        }
        if callable.throws() {
            parameters.push(MarshalRule::ErrorSlot);
        }

        Ok(Descriptor {
            return_rule,
            parameters,
            varargs,
        })
    }

    /// Marshalling category of one value. The type is always resolved, so an
    /// unknown name fails the declaration even when it is passed by pointer.
    pub fn marshal_rule(
        &self,
        namespace: &str,
        declaration: &str,
        type_ref: TypeRef<'_>,
        direction: Direction,
        is_return: bool,
    ) -> Result<MarshalRule> {
        let resolved = self.table.resolve_type_ref(namespace, declaration, type_ref)?;
        if type_ref.is_array() || direction != Direction::In {
            return Ok(MarshalRule::Pointer);
        }

        let rule = match self.table.underlying(resolved, declaration)? {
            ResolvedType::Primitive(Primitive::Void) if is_return && !type_ref.is_pointer() => MarshalRule::Void,
            ResolvedType::Primitive(Primitive::VaList) => {
                return Err(CompilerError::unsupported(namespace, declaration, "va_list has no Java equivalent"));
            }
            ResolvedType::Primitive(primitive) => match primitive.scalar() {
                Some(kind) if !type_ref.is_pointer() => MarshalRule::Scalar(kind),
                _ => MarshalRule::Pointer,
            },
            ResolvedType::Registered { ty, .. } => match ty {
                RegisteredType::Enumeration(_) if !type_ref.is_pointer() => MarshalRule::Scalar(ScalarKind::Int),
                RegisteredType::Enumeration(_) | RegisteredType::Callback(_) => MarshalRule::Pointer,
                RegisteredType::Class(_)
                | RegisteredType::Interface(_)
                | RegisteredType::Record(_)
                | RegisteredType::Union(_)
                | RegisteredType::Boxed(_) => MarshalRule::Handle,
                RegisteredType::Alias(_) => {
                    return Err(CompilerError::unsupported(namespace, declaration, "unresolved alias"));
                }
            },
        };

        Ok(rule)
    }

    /// Java type of a value: the qualified class of declared types, the
    /// Java primitive otherwise. Out and in-out values are wrapped.
    pub fn java_type(&self, namespace: &str, declaration: &str, type_ref: TypeRef<'_>, direction: Direction) -> Result<String> {
        let java = if type_ref.is_array() {
            match type_ref.element() {
                Some(element) => format!("{}[]", self.java_type(namespace, declaration, element, Direction::In)?),
                None => MEMORY_SEGMENT.to_string(),
            }
        } else {
            match type_ref.name() {
                Some(name) => match self.table.resolve_type(namespace, declaration, name)? {
                    ResolvedType::Registered { namespace: ns, ty } => self.table.qualified_java_name(ns, ty.name()),
                    ResolvedType::Primitive(primitive) => primitive.java_type().to_string(),
                },
                None => MEMORY_SEGMENT.to_string(),
            }
        };

        Ok(match direction {
            Direction::In => java,
            Direction::Out | Direction::InOut => format!("Out<{}>", boxed(&java)),
        })
    }

    fn parameter_decisions(
        &self,
        namespace: &str,
        declaration: &str,
        parameters: &[Parameter<'_>],
    ) -> Result<Vec<ParameterDecision>> {
        let hidden = hidden_parameters(parameters);

        parameters
            .iter()
            .enumerate()
            .map(|(index, param)| -> Result<ParameterDecision> {
                let varargs = param.is_varargs();
                let (name, java_type) = if varargs {
                    ("varargs".to_string(), VARARGS_TYPE.to_string())
                } else {
                    let java_type = match param.type_ref() {
                        Some(type_ref) => self.java_type(namespace, declaration, type_ref, param.direction())?,
                        None => MEMORY_SEGMENT.to_string(),
                    };
                    (to_java_name(param.name().unwrap_or_default()), java_type)
                };

                Ok(ParameterDecision {
                    name,
                    java_type,
                    direction: param.direction(),
                    transfer_ownership: param.transfer_ownership(),
                    nullable: param.nullable(),
                    hidden: hidden.contains(&index),
                    varargs,
                })
            })
            .collect()
    }
}

/// Record a per-declaration failure, or hand a run-level failure back
fn skip(skipped: &mut Vec<SkippedDeclaration>, name: &str, error: CompilerError) -> Result<()> {
    if error.is_fatal_for_run() {
        return Err(error);
    }
    log::warn!("Skipping {}: {}", name, error);
    skipped.push(SkippedDeclaration {
        name: name.to_string(),
        reason: error.to_string(),
    });
    Ok(())
}
