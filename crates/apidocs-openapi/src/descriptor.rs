//! Type descriptors: the structural shape of the types an API exposes.
//!
//! A [`TypeDescriptor`] is built once per exposed type with the constructors
//! and builders here, then handed to route registration. Descriptors are
//! plain data; everything downstream (schema extraction, definition
//! registration, parameter derivation) walks them without further input from
//! the caller.
//!
//! Generic types are described as templates: an [`ObjectDescriptor`] with
//! declared parameter names and no arguments. [`TypeDescriptor::instantiate`]
//! binds concrete arguments, and substitution happens lazily during
//! extraction so a template can be instantiated many times.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SpecError};

/// Canonical name of a registered schema definition.
///
/// Derived structurally by [`TypeDescriptor::model_name`], e.g.
/// `ToyModel`, `PairOfStringAndInt`, `ListOfToyModel`.
pub type ModelName = String;

/// Binding of generic parameter names to concrete descriptors, carried down
/// one level of extraction.
pub(crate) type Bindings = HashMap<String, TypeDescriptor>;

/// The shape of a single type as seen by schema derivation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// The absence of a payload. Legal as a body or response type (where it
    /// suppresses the schema) but not as a property.
    Unit,
    /// A scalar with a fixed JSON type/format rendering.
    Primitive(PrimitiveDescriptor),
    /// A closed set of string values, in declaration order.
    Enum(Arc<EnumDescriptor>),
    /// A homogeneous sequence; `unique` distinguishes sets from lists.
    Collection(CollectionDescriptor),
    /// A named object type, possibly a generic template or instantiation.
    Object(Arc<ObjectDescriptor>),
    /// An unbound generic parameter. Only legal inside the fields of a
    /// generic template; reaching one during extraction is a resolver bug.
    Param(String),
}

/// A scalar type and its wire rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveDescriptor {
    /// Simple name used in derived model names (`Int`, `String`, ...).
    pub name: &'static str,
    /// JSON schema `type`.
    pub json_type: &'static str,
    /// JSON schema `format`, when the type carries one.
    pub format: Option<&'static str>,
}

/// A named enumeration rendered as a string schema with an `enum` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    /// Variant names in declaration order.
    pub values: Vec<String>,
}

/// A list or set of a single element type.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDescriptor {
    pub element: Box<TypeDescriptor>,
    /// Renders `uniqueItems: true` and names the model `SetOf...`.
    pub unique: bool,
}

/// A named object type with fields.
///
/// `params` names the declared generic parameters (empty for non-generic
/// types); `args` holds the concrete instantiation arguments. A template has
/// `params` and empty `args` and cannot be registered until instantiated.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    pub name: String,
    pub params: Vec<String>,
    pub args: Vec<TypeDescriptor>,
    pub fields: Vec<FieldDescriptor>,
}

/// One field of an object descriptor, with its schema-affecting attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Nullable fields are optional in the emitted schema.
    pub nullable: bool,
    /// A declared default also makes the field optional.
    pub default: Option<String>,
    pub description: Option<String>,
    /// Ignored fields are omitted from schemas and parameters entirely.
    pub ignored: bool,
    /// Explicit schema reference, bypassing type resolution. The value is a
    /// definition name; rendering prefixes the document's ref root.
    pub schema_ref: Option<ModelName>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        FieldDescriptor {
            name: name.into(),
            ty,
            nullable: false,
            default: None,
            description: None,
            ignored: false,
            schema_ref: None,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    #[must_use]
    pub fn schema_ref(mut self, name: impl Into<String>) -> Self {
        self.schema_ref = Some(name.into());
        self
    }

    /// Whether the field is required in the emitted schema.
    pub fn required(&self) -> bool {
        !self.nullable && self.default.is_none()
    }
}

impl TypeDescriptor {
    pub fn unit() -> Self {
        TypeDescriptor::Unit
    }

    /// 32-bit integer (`integer`/`int32`).
    pub fn int32() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "Int",
            json_type: "integer",
            format: Some("int32"),
        })
    }

    /// 64-bit integer (`integer`/`int64`).
    pub fn int64() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "Long",
            json_type: "integer",
            format: Some("int64"),
        })
    }

    pub fn string() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "String",
            json_type: "string",
            format: None,
        })
    }

    /// Double-precision float (`number`/`double`).
    pub fn double() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "Double",
            json_type: "number",
            format: Some("double"),
        })
    }

    pub fn boolean() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "Boolean",
            json_type: "boolean",
            format: None,
        })
    }

    /// Calendar date (`string`/`date`).
    pub fn date() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "Date",
            json_type: "string",
            format: Some("date"),
        })
    }

    /// Timestamp (`string`/`date-time`).
    pub fn date_time() -> Self {
        TypeDescriptor::Primitive(PrimitiveDescriptor {
            name: "DateTime",
            json_type: "string",
            format: Some("date-time"),
        })
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeDescriptor::Enum(Arc::new(EnumDescriptor {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(CollectionDescriptor {
            element: Box::new(element),
            unique: false,
        })
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(CollectionDescriptor {
            element: Box::new(element),
            unique: true,
        })
    }

    /// An unbound generic parameter, for use in template fields.
    pub fn param(name: impl Into<String>) -> Self {
        TypeDescriptor::Param(name.into())
    }

    /// Starts a non-generic object descriptor.
    pub fn object(name: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder {
            name: name.into(),
            params: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Starts a generic template with the given parameter names. The result
    /// must be instantiated before registration.
    pub fn generic<I, S>(name: impl Into<String>, params: I) -> ObjectBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ObjectBuilder {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            fields: Vec::new(),
        }
    }

    /// Binds concrete arguments to a generic template.
    pub fn instantiate<I>(&self, args: I) -> Result<TypeDescriptor>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let TypeDescriptor::Object(template) = self else {
            return Err(SpecError::UnsupportedType {
                type_name: self.describe(),
            });
        };
        let args: Vec<TypeDescriptor> = args.into_iter().collect();
        if args.len() != template.params.len() {
            return Err(SpecError::GenericArityMismatch {
                model: template.name.clone(),
                expected: template.params.len(),
                got: args.len(),
            });
        }
        let mut instantiated = (**template).clone();
        instantiated.args = args;
        Ok(TypeDescriptor::Object(Arc::new(instantiated)))
    }

    /// Derives the canonical definition name: the simple name for plain
    /// objects, `NameOfArg1AndArg2` for generic instantiations, and
    /// `ListOf...`/`SetOf...` for collections, recursively.
    pub fn model_name(&self) -> Result<ModelName> {
        match self {
            TypeDescriptor::Unit => Ok("Unit".to_owned()),
            TypeDescriptor::Primitive(p) => Ok(p.name.to_owned()),
            TypeDescriptor::Enum(e) => Ok(e.name.clone()),
            TypeDescriptor::Collection(c) => {
                let kind = if c.unique { "Set" } else { "List" };
                Ok(format!("{kind}Of{}", c.element.model_name()?))
            }
            TypeDescriptor::Object(o) => {
                if o.args.is_empty() {
                    if !o.params.is_empty() {
                        // A bare template has no concrete identity.
                        return Err(SpecError::GenericArityMismatch {
                            model: o.name.clone(),
                            expected: o.params.len(),
                            got: 0,
                        });
                    }
                    Ok(o.name.clone())
                } else {
                    let args = o
                        .args
                        .iter()
                        .map(TypeDescriptor::model_name)
                        .collect::<Result<Vec<_>>>()?;
                    Ok(format!("{}Of{}", o.name, args.join("And")))
                }
            }
            TypeDescriptor::Param(p) => Err(SpecError::UnresolvedTypeParameter {
                param: p.clone(),
                model: "<unbound>".to_owned(),
            }),
        }
    }

    /// Human-readable identity for error messages, defined even for shapes
    /// that have no model name.
    pub(crate) fn describe(&self) -> String {
        match self {
            TypeDescriptor::Unit => "Unit".to_owned(),
            TypeDescriptor::Primitive(p) => p.name.to_owned(),
            TypeDescriptor::Enum(e) => e.name.clone(),
            TypeDescriptor::Collection(c) => {
                let kind = if c.unique { "Set" } else { "List" };
                format!("{kind}Of{}", c.element.describe())
            }
            TypeDescriptor::Object(o) => o.name.clone(),
            TypeDescriptor::Param(p) => format!("<{p}>"),
        }
    }
}

/// Builder for object descriptors, generic or not.
pub struct ObjectBuilder {
    name: String,
    params: Vec<String>,
    fields: Vec<FieldDescriptor>,
}

impl ObjectBuilder {
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Object(Arc::new(ObjectDescriptor {
            name: self.name,
            params: self.params,
            args: Vec::new(),
            fields: self.fields,
        }))
    }
}

impl ObjectDescriptor {
    /// The parameter-name to argument binding for this instantiation.
    pub(crate) fn bindings(&self) -> Result<Bindings> {
        if self.args.len() != self.params.len() {
            return Err(SpecError::GenericArityMismatch {
                model: self.name.clone(),
                expected: self.params.len(),
                got: self.args.len(),
            });
        }
        Ok(self
            .params
            .iter()
            .cloned()
            .zip(self.args.iter().cloned())
            .collect())
    }
}

/// Substitutes bound generic parameters in a field type, recursing through
/// collections and generic argument positions. `owner` is the enclosing
/// model, for error context.
pub(crate) fn resolve(
    ty: &TypeDescriptor,
    bindings: &Bindings,
    owner: &str,
) -> Result<TypeDescriptor> {
    match ty {
        TypeDescriptor::Param(name) => {
            bindings
                .get(name)
                .cloned()
                .ok_or_else(|| SpecError::UnresolvedTypeParameter {
                    param: name.clone(),
                    model: owner.to_owned(),
                })
        }
        TypeDescriptor::Collection(c) => {
            let element = resolve(&c.element, bindings, owner)?;
            Ok(TypeDescriptor::Collection(CollectionDescriptor {
                element: Box::new(element),
                unique: c.unique,
            }))
        }
        TypeDescriptor::Object(o) if o.args.iter().any(contains_param) => {
            let args = o
                .args
                .iter()
                .map(|arg| resolve(arg, bindings, owner))
                .collect::<Result<Vec<_>>>()?;
            let mut resolved = (**o).clone();
            resolved.args = args;
            Ok(TypeDescriptor::Object(Arc::new(resolved)))
        }
        other => Ok(other.clone()),
    }
}

fn contains_param(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Param(_) => true,
        TypeDescriptor::Collection(c) => contains_param(&c.element),
        TypeDescriptor::Object(o) => o.args.iter().any(contains_param),
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
