//! Schema extraction: turning type descriptors into definitions and
//! version-agnostic property fragments.
//!
//! The two renderers share everything here; only the ref root they pass in
//! differs (`#/definitions/` vs `#/components/schemas/`).

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::{resolve, ModelName, TypeDescriptor};
use crate::error::{Result, SpecError};

/// A schema fragment as it appears in properties, items, and parameter
/// schemas. Unset fields disappear from the serialized document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Property {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Property {
    pub fn typed(property_type: &str, format: Option<&str>) -> Self {
        Property {
            property_type: Some(property_type.to_owned()),
            format: format.map(str::to_owned),
            ..Property::default()
        }
    }

    pub fn array(items: Property) -> Self {
        Property {
            property_type: Some("array".to_owned()),
            items: Some(Box::new(items)),
            ..Property::default()
        }
    }

    pub fn enumeration(values: Vec<String>) -> Self {
        Property {
            property_type: Some("string".to_owned()),
            enum_values: Some(values),
            ..Property::default()
        }
    }

    pub fn reference(reference: impl Into<String>) -> Self {
        Property {
            reference: Some(reference.into()),
            ..Property::default()
        }
    }
}

/// A registered schema definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Definition {
    Object(ObjectModel),
    Array(ArrayModel),
    /// A hand-written schema body, serialized verbatim.
    Custom(serde_json::Value),
}

/// An object definition with named properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectModel {
    #[serde(rename = "type")]
    pub model_type: &'static str,
    pub properties: IndexMap<String, Property>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A top-level collection definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayModel {
    #[serde(rename = "type")]
    pub model_type: &'static str,
    pub items: Property,
    #[serde(rename = "uniqueItems", skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
}

/// Materializes the definition for an object or collection descriptor.
///
/// Returns the definition plus every descriptor discovered inside it whose
/// own definition must be registered (referenced objects, collection
/// elements). The caller drains those through the registry.
pub(crate) fn create_model(
    descriptor: &TypeDescriptor,
    ref_root: &str,
) -> Result<(Definition, Vec<TypeDescriptor>)> {
    match descriptor {
        TypeDescriptor::Object(obj) => {
            let bindings = obj.bindings()?;
            let mut properties = IndexMap::new();
            let mut required = Vec::new();
            let mut discovered = Vec::new();

            for field in &obj.fields {
                if field.ignored {
                    continue;
                }
                let mut property = if let Some(name) = &field.schema_ref {
                    Property::reference(format!("{ref_root}{name}"))
                } else {
                    let resolved = resolve(&field.ty, &bindings, &obj.name)?;
                    let (property, found) = to_property(&resolved, ref_root)?;
                    discovered.extend(found);
                    property
                };
                if let Some(description) = &field.description {
                    property.description = Some(description.clone());
                }
                if let Some(default) = &field.default {
                    property.default = Some(default.clone());
                }
                if field.required() {
                    required.push(field.name.clone());
                }
                properties.insert(field.name.clone(), property);
            }

            Ok((
                Definition::Object(ObjectModel {
                    model_type: "object",
                    properties,
                    required,
                }),
                discovered,
            ))
        }
        TypeDescriptor::Collection(collection) => {
            let (items, discovered) = to_property(&collection.element, ref_root)?;
            Ok((
                Definition::Array(ArrayModel {
                    model_type: "array",
                    items,
                    unique_items: collection.unique,
                }),
                discovered,
            ))
        }
        other => Err(SpecError::UnsupportedType {
            type_name: other.describe(),
        }),
    }
}

/// Renders a concrete descriptor as a property fragment, collecting any
/// object descriptors that now need their own definitions.
pub(crate) fn to_property(
    descriptor: &TypeDescriptor,
    ref_root: &str,
) -> Result<(Property, Vec<TypeDescriptor>)> {
    match descriptor {
        TypeDescriptor::Primitive(p) => Ok((Property::typed(p.json_type, p.format), Vec::new())),
        TypeDescriptor::Enum(e) => Ok((Property::enumeration(e.values.clone()), Vec::new())),
        TypeDescriptor::Collection(c) => {
            let (items, discovered) = to_property(&c.element, ref_root)?;
            Ok((Property::array(items), discovered))
        }
        TypeDescriptor::Object(_) => {
            let name = descriptor.model_name()?;
            let property = Property::reference(format!("{ref_root}{name}"));
            Ok((property, vec![descriptor.clone()]))
        }
        TypeDescriptor::Unit => Err(SpecError::UnsupportedType {
            type_name: "Unit".to_owned(),
        }),
        TypeDescriptor::Param(p) => Err(SpecError::UnresolvedTypeParameter {
            param: p.clone(),
            model: "<unbound>".to_owned(),
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
