//! Swagger 2.0 rendering: `#/definitions/` refs and inline body parameters.

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SpecError};
use crate::model::{Property, to_property};
use crate::operation::{
    status_description, Method, ParameterLocation, ParameterModel, ResponseKind,
    SecurityRequirement, StatusResponse,
};
use crate::registry::DefinitionRegistry;
use crate::variation::{
    Information, ModelReference, OperationParts, SpecDocument, SpecVariation,
};

/// Operations per lowercase method name, per path.
pub type Paths = IndexMap<String, IndexMap<String, Operation>>;

/// A Swagger 2.0 document.
#[derive(Debug, Clone, Serialize)]
pub struct Swagger {
    swagger: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Information>,
    pub paths: Paths,
    pub definitions: DefinitionRegistry,
}

impl Swagger {
    pub fn new() -> Self {
        Swagger {
            swagger: "2.0",
            info: None,
            paths: Paths::new(),
            definitions: DefinitionRegistry::new(V2::REF_ROOT),
        }
    }

    #[must_use]
    pub fn info(mut self, info: Information) -> Self {
        self.info = Some(info);
        self
    }
}

impl Default for Swagger {
    fn default() -> Self {
        Swagger::new()
    }
}

impl SpecDocument for Swagger {
    type Variation = V2;

    fn registry_mut(&mut self) -> &mut DefinitionRegistry {
        &mut self.definitions
    }

    fn insert_operation(&mut self, path: &str, method: Method, operation: Operation) {
        self.paths
            .entry(path.to_owned())
            .or_default()
            .insert(method.lowercase().to_owned(), operation);
    }
}

/// A Swagger 2.0 operation.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub responses: IndexMap<String, Response>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

/// A Swagger 2.0 parameter. Body parameters carry `schema`; everything else
/// carries the inline type fields.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ModelReference>,
}

impl Parameter {
    fn from_model(model: ParameterModel) -> Self {
        if model.location == ParameterLocation::Body {
            let schema = match model.property.reference {
                Some(reference) => ModelReference::reference(reference),
                None => ModelReference {
                    schema_type: model.property.property_type,
                    format: model.property.format,
                    reference: None,
                },
            };
            Parameter {
                name: model.name,
                location: model.location,
                description: model.description,
                required: model.required,
                parameter_type: None,
                format: None,
                enum_values: None,
                items: None,
                default: None,
                schema: Some(schema),
            }
        } else {
            Parameter {
                name: model.name,
                location: model.location,
                description: model.description,
                required: model.required,
                parameter_type: model.property.property_type,
                format: model.property.format,
                enum_values: model.property.enum_values,
                items: model.property.items,
                default: model.default,
                schema: None,
            }
        }
    }
}

/// A Swagger 2.0 response. Custom content types are representable only via
/// `produces`; their payload schema is not modeled in v2.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ModelReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
}

/// The Swagger 2.0 rendering strategy.
pub struct V2;

impl SpecVariation for V2 {
    type Operation = Operation;
    type Response = Response;

    const REF_ROOT: &'static str = "#/definitions/";

    fn create_response(declared: &StatusResponse) -> Result<Option<Response>> {
        let fallback = || {
            declared
                .description
                .clone()
                .unwrap_or_else(|| status_description(declared.status))
        };
        // v2 has one schema slot, so only the first declared kind renders.
        let Some(first) = declared.kinds.first() else {
            return Ok(Some(Response {
                description: fallback(),
                schema: None,
                produces: None,
            }));
        };
        let response = match first {
            ResponseKind::FromType { descriptor, .. } => match descriptor {
                TypeDescriptor::Unit => Response {
                    description: fallback(),
                    schema: None,
                    produces: None,
                },
                TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_) => {
                    let property = to_property(descriptor, Self::REF_ROOT)?.0;
                    Response {
                        description: fallback(),
                        schema: Some(ModelReference {
                            schema_type: property.property_type,
                            format: property.format,
                            reference: None,
                        }),
                        produces: None,
                    }
                }
                _ => {
                    let name = descriptor.model_name()?;
                    Response {
                        description: declared.description.clone().unwrap_or_else(|| name.clone()),
                        schema: Some(ModelReference::reference(format!(
                            "{}{name}",
                            Self::REF_ROOT
                        ))),
                        produces: None,
                    }
                }
            },
            ResponseKind::FromSchema { name, .. } => Response {
                description: declared.description.clone().unwrap_or_else(|| name.clone()),
                schema: Some(ModelReference::reference(format!(
                    "{}{name}",
                    Self::REF_ROOT
                ))),
                produces: None,
            },
            ResponseKind::CustomContentType { content_type } => Response {
                description: fallback(),
                schema: None,
                produces: Some(vec![content_type.clone()]),
            },
        };
        Ok(Some(response))
    }

    fn create_operation(parts: OperationParts<Response>) -> Result<Operation> {
        let body_count = parts
            .parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Body)
            .count();
        if body_count > 1 {
            return Err(SpecError::MultipleBodyParameters {
                method: parts.method.as_str(),
                path: parts.path,
            });
        }
        Ok(Operation {
            summary: parts.summary,
            description: parts.description,
            tags: parts.tags,
            operation_id: parts.operation_id,
            parameters: parts
                .parameters
                .into_iter()
                .map(Parameter::from_model)
                .collect(),
            responses: parts.responses,
            security: parts.security,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
