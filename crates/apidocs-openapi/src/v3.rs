//! OpenAPI 3.0 rendering: `#/components/schemas/` refs, lifted request
//! bodies, and media-type wrapped responses.

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SpecError};
use crate::model::{to_property, Property};
use crate::operation::{
    status_description, Example, Method, ParameterLocation, ResponseKind, SecurityRequirement,
    StatusResponse,
};
use crate::registry::DefinitionRegistry;
use crate::variation::{Information, OperationParts, SpecDocument, SpecVariation};

/// Operations per lowercase method name, per path.
pub type Paths = IndexMap<String, IndexMap<String, Operation>>;

/// An OpenAPI 3.0 document.
#[derive(Debug, Clone, Serialize)]
pub struct OpenApi {
    openapi: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Information>,
    pub paths: Paths,
    pub components: Components,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

impl OpenApi {
    pub fn new() -> Self {
        OpenApi {
            openapi: "3.0.0",
            info: None,
            paths: Paths::new(),
            components: Components {
                schemas: DefinitionRegistry::new(V3::REF_ROOT),
                security_schemes: IndexMap::new(),
            },
            security: Vec::new(),
        }
    }

    #[must_use]
    pub fn info(mut self, info: Information) -> Self {
        self.info = Some(info);
        self
    }

    /// Declares a security scheme under `components.securitySchemes`.
    #[must_use]
    pub fn security_scheme(mut self, name: impl Into<String>, scheme: serde_json::Value) -> Self {
        self.components.security_schemes.insert(name.into(), scheme);
        self
    }

    /// Adds a document-wide security requirement.
    #[must_use]
    pub fn require_security<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
        self.security.push(requirement);
        self
    }
}

impl Default for OpenApi {
    fn default() -> Self {
        OpenApi::new()
    }
}

impl SpecDocument for OpenApi {
    type Variation = V3;

    fn registry_mut(&mut self) -> &mut DefinitionRegistry {
        &mut self.components.schemas
    }

    fn insert_operation(&mut self, path: &str, method: Method, operation: Operation) {
        self.paths
            .entry(path.to_owned())
            .or_default()
            .insert(method.lowercase().to_owned(), operation);
    }
}

/// The `components` object. Only schemas and security schemes are modeled.
#[derive(Debug, Clone, Serialize)]
pub struct Components {
    pub schemas: DefinitionRegistry,
    #[serde(
        rename = "securitySchemes",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, serde_json::Value>,
}

/// An OpenAPI 3.0 operation.
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
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

/// An OpenAPI 3.0 parameter: the schema fragment moves under `schema`.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub schema: Property,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

/// A request body with its content map.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    pub content: IndexMap<String, MediaTypeObject>,
}

/// One media type entry in a request body or response.
#[derive(Debug, Clone, Serialize)]
pub struct MediaTypeObject {
    pub schema: Property,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

impl MediaTypeObject {
    fn new(schema: Property) -> Self {
        MediaTypeObject {
            schema,
            examples: IndexMap::new(),
        }
    }
}

/// An OpenAPI 3.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaTypeObject>,
}

/// The OpenAPI 3.0 rendering strategy.
pub struct V3;

/// Schema for a custom content type. Images are binary strings, text is a
/// plain string; anything else has no automatic mapping.
fn content_type_schema(content_type: &str) -> Result<Property> {
    if content_type.starts_with("image/") {
        Ok(Property::typed("string", Some("binary")))
    } else if content_type.starts_with("text/") {
        Ok(Property::typed("string", None))
    } else {
        Err(SpecError::UnsupportedContentType {
            content_type: content_type.to_owned(),
        })
    }
}

impl SpecVariation for V3 {
    type Operation = Operation;
    type Response = Response;

    const REF_ROOT: &'static str = "#/components/schemas/";

    fn create_response(declared: &StatusResponse) -> Result<Option<Response>> {
        let mut content = IndexMap::new();
        let mut derived_description = None;

        for kind in &declared.kinds {
            match kind {
                ResponseKind::FromType {
                    descriptor,
                    examples,
                } => match descriptor {
                    TypeDescriptor::Unit => {}
                    TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_) => {
                        let schema = to_property(descriptor, Self::REF_ROOT)?.0;
                        content.insert(
                            "application/json".to_owned(),
                            MediaTypeObject {
                                schema,
                                examples: examples.clone(),
                            },
                        );
                    }
                    _ => {
                        let name = descriptor.model_name()?;
                        derived_description.get_or_insert_with(|| name.clone());
                        content.insert(
                            "application/json".to_owned(),
                            MediaTypeObject {
                                schema: Property::reference(format!("{}{name}", Self::REF_ROOT)),
                                examples: examples.clone(),
                            },
                        );
                    }
                },
                ResponseKind::FromSchema { name, examples } => {
                    derived_description.get_or_insert_with(|| name.clone());
                    content.insert(
                        "application/json".to_owned(),
                        MediaTypeObject {
                            schema: Property::reference(format!("{}{name}", Self::REF_ROOT)),
                            examples: examples.clone(),
                        },
                    );
                }
                ResponseKind::CustomContentType { content_type } => {
                    content.insert(
                        content_type.clone(),
                        MediaTypeObject::new(content_type_schema(content_type)?),
                    );
                }
            }
        }

        let description = declared
            .description
            .clone()
            .or(derived_description)
            .unwrap_or_else(|| status_description(declared.status));
        Ok(Some(Response {
            description,
            content,
        }))
    }

    fn create_operation(parts: OperationParts<Response>) -> Result<Operation> {
        let (body_params, other_params): (Vec<_>, Vec<_>) = parts
            .parameters
            .into_iter()
            .partition(|p| p.location == ParameterLocation::Body);
        if body_params.len() > 1 {
            return Err(SpecError::MultipleBodyParameters {
                method: parts.method.as_str(),
                path: parts.path,
            });
        }

        let request_body = body_params.into_iter().next().map(|body| {
            // Plain string bodies are text, everything else ships as JSON.
            let media_type = if body.property.property_type.as_deref() == Some("string")
                && body.property.enum_values.is_none()
            {
                "text/plain"
            } else {
                "application/json"
            };
            let mut content = IndexMap::new();
            content.insert(
                media_type.to_owned(),
                MediaTypeObject {
                    schema: body.property,
                    examples: body.examples,
                },
            );
            RequestBody { content }
        });

        Ok(Operation {
            summary: parts.summary,
            description: parts.description,
            tags: parts.tags,
            operation_id: parts.operation_id,
            parameters: other_params
                .into_iter()
                .map(|model| Parameter {
                    name: model.name,
                    location: model.location,
                    description: model.description,
                    required: model.required,
                    schema: model.property,
                    examples: model.examples,
                })
                .collect(),
            request_body,
            responses: parts.responses,
            security: parts.security,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
