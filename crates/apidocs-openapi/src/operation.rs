//! Route registrations and the driver that turns them into operations.
//!
//! A [`RouteRegistration`] is the narrow contract with the hosting
//! application's router: method, path template, descriptor-typed parameter
//! classes, response declarations, and free-form metadata. The driver in
//! [`apply_registration`] derives parameters, registers every referenced
//! model, and hands the assembled parts to a spec variation for rendering.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::descriptor::{resolve, TypeDescriptor};
use crate::error::{Result, SpecError};
use crate::model::{to_property, Property};
use crate::registry::DefinitionRegistry;
use crate::variation::{OperationParts, SpecDocument, SpecVariation};

/// HTTP methods an operation can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Uppercase name, as used in summaries and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Lowercase name, as used for path-item keys in both spec versions.
    pub fn lowercase(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Put => "put",
            Method::Post => "post",
            Method::Delete => "delete",
            Method::Patch => "patch",
            Method::Head => "head",
            Method::Options => "options",
        }
    }

    /// GET and DELETE structurally forbid request bodies.
    pub fn forbids_body(self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried, with the wire spelling both versions share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

/// A named example attached to a body, parameter, or response media type.
///
/// Rendered only by the OpenAPI 3 variation; Swagger 2 has no slot for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,
}

impl Example {
    pub fn of(value: serde_json::Value) -> Self {
        Example {
            value: Some(value),
            ..Example::default()
        }
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One security requirement: scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Free-form operation metadata supplied at registration.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Defaults to `"<METHOD> <path>"` when unset.
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Rendered as the operation's single tag.
    pub group: Option<String>,
    pub operation_id: Option<String>,
    pub security: Vec<SecurityRequirement>,
    /// Named examples for the request body (OpenAPI 3 only).
    pub body_examples: IndexMap<String, Example>,
}

impl Metadata {
    pub fn new() -> Self {
        Metadata::default()
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    #[must_use]
    pub fn security<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(
            scheme.into(),
            scopes.into_iter().map(Into::into).collect(),
        );
        self.security.push(requirement);
        self
    }

    #[must_use]
    pub fn body_example(mut self, name: impl Into<String>, example: Example) -> Self {
        self.body_examples.insert(name.into(), example);
        self
    }
}

/// How the request body is declared.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// Derive the schema from a descriptor. A `Unit` descriptor means "no
    /// body" and produces no parameter at all.
    FromType(TypeDescriptor),
    /// Reference a definition by name; the definition itself is expected to
    /// be supplied as a custom schema.
    FromSchema { name: String },
}

/// How one response payload is declared.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind {
    /// JSON payload with a derived schema. `Unit` means an empty response.
    FromType {
        descriptor: TypeDescriptor,
        examples: IndexMap<String, Example>,
    },
    /// JSON payload referencing a named definition.
    FromSchema {
        name: String,
        examples: IndexMap<String, Example>,
    },
    /// A non-JSON payload identified only by content type. Only `image/*`
    /// and `text/*` have automatic OpenAPI 3 schema mappings.
    CustomContentType { content_type: String },
}

impl ResponseKind {
    pub fn json(descriptor: TypeDescriptor) -> Self {
        ResponseKind::FromType {
            descriptor,
            examples: IndexMap::new(),
        }
    }

    pub fn schema(name: impl Into<String>) -> Self {
        ResponseKind::FromSchema {
            name: name.into(),
            examples: IndexMap::new(),
        }
    }

    pub fn content_type(content_type: impl Into<String>) -> Self {
        ResponseKind::CustomContentType {
            content_type: content_type.into(),
        }
    }

    #[must_use]
    pub fn example(mut self, name: impl Into<String>, example: Example) -> Self {
        match &mut self {
            ResponseKind::FromType { examples, .. }
            | ResponseKind::FromSchema { examples, .. } => {
                examples.insert(name.into(), example);
            }
            ResponseKind::CustomContentType { .. } => {}
        }
        self
    }
}

/// A declared response: status code, optional description override, and the
/// payload kinds it can carry.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    pub status: u16,
    pub description: Option<String>,
    pub kinds: Vec<ResponseKind>,
}

impl StatusResponse {
    pub fn new(status: u16, kinds: Vec<ResponseKind>) -> Self {
        StatusResponse {
            status,
            description: None,
            kinds,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// `200 OK` with a derived JSON schema.
pub fn ok(descriptor: TypeDescriptor) -> StatusResponse {
    StatusResponse::new(200, vec![ResponseKind::json(descriptor)])
}

/// `201 Created` with a derived JSON schema.
pub fn created(descriptor: TypeDescriptor) -> StatusResponse {
    StatusResponse::new(201, vec![ResponseKind::json(descriptor)])
}

/// `204 No Content`.
pub fn no_content() -> StatusResponse {
    StatusResponse::new(204, vec![ResponseKind::json(TypeDescriptor::unit())])
}

/// `400 Bad Request` without a payload.
pub fn bad_request() -> StatusResponse {
    StatusResponse::new(400, vec![ResponseKind::json(TypeDescriptor::unit())])
}

/// `404 Not Found` without a payload.
pub fn not_found() -> StatusResponse {
    StatusResponse::new(404, vec![ResponseKind::json(TypeDescriptor::unit())])
}

/// Standard reason phrase for the handful of codes the library emits by
/// default; anything else renders the bare code.
pub(crate) fn status_description(status: u16) -> String {
    match status {
        200 => "OK".to_owned(),
        201 => "Created".to_owned(),
        202 => "Accepted".to_owned(),
        204 => "No Content".to_owned(),
        400 => "Bad Request".to_owned(),
        401 => "Unauthorized".to_owned(),
        403 => "Forbidden".to_owned(),
        404 => "Not Found".to_owned(),
        409 => "Conflict".to_owned(),
        422 => "Unprocessable Entity".to_owned(),
        500 => "Internal Server Error".to_owned(),
        other => other.to_string(),
    }
}

/// Everything the router tells the documentation layer about one route.
#[derive(Debug, Clone)]
pub struct RouteRegistration {
    pub method: Method,
    pub path: String,
    /// Location class: fields become path or query parameters depending on
    /// whether their `{name}` placeholder appears in the path template.
    pub location: Option<TypeDescriptor>,
    pub body: Option<BodyKind>,
    /// Query class: fields are always query parameters.
    pub query: Option<TypeDescriptor>,
    /// Header class: fields are always header parameters.
    pub headers: Option<TypeDescriptor>,
    pub responses: Vec<StatusResponse>,
    pub metadata: Metadata,
}

impl RouteRegistration {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        RouteRegistration {
            method,
            path: path.into(),
            location: None,
            body: None,
            query: None,
            headers: None,
            responses: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    #[must_use]
    pub fn location(mut self, descriptor: TypeDescriptor) -> Self {
        self.location = Some(descriptor);
        self
    }

    #[must_use]
    pub fn body(mut self, body: BodyKind) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn query(mut self, descriptor: TypeDescriptor) -> Self {
        self.query = Some(descriptor);
        self
    }

    #[must_use]
    pub fn headers(mut self, descriptor: TypeDescriptor) -> Self {
        self.headers = Some(descriptor);
        self
    }

    #[must_use]
    pub fn response(mut self, response: StatusResponse) -> Self {
        self.responses.push(response);
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The declared body, with `Unit`-typed bodies normalized away.
    fn effective_body(&self) -> Option<&BodyKind> {
        match &self.body {
            Some(BodyKind::FromType(TypeDescriptor::Unit)) => None,
            other => other.as_ref(),
        }
    }
}

/// An operation's parameter before version-specific rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterModel {
    pub name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<String>,
    pub property: Property,
    pub examples: IndexMap<String, Example>,
}

/// Applies one registration to one document: validates body placement,
/// derives parameters, registers referenced models, renders responses, and
/// inserts the built operation at `paths[path][method]`.
pub(crate) fn apply_registration<D: SpecDocument>(
    document: &mut D,
    route: &RouteRegistration,
) -> Result<()> {
    let ref_root = document.registry_mut().ref_root();
    let mut parameters = Vec::new();

    if let Some(body) = route.effective_body() {
        if route.method.forbids_body() {
            return Err(SpecError::BodyNotAllowed {
                method: route.method.as_str(),
            });
        }
        let (name, property) = match body {
            BodyKind::FromType(descriptor) => {
                document.registry_mut().register(descriptor)?;
                let model = descriptor.model_name()?;
                let property = match descriptor {
                    // Primitives stay inline; objects and collections
                    // reference their registered definition.
                    TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_) => {
                        to_property(descriptor, ref_root)?.0
                    }
                    _ => Property::reference(format!("{ref_root}{model}")),
                };
                (model, property)
            }
            BodyKind::FromSchema { name } => (
                name.clone(),
                Property::reference(format!("{ref_root}{name}")),
            ),
        };
        parameters.push(ParameterModel {
            name: "body".to_owned(),
            location: ParameterLocation::Body,
            description: Some(name),
            required: true,
            default: None,
            property,
            examples: route.metadata.body_examples.clone(),
        });
    }

    if let Some(location) = &route.location {
        let derived =
            class_parameters(document.registry_mut(), location, &route.path, None)?;
        parameters.extend(derived);
    }
    if let Some(query) = &route.query {
        let derived = class_parameters(
            document.registry_mut(),
            query,
            &route.path,
            Some(ParameterLocation::Query),
        )?;
        parameters.extend(derived);
    }
    if let Some(headers) = &route.headers {
        let derived = class_parameters(
            document.registry_mut(),
            headers,
            &route.path,
            Some(ParameterLocation::Header),
        )?;
        parameters.extend(derived);
    }

    let mut responses = IndexMap::new();
    for declared in &route.responses {
        for kind in &declared.kinds {
            if let ResponseKind::FromType { descriptor, .. } = kind {
                document.registry_mut().register(descriptor)?;
            }
        }
        if let Some(rendered) = D::Variation::create_response(declared)? {
            responses.insert(declared.status.to_string(), rendered);
        }
    }

    let summary = route
        .metadata
        .summary
        .clone()
        .unwrap_or_else(|| format!("{} {}", route.method, route.path));
    let parts = OperationParts {
        method: route.method,
        path: route.path.clone(),
        summary,
        description: route.metadata.description.clone(),
        tags: route.metadata.group.clone().into_iter().collect(),
        operation_id: route.metadata.operation_id.clone(),
        security: route.metadata.security.clone(),
        parameters,
        responses,
    };
    let operation = D::Variation::create_operation(parts)?;
    debug!(method = %route.method, path = %route.path, "registered operation");
    document.insert_operation(&route.path, route.method, operation);
    Ok(())
}

/// Derives parameters from the fields of a location/query/header class.
///
/// With no forced location, a field whose `{name}` placeholder appears in
/// the path template is a path parameter; anything else falls back to query.
fn class_parameters(
    registry: &mut DefinitionRegistry,
    class: &TypeDescriptor,
    path: &str,
    forced: Option<ParameterLocation>,
) -> Result<Vec<ParameterModel>> {
    let TypeDescriptor::Object(object) = class else {
        return Err(SpecError::UnsupportedType {
            type_name: class.describe(),
        });
    };
    let bindings = object.bindings()?;
    let ref_root = registry.ref_root();
    let mut parameters = Vec::new();

    for field in &object.fields {
        if field.ignored {
            continue;
        }
        let location = forced.unwrap_or_else(|| {
            if path.contains(&format!("{{{}}}", field.name)) {
                ParameterLocation::Path
            } else {
                ParameterLocation::Query
            }
        });
        let mut property = if let Some(name) = &field.schema_ref {
            Property::reference(format!("{ref_root}{name}"))
        } else {
            let resolved = resolve(&field.ty, &bindings, &object.name)?;
            let (property, discovered) = to_property(&resolved, ref_root)?;
            for found in discovered {
                registry.register(&found)?;
            }
            property
        };
        if let Some(default) = &field.default {
            property.default = Some(default.clone());
        }
        parameters.push(ParameterModel {
            name: field.name.clone(),
            location,
            description: field
                .description
                .clone()
                .or_else(|| Some(field.name.clone())),
            required: field.required(),
            default: field.default.clone(),
            property,
            examples: IndexMap::new(),
        });
    }
    Ok(parameters)
}

// =============================================================================
// Tests
// =============================================================================
