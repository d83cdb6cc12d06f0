//! The seam between the shared registration driver and the two spec
//! versions.
//!
//! [`SpecVariation`] is the rendering strategy: given version-agnostic
//! operation parts it produces the version's operation and response types.
//! [`SpecDocument`] is the mutable document the driver writes into. The
//! driver itself lives in [`crate::operation`].

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::operation::{
    Method, ParameterModel, SecurityRequirement, StatusResponse,
};
use crate::registry::DefinitionRegistry;

/// Version-specific rendering of operations and responses.
pub trait SpecVariation {
    type Operation: Serialize;
    type Response: Serialize;

    /// Prefix for `$ref` values into this variation's definition section.
    const REF_ROOT: &'static str;

    /// Renders one declared response, or `None` when the declaration is
    /// empty and the variation omits the status entirely.
    fn create_response(response: &StatusResponse) -> Result<Option<Self::Response>>;

    /// Assembles an operation, enforcing the single-body-parameter rule.
    fn create_operation(parts: OperationParts<Self::Response>) -> Result<Self::Operation>;
}

/// A document the registration driver can write operations into.
pub trait SpecDocument {
    type Variation: SpecVariation;

    fn registry_mut(&mut self) -> &mut DefinitionRegistry;

    /// Inserts at `paths[path][method]`, replacing any previous operation
    /// registered under the same pair.
    fn insert_operation(
        &mut self,
        path: &str,
        method: Method,
        operation: <Self::Variation as SpecVariation>::Operation,
    );
}

/// Version-agnostic pieces of one operation, assembled by the driver.
#[derive(Debug, Clone)]
pub struct OperationParts<R> {
    pub method: Method,
    pub path: String,
    pub summary: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub operation_id: Option<String>,
    pub security: Vec<SecurityRequirement>,
    pub parameters: Vec<ParameterModel>,
    pub responses: IndexMap<String, R>,
}

/// A schema slot that is either a `$ref` or a bare type/format pair, as used
/// in v2 body-parameter schemas and v3 media types.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelReference {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ModelReference {
    pub fn reference(reference: impl Into<String>) -> Self {
        ModelReference {
            reference: Some(reference.into()),
            ..ModelReference::default()
        }
    }

    pub fn typed(schema_type: &str, format: Option<&str>) -> Self {
        ModelReference {
            schema_type: Some(schema_type.to_owned()),
            format: format.map(str::to_owned),
            ..ModelReference::default()
        }
    }
}

/// The `info` object shared by both document versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Information {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

impl Information {
    pub fn new() -> Self {
        Information::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Contact {
    pub fn new() -> Self {
        Contact::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
