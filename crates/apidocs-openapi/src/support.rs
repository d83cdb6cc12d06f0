//! One registration, every configured document.

use tracing::debug;

use crate::error::Result;
use crate::operation::{apply_registration, RouteRegistration};
use crate::v2::Swagger;
use crate::v3::OpenApi;

/// Holds the configured spec documents and applies each route registration
/// to all of them, so one abstract route yields both renderings.
#[derive(Debug, Clone, Default)]
pub struct ApiDocs {
    pub swagger: Option<Swagger>,
    pub open_api: Option<OpenApi>,
}

impl ApiDocs {
    pub fn new() -> Self {
        ApiDocs::default()
    }

    #[must_use]
    pub fn with_swagger(mut self, swagger: Swagger) -> Self {
        self.swagger = Some(swagger);
        self
    }

    #[must_use]
    pub fn with_open_api(mut self, open_api: OpenApi) -> Self {
        self.open_api = Some(open_api);
        self
    }

    /// Registers one route against every configured document.
    ///
    /// Validation failures (forbidden body, unresolved generics, unsupported
    /// content types) surface here, at application startup.
    pub fn register(&mut self, route: &RouteRegistration) -> Result<()> {
        debug!(method = %route.method, path = %route.path, "registering route");
        if let Some(swagger) = self.swagger.as_mut() {
            apply_registration(swagger, route)?;
        }
        if let Some(open_api) = self.open_api.as_mut() {
            apply_registration(open_api, route)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, TypeDescriptor};
    use crate::error::SpecError;
    use crate::operation::{ok, BodyKind, Method};

    fn toy_model() -> TypeDescriptor {
        TypeDescriptor::object("ToyModel")
            .field(FieldDescriptor::new("name", TypeDescriptor::string()))
            .build()
    }

    #[test]
    fn one_registration_feeds_both_documents() {
        let mut docs = ApiDocs::new()
            .with_swagger(Swagger::new())
            .with_open_api(OpenApi::new());
        let route = RouteRegistration::new(Method::Post, "/toys")
            .body(BodyKind::FromType(toy_model()))
            .response(ok(toy_model()));

        docs.register(&route).unwrap();

        let swagger = docs.swagger.unwrap();
        let open_api = docs.open_api.unwrap();
        assert!(swagger.definitions.contains("ToyModel"));
        assert!(open_api.components.schemas.contains("ToyModel"));
        assert!(swagger.paths["/toys"].contains_key("post"));
        assert!(open_api.paths["/toys"].contains_key("post"));
    }

    #[test]
    fn body_on_get_fails_at_registration() {
        let mut docs = ApiDocs::new().with_swagger(Swagger::new());
        let route = RouteRegistration::new(Method::Get, "/toys")
            .body(BodyKind::FromType(toy_model()));

        assert!(matches!(
            docs.register(&route),
            Err(SpecError::BodyNotAllowed { method: "GET" })
        ));
    }

    #[test]
    fn unconfigured_documents_are_skipped() {
        let mut docs = ApiDocs::new();
        let route = RouteRegistration::new(Method::Get, "/toys").response(ok(toy_model()));
        docs.register(&route).unwrap();
    }
}
