//! Documentation configuration and the framework-agnostic serving surface.
//!
//! [`DocsService`] owns the spec documents and answers path lookups with a
//! [`DocsResponse`]; translating that into an actual HTTP response (and
//! mounting the routes) is the hosting framework's job.

use apidocs_openapi::{ApiDocs, OpenApi, RouteRegistration, Swagger};
use thiserror::Error;
use tracing::debug;

use crate::assets::{SwaggerUi, WebAsset};

/// Default CDN the generated UI page loads its assets from.
const DEFAULT_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5";

/// Errors raised when the documentation service is installed.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Neither a Swagger 2.0 nor an OpenAPI 3.0 document was configured.
    #[error("documentation requires at least one of swagger or openApi to be configured")]
    MissingDocument,
}

/// Configuration for the documentation endpoints.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Base path segment the documentation is mounted under.
    pub path: Option<String>,
    /// Redirect `/` to the documentation index.
    pub forward_root: bool,
    /// Serve the bundled Swagger UI alongside the JSON documents.
    pub provide_ui: Option<bool>,
    /// Title of the generated UI page.
    pub title: Option<String>,
    /// CDN base URL for Swagger UI assets.
    pub cdn_url: Option<String>,
    pub swagger: Option<Swagger>,
    pub open_api: Option<OpenApi>,
}

impl DocsConfig {
    pub fn new() -> Self {
        DocsConfig::default()
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn forward_root(mut self, forward: bool) -> Self {
        self.forward_root = forward;
        self
    }

    #[must_use]
    pub fn provide_ui(mut self, provide: bool) -> Self {
        self.provide_ui = Some(provide);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn cdn_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn swagger(mut self, swagger: Swagger) -> Self {
        self.swagger = Some(swagger);
        self
    }

    #[must_use]
    pub fn open_api(mut self, open_api: OpenApi) -> Self {
        self.open_api = Some(open_api);
        self
    }

    /// Validates the configuration and builds the serving surface.
    ///
    /// At least one document must be configured; the default document (the
    /// one the UI opens) is `openapi.json` when OpenAPI 3 is configured,
    /// `swagger.json` otherwise.
    pub fn install(self) -> Result<DocsService, InstallError> {
        if self.swagger.is_none() && self.open_api.is_none() {
            return Err(InstallError::MissingDocument);
        }
        let path = self.path.unwrap_or_else(|| "apidocs".to_owned());
        let default_json = if self.open_api.is_some() {
            "openapi.json"
        } else {
            "swagger.json"
        };
        debug!(path = %path, default_json, "documentation installed");
        Ok(DocsService {
            docs: ApiDocs {
                swagger: self.swagger,
                open_api: self.open_api,
            },
            path,
            forward_root: self.forward_root,
            provide_ui: self.provide_ui.unwrap_or(true),
            default_json,
            ui: SwaggerUi::new(
                self.cdn_url.unwrap_or_else(|| DEFAULT_CDN_URL.to_owned()),
                self.title.unwrap_or_else(|| "API Documentation".to_owned()),
            ),
        })
    }
}

/// What the hosting framework should answer for a documentation path.
#[derive(Debug, Clone)]
pub enum DocsResponse {
    /// Redirect (303) to the given location.
    Redirect { location: String },
    /// Serve a spec document as `application/json`.
    Document { json: String },
    /// Serve a UI asset.
    Asset(WebAsset),
    /// The path is not part of the documentation surface.
    NotFound,
}

/// The installed documentation surface.
#[derive(Debug)]
pub struct DocsService {
    docs: ApiDocs,
    path: String,
    forward_root: bool,
    provide_ui: bool,
    default_json: &'static str,
    ui: SwaggerUi,
}

impl DocsService {
    /// Forwards one route registration to every configured document.
    pub fn register(&mut self, route: &RouteRegistration) -> apidocs_openapi::Result<()> {
        self.docs.register(route)
    }

    /// The base path the documentation is mounted under.
    pub fn base_path(&self) -> &str {
        &self.path
    }

    /// Location of the documentation index, with the default document
    /// preselected.
    pub fn index_location(&self) -> String {
        format!("/{}/index.html?url={}", self.path, self.default_json)
    }

    /// Resolves a request path against the documentation surface.
    ///
    /// Serialization of a configured document is the only fallible step and
    /// only fails on a malformed custom schema value.
    pub fn handle(&self, request_path: &str) -> Result<DocsResponse, serde_json::Error> {
        let trimmed = request_path.trim_end_matches('/');
        if trimmed.is_empty() {
            // The application root.
            return Ok(if self.forward_root && request_path == "/" {
                DocsResponse::Redirect {
                    location: self.index_location(),
                }
            } else {
                DocsResponse::NotFound
            });
        }

        let Some(rest) = trimmed
            .strip_prefix('/')
            .and_then(|p| p.strip_prefix(self.path.as_str()))
        else {
            return Ok(DocsResponse::NotFound);
        };

        match rest {
            "" => Ok(DocsResponse::Redirect {
                location: self.index_location(),
            }),
            "/swagger.json" => match &self.docs.swagger {
                Some(swagger) => Ok(DocsResponse::Document {
                    json: serde_json::to_string_pretty(swagger)?,
                }),
                None => Ok(DocsResponse::NotFound),
            },
            "/openapi.json" => match &self.docs.open_api {
                Some(open_api) => Ok(DocsResponse::Document {
                    json: serde_json::to_string_pretty(open_api)?,
                }),
                None => Ok(DocsResponse::NotFound),
            },
            other => {
                let Some(filename) = other.strip_prefix('/') else {
                    return Ok(DocsResponse::NotFound);
                };
                if !self.provide_ui || filename.contains('/') {
                    return Ok(DocsResponse::NotFound);
                }
                Ok(match self.ui.serve(filename) {
                    Some(asset) => DocsResponse::Asset(asset),
                    None => DocsResponse::NotFound,
                })
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
