//! Serving surface for generated API documentation.
//!
//! This crate provides:
//!
//! - [`DocsConfig`] / [`DocsService`] — configuration and the
//!   framework-agnostic path resolver for the documentation endpoints
//! - [`SwaggerUi`] — the memoized Swagger UI asset provider
//!
//! The service answers path lookups with a [`DocsResponse`]; mapping that
//! onto real HTTP responses is left to the hosting framework.
//!
//! # Example
//!
//! ```
//! use apidocs_openapi::{OpenApi, Swagger};
//! use apidocs_ui::{DocsConfig, DocsResponse};
//!
//! let service = DocsConfig::new()
//!     .swagger(Swagger::new())
//!     .open_api(OpenApi::new())
//!     .install()
//!     .unwrap();
//!
//! match service.handle("/apidocs").unwrap() {
//!     DocsResponse::Redirect { location } => {
//!         assert_eq!(location, "/apidocs/index.html?url=openapi.json");
//!     }
//!     _ => unreachable!(),
//! }
//! ```

#![forbid(unsafe_code)]
// Pedantic clippy lints allowed (style suggestions, not correctness issues)
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

mod assets;
mod config;

pub use assets::{SwaggerUi, WebAsset};
pub use config::{DocsConfig, DocsResponse, DocsService, InstallError};
