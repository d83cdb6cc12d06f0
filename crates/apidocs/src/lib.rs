//! Facade over the apidocs workspace: one crate to depend on.
//!
//! - [`apidocs_openapi`] (re-exported at the root): type descriptors, route
//!   registrations, and the Swagger 2.0 / OpenAPI 3.0 document models.
//! - [`apidocs_ui`] (re-exported under [`ui`]): documentation configuration
//!   and the Swagger UI serving surface.
//!
//! See `examples/petstore.rs` for an end-to-end walkthrough.

#![forbid(unsafe_code)]

pub use apidocs_openapi::*;

pub mod ui {
    pub use apidocs_ui::*;
}
