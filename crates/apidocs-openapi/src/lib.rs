//! Swagger 2.0 / OpenAPI 3.0 document generation from type descriptors.
//!
//! This crate provides:
//!
//! - Type descriptors describing the shape of API models
//! - Schema extraction into an insertion-ordered definition registry
//! - Route registrations that derive parameters, bodies, and responses
//! - Two renderings of the same abstract model: Swagger 2.0 and OpenAPI 3.0
//!
//! # Example
//!
//! ```
//! use apidocs_openapi::{
//!     ok, ApiDocs, BodyKind, FieldDescriptor, Method, OpenApi, RouteRegistration, Swagger,
//!     TypeDescriptor,
//! };
//!
//! let toy = TypeDescriptor::object("ToyModel")
//!     .field(FieldDescriptor::new("id", TypeDescriptor::int32()).nullable())
//!     .field(FieldDescriptor::new("name", TypeDescriptor::string()))
//!     .build();
//!
//! let mut docs = ApiDocs::new()
//!     .with_swagger(Swagger::new())
//!     .with_open_api(OpenApi::new());
//! docs.register(
//!     &RouteRegistration::new(Method::Post, "/toys")
//!         .body(BodyKind::FromType(toy.clone()))
//!         .response(ok(toy)),
//! )
//! .unwrap();
//! ```

#![forbid(unsafe_code)]
// Pedantic clippy lints allowed (style suggestions, not correctness issues)
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::single_match_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::module_name_repetitions)]

mod descriptor;
mod error;
mod model;
mod operation;
mod registry;
mod support;
pub mod v2;
pub mod v3;
mod variation;

pub use descriptor::{
    CollectionDescriptor, EnumDescriptor, FieldDescriptor, ModelName, ObjectBuilder,
    ObjectDescriptor, PrimitiveDescriptor, TypeDescriptor,
};
pub use error::{Result, SpecError};
pub use model::{ArrayModel, Definition, ObjectModel, Property};
pub use operation::{
    bad_request, created, no_content, not_found, ok, BodyKind, Example, Metadata, Method,
    ParameterLocation, ParameterModel, ResponseKind, RouteRegistration, SecurityRequirement,
    StatusResponse,
};
pub use registry::DefinitionRegistry;
pub use support::ApiDocs;
pub use v2::Swagger;
pub use v3::OpenApi;
pub use variation::{Contact, Information, ModelReference, OperationParts, SpecDocument, SpecVariation};
