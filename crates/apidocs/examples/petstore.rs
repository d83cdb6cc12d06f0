//! Pet store walkthrough: descriptors, routes, custom schemas, and the
//! documentation surface, end to end.
//!
//! Run with `cargo run --example petstore` and it prints where each document
//! would be served plus the generated OpenAPI 3.0 JSON.

use apidocs::ui::{DocsConfig, DocsResponse};
use apidocs::{
    created, no_content, not_found, ok, BodyKind, FieldDescriptor, Information, Metadata, Method,
    OpenApi, ResponseKind, RouteRegistration, StatusResponse, Swagger, TypeDescriptor,
};

fn pet_model() -> TypeDescriptor {
    TypeDescriptor::object("PetModel")
        .field(FieldDescriptor::new("id", TypeDescriptor::int32()).nullable())
        .field(FieldDescriptor::new("name", TypeDescriptor::string()))
        .build()
}

fn pets_model() -> TypeDescriptor {
    TypeDescriptor::object("PetsModel")
        .field(FieldDescriptor::new(
            "pets",
            TypeDescriptor::list(pet_model()),
        ))
        .build()
}

/// Generic page wrapper, instantiated per element type.
fn page_template() -> TypeDescriptor {
    TypeDescriptor::generic("Page", ["T"])
        .field(FieldDescriptor::new(
            "elements",
            TypeDescriptor::list(TypeDescriptor::param("T")),
        ))
        .build()
}

fn pet_location() -> TypeDescriptor {
    TypeDescriptor::object("pet")
        .field(FieldDescriptor::new("id", TypeDescriptor::int32()))
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let info = Information::new()
        .title("Pet store")
        .version("1.0.0")
        .description("Sample documentation generated from type descriptors");

    let mut swagger = Swagger::new().info(info.clone());
    let mut open_api = OpenApi::new().info(info);

    // Hand-written schemas, referenced by name from the shapes route. The
    // rectangle schema is written once per document because its internal
    // refs carry the document's ref root.
    let size_schema = serde_json::json!({"type": "number", "minimum": 0});
    let rectangle_schema = |ref_root: &str| {
        serde_json::json!({
            "type": "object",
            "properties": {
                "a": {"$ref": format!("{ref_root}size")},
                "b": {"$ref": format!("{ref_root}size")}
            }
        })
    };
    swagger
        .definitions
        .insert_custom("size", size_schema.clone());
    let rect = rectangle_schema(swagger.definitions.ref_root());
    swagger.definitions.insert_custom("rectangle", rect);
    open_api.components.schemas.insert_custom("size", size_schema);
    let rect = rectangle_schema(open_api.components.schemas.ref_root());
    open_api.components.schemas.insert_custom("rectangle", rect);

    let mut docs = DocsConfig::new()
        .title("Pet store")
        .forward_root(true)
        .swagger(swagger)
        .open_api(open_api)
        .install()?;

    docs.register(
        &RouteRegistration::new(Method::Get, "/pets")
            .metadata(Metadata::new().summary("all pets").group("pets"))
            .response(ok(pets_model())),
    )?;
    docs.register(
        &RouteRegistration::new(Method::Post, "/pets")
            .metadata(Metadata::new().summary("create pet").group("pets"))
            .body(BodyKind::FromType(pet_model()))
            .response(created(pet_model())),
    )?;
    docs.register(
        &RouteRegistration::new(Method::Put, "/pets/{id}")
            .metadata(Metadata::new().summary("update pet").group("pets"))
            .location(pet_location())
            .body(BodyKind::FromType(pet_model()))
            .response(ok(pet_model()))
            .response(not_found()),
    )?;
    docs.register(
        &RouteRegistration::new(Method::Delete, "/pets/{id}")
            .metadata(Metadata::new().summary("delete pet").group("pets"))
            .location(pet_location())
            .response(no_content()),
    )?;
    // A generic instantiation registers under its derived name, PageOfPetModel.
    docs.register(
        &RouteRegistration::new(Method::Get, "/pets/paged")
            .metadata(Metadata::new().summary("paged pets").group("pets"))
            .response(ok(page_template().instantiate([pet_model()])?)),
    )?;
    // A schema-referencing route against the hand-written definitions.
    docs.register(
        &RouteRegistration::new(Method::Post, "/shapes")
            .metadata(Metadata::new().summary("create shape").group("shapes"))
            .body(BodyKind::FromSchema {
                name: "rectangle".to_owned(),
            })
            .response(StatusResponse::new(
                200,
                vec![ResponseKind::schema("rectangle")],
            )),
    )?;

    println!("docs index: {}", docs.index_location());
    match docs.handle("/apidocs/openapi.json")? {
        DocsResponse::Document { json } => println!("{json}"),
        other => println!("unexpected response: {other:?}"),
    }
    Ok(())
}
