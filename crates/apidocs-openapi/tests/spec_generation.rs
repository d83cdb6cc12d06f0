//! Integration tests for document generation.
//!
//! This test suite covers:
//! - Parameter placement (path, query, header, body)
//! - Response rendering in both document versions
//! - The v2/v3 divergence for bodies, refs, and content types
//! - Security, custom schemas, and registration validation

use apidocs_openapi::{
    created, not_found, ok, ApiDocs, BodyKind, Example, FieldDescriptor, Metadata, Method, OpenApi,
    ResponseKind, RouteRegistration, SpecError, StatusResponse, Swagger, TypeDescriptor,
};

fn toy_model() -> TypeDescriptor {
    TypeDescriptor::object("ToyModel")
        .field(FieldDescriptor::new("id", TypeDescriptor::int32()).nullable())
        .field(FieldDescriptor::new("name", TypeDescriptor::string()))
        .build()
}

fn toys_model() -> TypeDescriptor {
    TypeDescriptor::object("ToysModel")
        .field(FieldDescriptor::new(
            "toys",
            TypeDescriptor::list(toy_model()),
        ))
        .build()
}

fn toy_location() -> TypeDescriptor {
    TypeDescriptor::object("toy")
        .field(FieldDescriptor::new("id", TypeDescriptor::int32()))
        .build()
}

/// The registrations the original sample application makes, applied to both
/// document versions.
fn sample_docs() -> ApiDocs {
    let mut docs = ApiDocs::new()
        .with_swagger(Swagger::new())
        .with_open_api(OpenApi::new());

    let query = TypeDescriptor::object("query")
        .field(FieldDescriptor::new("optionalParameter", TypeDescriptor::string()).nullable())
        .field(FieldDescriptor::new(
            "mandatoryParameter",
            TypeDescriptor::int32(),
        ))
        .build();
    let header = TypeDescriptor::object("header")
        .field(FieldDescriptor::new("optionalHeader", TypeDescriptor::string()).nullable())
        .field(FieldDescriptor::new(
            "mandatoryHeader",
            TypeDescriptor::int32(),
        ))
        .build();

    docs.register(
        &RouteRegistration::new(Method::Put, "/toys/{id}")
            .metadata(Metadata::new().summary("update").group("toy"))
            .location(toy_location())
            .body(BodyKind::FromType(toy_model()))
            .response(ok(toy_model()))
            .response(not_found()),
    )
    .unwrap();
    docs.register(
        &RouteRegistration::new(Method::Post, "/toys")
            .metadata(Metadata::new().summary("create"))
            .body(BodyKind::FromType(toy_model()))
            .response(created(toy_model())),
    )
    .unwrap();
    docs.register(
        &RouteRegistration::new(Method::Get, "/toys")
            .metadata(Metadata::new().summary("all"))
            .response(ok(toys_model()))
            .response(not_found()),
    )
    .unwrap();
    docs.register(
        &RouteRegistration::new(Method::Get, "/withParameter")
            .metadata(Metadata::new().summary("with parameter"))
            .query(query)
            .headers(header)
            .response(ok(TypeDescriptor::unit())),
    )
    .unwrap();
    docs
}

fn swagger_json(docs: &ApiDocs) -> serde_json::Value {
    serde_json::to_value(docs.swagger.as_ref().unwrap()).unwrap()
}

fn openapi_json(docs: &ApiDocs) -> serde_json::Value {
    serde_json::to_value(docs.open_api.as_ref().unwrap()).unwrap()
}

// ============================================================================
// SWAGGER 2.0 TESTS
// ============================================================================

mod swagger_v2 {
    use super::*;

    #[test]
    fn put_operation_carries_path_and_body_parameters() {
        let json = swagger_json(&sample_docs());
        let parameters = json["paths"]["/toys/{id}"]["put"]["parameters"]
            .as_array()
            .unwrap();
        let locations: Vec<_> = parameters.iter().map(|p| p["in"].as_str()).collect();

        assert!(locations.contains(&Some("body")));
        assert!(locations.contains(&Some("path")));
    }

    #[test]
    fn put_operation_has_200_and_404_responses() {
        let json = swagger_json(&sample_docs());
        let responses = &json["paths"]["/toys/{id}"]["put"]["responses"];

        assert!(responses.get("404").is_some());
        assert_eq!(
            responses["200"]["schema"]["$ref"],
            "#/definitions/ToyModel"
        );
    }

    #[test]
    fn operation_group_renders_as_tag() {
        let json = swagger_json(&sample_docs());
        assert_eq!(
            json["paths"]["/toys/{id}"]["put"]["tags"],
            serde_json::json!(["toy"])
        );
    }

    #[test]
    fn post_operation_registers_201() {
        let json = swagger_json(&sample_docs());
        assert!(json["paths"]["/toys"]["post"]["responses"]
            .get("201")
            .is_some());
    }

    #[test]
    fn toys_model_renders_array_of_refs() {
        let json = swagger_json(&sample_docs());
        let toys = &json["definitions"]["ToysModel"]["properties"]["toys"];

        assert_eq!(toys["type"], "array");
        assert_eq!(toys["items"]["$ref"], "#/definitions/ToyModel");
    }

    #[test]
    fn query_parameters_honor_nullability() {
        let json = swagger_json(&sample_docs());
        let parameters = json["paths"]["/withParameter"]["get"]["parameters"]
            .as_array()
            .unwrap();

        let optional = parameters
            .iter()
            .find(|p| p["name"] == "optionalParameter")
            .unwrap();
        assert_eq!(optional["required"], false);
        assert_eq!(optional["in"], "query");

        let mandatory = parameters
            .iter()
            .find(|p| p["name"] == "mandatoryParameter")
            .unwrap();
        assert_eq!(mandatory["required"], true);
        assert_eq!(mandatory["in"], "query");
    }

    #[test]
    fn header_class_forces_header_location() {
        let json = swagger_json(&sample_docs());
        let parameters = json["paths"]["/withParameter"]["get"]["parameters"]
            .as_array()
            .unwrap();

        let optional = parameters
            .iter()
            .find(|p| p["name"] == "optionalHeader")
            .unwrap();
        assert_eq!(optional["required"], false);
        assert_eq!(optional["in"], "header");

        let mandatory = parameters
            .iter()
            .find(|p| p["name"] == "mandatoryHeader")
            .unwrap();
        assert_eq!(mandatory["required"], true);
        assert_eq!(mandatory["in"], "header");
    }

    #[test]
    fn summary_defaults_to_method_and_path() {
        let mut docs = ApiDocs::new().with_swagger(Swagger::new());
        docs.register(
            &RouteRegistration::new(Method::Get, "/toys").response(ok(toys_model())),
        )
        .unwrap();

        let json = swagger_json(&docs);
        assert_eq!(json["paths"]["/toys"]["get"]["summary"], "GET /toys");
    }
}

// ============================================================================
// OPENAPI 3.0 TESTS
// ============================================================================

mod openapi_v3 {
    use super::*;

    #[test]
    fn body_lifts_into_request_body_with_components_ref() {
        let json = openapi_json(&sample_docs());
        let operation = &json["paths"]["/toys/{id}"]["put"];

        assert_eq!(
            operation["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/ToyModel"
        );
        // The body never shows up in the parameter list.
        let parameters = operation["parameters"].as_array().unwrap();
        assert!(parameters.iter().all(|p| p["in"] != "body"));
    }

    #[test]
    fn responses_wrap_schemas_in_content() {
        let json = openapi_json(&sample_docs());
        let response = &json["paths"]["/toys/{id}"]["put"]["responses"]["200"];

        assert_eq!(
            response["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/ToyModel"
        );
    }

    #[test]
    fn definitions_live_under_components_schemas() {
        let json = openapi_json(&sample_docs());
        assert!(json["components"]["schemas"].get("ToyModel").is_some());
        assert!(json.get("definitions").is_none());
    }

    #[test]
    fn parameters_move_schema_fields_under_schema() {
        let json = openapi_json(&sample_docs());
        let parameters = json["paths"]["/withParameter"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let mandatory = parameters
            .iter()
            .find(|p| p["name"] == "mandatoryParameter")
            .unwrap();

        assert_eq!(mandatory["schema"]["type"], "integer");
        assert_eq!(mandatory["schema"]["format"], "int32");
        assert!(mandatory.get("type").is_none());
    }

    #[test]
    fn image_content_type_gets_binary_schema() {
        let mut docs = ApiDocs::new().with_open_api(OpenApi::new());
        docs.register(
            &RouteRegistration::new(Method::Get, "/image").response(StatusResponse::new(
                200,
                vec![ResponseKind::content_type("image/png")],
            )),
        )
        .unwrap();

        let json = openapi_json(&docs);
        let media = &json["paths"]["/image"]["get"]["responses"]["200"]["content"]["image/png"];
        assert_eq!(media["schema"]["type"], "string");
        assert_eq!(media["schema"]["format"], "binary");
    }

    #[test]
    fn unmapped_content_type_fails_registration() {
        let mut docs = ApiDocs::new().with_open_api(OpenApi::new());
        let result = docs.register(
            &RouteRegistration::new(Method::Get, "/report").response(StatusResponse::new(
                200,
                vec![ResponseKind::content_type("application/pdf")],
            )),
        );

        assert!(matches!(
            result,
            Err(SpecError::UnsupportedContentType { .. })
        ));
    }

    #[test]
    fn body_examples_attach_to_the_media_type() {
        let mut docs = ApiDocs::new().with_open_api(OpenApi::new());
        docs.register(
            &RouteRegistration::new(Method::Post, "/toys")
                .metadata(Metadata::new().body_example(
                    "sample",
                    Example::of(serde_json::json!({"name": "teddy"})).summary("a bear"),
                ))
                .body(BodyKind::FromType(toy_model()))
                .response(created(toy_model())),
        )
        .unwrap();

        let json = openapi_json(&docs);
        let examples = &json["paths"]["/toys"]["post"]["requestBody"]["content"]
            ["application/json"]["examples"];
        assert_eq!(examples["sample"]["summary"], "a bear");
        assert_eq!(examples["sample"]["value"]["name"], "teddy");
    }

    #[test]
    fn security_requirements_render_on_operation_and_document() {
        let open_api = OpenApi::new()
            .security_scheme(
                "bearer",
                serde_json::json!({"type": "http", "scheme": "bearer"}),
            )
            .require_security("bearer", Vec::<String>::new());
        let mut docs = ApiDocs::new().with_open_api(open_api);
        docs.register(
            &RouteRegistration::new(Method::Get, "/secure")
                .metadata(Metadata::new().security("bearer", ["read"]))
                .response(ok(TypeDescriptor::unit())),
        )
        .unwrap();

        let json = openapi_json(&docs);
        assert_eq!(
            json["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
        assert_eq!(json["security"][0]["bearer"], serde_json::json!([]));
        assert_eq!(
            json["paths"]["/secure"]["get"]["security"][0]["bearer"],
            serde_json::json!(["read"])
        );
    }
}

// ============================================================================
// SHARED BEHAVIOR TESTS
// ============================================================================

mod shared {
    use super::*;

    #[test]
    fn both_documents_describe_the_same_routes() {
        let docs = sample_docs();
        let v2 = swagger_json(&docs);
        let v3 = openapi_json(&docs);

        for path in ["/toys/{id}", "/toys", "/withParameter"] {
            assert!(v2["paths"].get(path).is_some(), "v2 missing {path}");
            assert!(v3["paths"].get(path).is_some(), "v3 missing {path}");
        }
    }

    #[test]
    fn no_serialized_ref_dangles() {
        let docs = sample_docs();
        for (json, root, section) in [
            (swagger_json(&docs), "#/definitions/", vec!["definitions"]),
            (
                openapi_json(&docs),
                "#/components/schemas/",
                vec!["components", "schemas"],
            ),
        ] {
            let mut definitions = &json;
            for key in section {
                definitions = &definitions[key];
            }
            let rendered = json.to_string();
            let mut offset = 0;
            while let Some(at) = rendered[offset..].find(root) {
                let start = offset + at + root.len();
                let end = start + rendered[start..].find('"').unwrap();
                let name = &rendered[start..end];
                assert!(
                    definitions.get(name).is_some(),
                    "dangling $ref to `{name}`"
                );
                offset = end;
            }
        }
    }

    #[test]
    fn repeated_registration_is_idempotent() {
        let mut docs = ApiDocs::new().with_swagger(Swagger::new());
        let route = RouteRegistration::new(Method::Get, "/toys").response(ok(toys_model()));
        docs.register(&route).unwrap();
        let first = swagger_json(&docs);
        docs.register(&route).unwrap();
        let second = swagger_json(&docs);

        assert_eq!(first, second);
    }

    #[test]
    fn body_on_get_and_delete_is_rejected() {
        for method in [Method::Get, Method::Delete] {
            let mut docs = ApiDocs::new().with_swagger(Swagger::new());
            let result = docs.register(
                &RouteRegistration::new(method, "/toys")
                    .body(BodyKind::FromType(toy_model()))
                    .response(ok(toy_model())),
            );
            assert!(
                matches!(result, Err(SpecError::BodyNotAllowed { .. })),
                "{method:?} should reject bodies"
            );
        }
    }

    #[test]
    fn custom_schemas_serve_schema_referencing_routes() {
        let mut swagger = Swagger::new();
        swagger
            .definitions
            .insert_custom("size", serde_json::json!({"type": "number", "minimum": 0}));
        let mut docs = ApiDocs::new().with_swagger(swagger);
        docs.register(
            &RouteRegistration::new(Method::Post, "/sizes")
                .body(BodyKind::FromSchema {
                    name: "size".to_owned(),
                })
                .response(StatusResponse::new(200, vec![ResponseKind::schema("size")])),
        )
        .unwrap();

        let json = swagger_json(&docs);
        assert_eq!(json["definitions"]["size"]["minimum"], 0);
        let post = &json["paths"]["/sizes"]["post"];
        assert_eq!(
            post["parameters"][0]["schema"]["$ref"],
            "#/definitions/size"
        );
        assert_eq!(
            post["responses"]["200"]["schema"]["$ref"],
            "#/definitions/size"
        );
    }

    #[test]
    fn custom_content_type_diverges_between_versions() {
        let mut docs = ApiDocs::new()
            .with_swagger(Swagger::new())
            .with_open_api(OpenApi::new());
        docs.register(
            &RouteRegistration::new(Method::Get, "/logo").response(StatusResponse::new(
                200,
                vec![ResponseKind::content_type("image/png")],
            )),
        )
        .unwrap();

        let v2 = swagger_json(&docs);
        let v2_response = &v2["paths"]["/logo"]["get"]["responses"]["200"];
        assert_eq!(v2_response["produces"], serde_json::json!(["image/png"]));
        assert!(v2_response.get("schema").is_none());

        let v3 = openapi_json(&docs);
        let v3_response = &v3["paths"]["/logo"]["get"]["responses"]["200"];
        assert_eq!(
            v3_response["content"]["image/png"]["schema"]["format"],
            "binary"
        );
    }
}
