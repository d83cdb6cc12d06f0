//! The definition registry: one per document, keyed by derived model name.
//!
//! Registration is a memoized worklist drain. Extracting one model may
//! discover referenced models; those are queued and drained in turn, with a
//! put-if-absent check making the whole process idempotent and safe for
//! recursive types (the name is reserved before the discoveries are walked,
//! so a cycle terminates at the already-present check).

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::descriptor::{ModelName, TypeDescriptor};
use crate::error::Result;
use crate::model::{create_model, Definition};

/// Insertion-ordered collection of schema definitions with the ref root of
/// the owning document baked in.
#[derive(Debug, Clone)]
pub struct DefinitionRegistry {
    ref_root: &'static str,
    definitions: IndexMap<ModelName, Definition>,
}

impl DefinitionRegistry {
    pub fn new(ref_root: &'static str) -> Self {
        DefinitionRegistry {
            ref_root,
            definitions: IndexMap::new(),
        }
    }

    /// The prefix every `$ref` into this registry carries
    /// (`#/definitions/` or `#/components/schemas/`).
    pub fn ref_root(&self) -> &'static str {
        self.ref_root
    }

    /// The full reference string for a definition name.
    pub fn reference(&self, name: &str) -> String {
        format!("{}{name}", self.ref_root)
    }

    /// Registers a descriptor and, transitively, every model it references.
    ///
    /// Unit, primitives, and enums never produce definitions; they are
    /// rendered inline wherever they appear. Re-registering a name is a
    /// no-op, so the first registration of a name wins.
    pub fn register(&mut self, descriptor: &TypeDescriptor) -> Result<()> {
        let mut worklist = VecDeque::new();
        worklist.push_back(descriptor.clone());

        while let Some(next) = worklist.pop_front() {
            match next {
                TypeDescriptor::Unit
                | TypeDescriptor::Primitive(_)
                | TypeDescriptor::Enum(_) => continue,
                _ => {}
            }
            let name = next.model_name()?;
            if self.definitions.contains_key(&name) {
                continue;
            }
            let (definition, discovered) = create_model(&next, self.ref_root)?;
            debug!(model = %name, "registered definition");
            self.definitions.insert(name, definition);
            worklist.extend(discovered);
        }
        Ok(())
    }

    /// Adds a hand-written schema under an explicit name. First writer wins,
    /// matching [`register`](Self::register) semantics.
    pub fn insert_custom(&mut self, name: impl Into<ModelName>, schema: serde_json::Value) {
        let name = name.into();
        if !self.definitions.contains_key(&name) {
            debug!(model = %name, "registered custom definition");
            self.definitions.insert(name, Definition::Custom(schema));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

impl Serialize for DefinitionRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.definitions.serialize(serializer)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;

    fn registry() -> DefinitionRegistry {
        DefinitionRegistry::new("#/definitions/")
    }

    fn toy_model() -> TypeDescriptor {
        TypeDescriptor::object("ToyModel")
            .field(FieldDescriptor::new("id", TypeDescriptor::int32()).nullable())
            .field(FieldDescriptor::new("name", TypeDescriptor::string()))
            .build()
    }

    #[test]
    fn registers_transitive_models() {
        let toys = TypeDescriptor::object("ToysModel")
            .field(FieldDescriptor::new(
                "toys",
                TypeDescriptor::list(toy_model()),
            ))
            .build();

        let mut registry = registry();
        registry.register(&toys).unwrap();

        assert!(registry.contains("ToysModel"));
        assert!(registry.contains("ToyModel"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut registry = registry();
        registry.register(&toy_model()).unwrap();
        registry.register(&toy_model()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn primitives_and_enums_never_register() {
        let mut registry = registry();
        registry.register(&TypeDescriptor::string()).unwrap();
        registry
            .register(&TypeDescriptor::enumeration("Weekday", ["MONDAY"]))
            .unwrap();
        registry.register(&TypeDescriptor::unit()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn recursive_types_terminate() {
        // A node holding a list of itself: the name is reserved before its
        // discoveries are drained.
        let leaf = TypeDescriptor::object("Node").build();
        let node = TypeDescriptor::object("Node")
            .field(FieldDescriptor::new(
                "children",
                TypeDescriptor::list(leaf),
            ))
            .build();

        let mut registry = registry();
        registry.register(&node).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn serialized_refs_all_resolve() {
        let toys = TypeDescriptor::object("ToysModel")
            .field(FieldDescriptor::new(
                "toys",
                TypeDescriptor::list(toy_model()),
            ))
            .build();
        let mut registry = registry();
        registry.register(&toys).unwrap();

        let json = serde_json::to_value(&registry).unwrap();
        let rendered = json.to_string();
        let mut offset = 0;
        while let Some(at) = rendered[offset..].find("#/definitions/") {
            let start = offset + at + "#/definitions/".len();
            let end = rendered[start..]
                .find('"')
                .map(|i| start + i)
                .unwrap_or(rendered.len());
            let name = &rendered[start..end];
            assert!(registry.contains(name), "dangling $ref to `{name}`");
            offset = end;
        }
    }

    #[test]
    fn custom_definitions_serialize_verbatim() {
        let mut registry = registry();
        registry.insert_custom(
            "size",
            serde_json::json!({"type": "number", "minimum": 0}),
        );

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["size"]["minimum"], 0);
    }

    #[test]
    fn first_writer_wins_for_custom_definitions() {
        let mut registry = registry();
        registry.insert_custom("size", serde_json::json!({"type": "number"}));
        registry.insert_custom("size", serde_json::json!({"type": "string"}));

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["size"]["type"], "number");
    }

    #[test]
    fn generic_instantiations_register_under_derived_names() {
        let template = TypeDescriptor::generic("Wrapper", ["T"])
            .field(FieldDescriptor::new("wrapped", TypeDescriptor::param("T")))
            .build();
        let concrete = template.instantiate([toy_model()]).unwrap();

        let mut registry = registry();
        registry.register(&concrete).unwrap();
        assert!(registry.contains("WrapperOfToyModel"));
        assert!(registry.contains("ToyModel"));
    }
}
