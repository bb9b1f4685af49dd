use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use serde_json::{json, Map, Value};

use crate::config::{GenerationConfig, Templates};
use crate::generator::{EmitSettings, Mode};
use crate::model::{Document, SchemaIndex};
use crate::resolver::{Dereferencer, Policy, Resolver};
use crate::validate::{Checker, ValidationResult};

/// A valid document with three operations, no references and no shared components.
pub fn petstore() -> Value {
    json!({
        "swagger": "2.0",
        "info": {
            "title": "Swagger Petstore",
            "description": "A sample API that uses a petstore as an example",
            "version": "1.0.0"
        },
        "host": "petstore.swagger.io",
        "basePath": "/v1",
        "schemes": ["http"],
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "paths": {
            "/pets": {
                "get": {
                    "summary": "List all pets",
                    "operationId": "listPets",
                    "parameters": [{
                        "name": "limit",
                        "in": "query",
                        "description": "How many items to return at one time (max 100)",
                        "required": false,
                        "type": "integer",
                        "format": "int32"
                    }],
                    "responses": {
                        "200": {
                            "description": "A paged array of pets",
                            "schema": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "required": ["id", "name"],
                                    "properties": {
                                        "id": {"type": "integer", "format": "int64"},
                                        "name": {"type": "string"}
                                    }
                                }
                            }
                        },
                        "default": {"description": "unexpected error"}
                    }
                },
                "post": {
                    "summary": "Create a pet",
                    "operationId": "createPet",
                    "parameters": [{
                        "name": "pet",
                        "in": "body",
                        "required": true,
                        "schema": {
                            "type": "object",
                            "required": ["name"],
                            "properties": {"name": {"type": "string"}}
                        }
                    }],
                    "responses": {
                        "201": {"description": "Null response"},
                        "default": {"description": "unexpected error"}
                    }
                }
            },
            "/pets/{petId}": {
                "get": {
                    "summary": "Info for a specific pet",
                    "operationId": "showPetById",
                    "parameters": [{
                        "name": "petId",
                        "in": "path",
                        "required": true,
                        "description": "The id of the pet to retrieve",
                        "type": "string"
                    }],
                    "responses": {
                        "200": {
                            "description": "Expected response to a valid request",
                            "schema": {
                                "type": "object",
                                "properties": {
                                    "id": {"type": "integer", "format": "int64"},
                                    "name": {"type": "string"}
                                }
                            }
                        },
                        "default": {"description": "unexpected error"}
                    }
                }
            }
        }
    })
}

/// [petstore] with its schemas moved into `definitions`, each of them referenced.
pub fn petstore_with_refs() -> Value {
    let mut document = petstore();
    document["definitions"] = json!({
        "Pet": {
            "type": "object",
            "required": ["id", "name"],
            "properties": {
                "id": {"type": "integer", "format": "int64"},
                "name": {"type": "string"}
            }
        },
        "Pets": {"type": "array", "items": {"$ref": "#/definitions/Pet"}},
        "Error": {
            "type": "object",
            "properties": {"code": {"type": "integer"}, "message": {"type": "string"}}
        }
    });
    let error = json!({"description": "unexpected error", "schema": {"$ref": "#/definitions/Error"}});
    let paths = &mut document["paths"];
    paths["/pets"]["get"]["responses"]["200"]["schema"] = json!({"$ref": "#/definitions/Pets"});
    paths["/pets"]["get"]["responses"]["default"] = error.clone();
    paths["/pets"]["post"]["parameters"][0]["schema"] = json!({"$ref": "#/definitions/Pet"});
    paths["/pets"]["post"]["responses"]["default"] = error.clone();
    paths["/pets/{petId}"]["get"]["responses"]["200"]["schema"] =
        json!({"$ref": "#/definitions/Pet"});
    paths["/pets/{petId}"]["get"]["responses"]["default"] = error;
    document
}

/// Settings for [petstore] with default names and no templates.
pub fn emit_settings() -> EmitSettings {
    let document = petstore();
    let config = GenerationConfig {
        mode: Mode::Node,
        module_name: None,
        class_name: None,
        templates: Templates::default(),
        mustache: Map::new(),
    };
    EmitSettings::build(&config, &document, &SchemaIndex::extract(&document))
}

/// Returns a canned result for every document.
#[derive(Debug, Default)]
pub struct FakeChecker {
    result: Option<ValidationResult>,
}

impl FakeChecker {
    pub fn new(result: ValidationResult) -> Self {
        Self {
            result: Some(result),
        }
    }

    /// A checker that cannot run.
    pub fn failing() -> Self {
        Self { result: None }
    }
}

impl Checker for FakeChecker {
    fn check(&self, _: &Value) -> Result<ValidationResult> {
        self.result
            .clone()
            .ok_or_else(|| anyhow!("validator crashed"))
    }
}

/// Delegates to [Dereferencer] and records each policy it was asked to resolve with.
#[derive(Debug, Default, Clone)]
pub struct RecordingResolver {
    pub calls: Rc<RefCell<Vec<Policy>>>,
}

impl Resolver for RecordingResolver {
    fn resolve(&self, document: Document, policy: Policy) -> Result<Document> {
        self.calls.borrow_mut().push(policy);
        Dereferencer::default().resolve(document, policy)
    }
}

/// Records every document it is asked to check and reports it as clean.
#[derive(Debug, Default, Clone)]
pub struct RecordingChecker {
    pub checked: Rc<RefCell<Vec<Value>>>,
}

impl Checker for RecordingChecker {
    fn check(&self, document: &Value) -> Result<ValidationResult> {
        self.checked.borrow_mut().push(document.clone());
        Ok(ValidationResult::default())
    }
}
