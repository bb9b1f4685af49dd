use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::model::is_http_method;

/// Request and response value schemas of every operation in a fully-resolved document, keyed by
/// path and then by method.
///
/// Built once per run via [SchemaIndex::extract] and only read afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SchemaIndex {
    paths: BTreeMap<String, BTreeMap<String, OperationSchemas>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OperationSchemas {
    /// Schema of the first `body` parameter. `None` means the operation has no request body,
    /// which is not the same as an empty schema.
    pub request: Option<Value>,

    /// One entry per declared status code (including `default`). Responses without a schema map
    /// to an empty object.
    pub responses: BTreeMap<String, Value>,
}

impl SchemaIndex {
    /// Derives the index from `document`. Never fails: anything missing or malformed degrades to
    /// an empty entry at that level.
    pub fn extract(document: &Value) -> Self {
        let paths = document
            .get("paths")
            .and_then(Value::as_object)
            .map(|paths| {
                paths
                    .iter()
                    .map(|(path, item)| (path.clone(), operations(item)))
                    .collect()
            })
            .unwrap_or_default();
        Self { paths }
    }

    pub fn get(&self, path: &str, method: &str) -> Option<&OperationSchemas> {
        self.paths.get(path).and_then(|methods| methods.get(method))
    }

    pub fn paths(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, OperationSchemas>)> {
        self.paths.iter().map(|(path, methods)| (path.as_str(), methods))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The index in its exchange form. Operations without a request body have no `request` key.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.paths
                .iter()
                .map(|(path, methods)| {
                    let methods = methods
                        .iter()
                        .map(|(method, schemas)| (method.clone(), schemas.to_value()))
                        .collect();
                    (path.clone(), Value::Object(methods))
                })
                .collect(),
        )
    }
}

impl Serialize for SchemaIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl OperationSchemas {
    fn from_operation(operation: &Value) -> Self {
        Self {
            request: request_schema(operation),
            responses: response_schemas(operation),
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(request) = &self.request {
            map.insert("request".to_string(), request.clone());
        }
        map.insert(
            "responses".to_string(),
            Value::Object(
                self.responses
                    .iter()
                    .map(|(code, schema)| (code.clone(), schema.clone()))
                    .collect(),
            ),
        );
        Value::Object(map)
    }
}

fn operations(path_item: &Value) -> BTreeMap<String, OperationSchemas> {
    path_item
        .as_object()
        .map(|item| {
            item.iter()
                .filter(|(method, _)| is_http_method(method))
                .map(|(method, operation)| {
                    (method.clone(), OperationSchemas::from_operation(operation))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn request_schema(operation: &Value) -> Option<Value> {
    operation
        .get("parameters")?
        .as_array()?
        .iter()
        .find(|param| param.get("in").and_then(Value::as_str) == Some("body"))
        .and_then(|param| param.get("schema"))
        .cloned()
}

fn response_schemas(operation: &Value) -> BTreeMap<String, Value> {
    operation
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
            responses
                .iter()
                .map(|(code, response)| {
                    let schema = response
                        .get("schema")
                        .cloned()
                        .unwrap_or_else(|| Value::Object(Map::new()));
                    (code.clone(), schema)
                })
                .collect()
        })
        .unwrap_or_default()
}
