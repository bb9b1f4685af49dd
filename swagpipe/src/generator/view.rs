//! The data handed to templates.
//!
//! Top level: `className`, `moduleName`, `description`, `isNode`, `isAngular`, `isSecure`,
//! `domain`, `methods` and `definitions`, with the user's mustache values merged on top.
use serde_json::{json, Map, Value};

use crate::generator::{capitalize, EmitSettings, Mode};
use crate::model::is_http_method;

const PARAMETER_LOCATIONS: &[(&str, &str)] = &[
    ("isBodyParameter", "body"),
    ("isPathParameter", "path"),
    ("isQueryParameter", "query"),
    ("isHeaderParameter", "header"),
    ("isFormParameter", "formData"),
];

pub fn build(settings: &EmitSettings, mode: Mode) -> Value {
    let swagger = &settings.swagger;
    let mut view = Map::new();
    view.insert("isNode".to_string(), Value::Bool(mode == Mode::Node));
    view.insert("isAngular".to_string(), Value::Bool(mode == Mode::Angular));
    view.insert("moduleName".to_string(), json!(settings.module_name));
    view.insert("className".to_string(), json!(settings.class_name));
    view.insert(
        "description".to_string(),
        swagger
            .pointer("/info/description")
            .cloned()
            .unwrap_or(Value::Null),
    );
    view.insert(
        "isSecure".to_string(),
        Value::Bool(swagger.get("securityDefinitions").is_some()),
    );
    view.insert("domain".to_string(), Value::String(domain(swagger)));
    view.insert(
        "methods".to_string(),
        Value::Array(methods(swagger, &settings.class_name)),
    );
    view.insert("definitions".to_string(), Value::Array(definitions(swagger)));
    view.extend(settings.mustache.clone());
    Value::Object(view)
}

/// `scheme://host/basePath`, or empty when the document has no host.
pub fn domain(swagger: &Value) -> String {
    let Some(host) = swagger.get("host").and_then(Value::as_str) else {
        return String::new();
    };
    let scheme = swagger
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("http");
    let base_path = swagger
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim_end_matches('/');
    format!("{}://{}{}", scheme, host, base_path)
}

fn methods(swagger: &Value, class_name: &str) -> Vec<Value> {
    let secure = swagger.get("security").is_some();
    let Some(paths) = swagger.get("paths").and_then(Value::as_object) else {
        return vec![];
    };
    let mut methods = vec![];
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let shared = item
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for (method, operation) in item.iter().filter(|(method, _)| is_http_method(method)) {
            let method_name = match operation.get("operationId").and_then(Value::as_str) {
                Some(id) => normalize_name(id),
                None => method_name_from_path(method, path),
            };
            let summary = operation
                .get("description")
                .or_else(|| operation.get("summary"))
                .cloned()
                .unwrap_or(Value::Null);
            methods.push(json!({
                "path": path,
                "className": class_name,
                "methodName": method_name,
                "method": method.to_uppercase(),
                "isGET": method == "get",
                "isPOST": method == "post",
                "summary": summary,
                "externalDocs": operation.get("externalDocs"),
                "isSecure": secure || operation.get("security").is_some(),
                "tags": operation.get("tags"),
                "parameters": parameters(operation, shared),
            }));
        }
    }
    methods
}

/// Operation parameters followed by path-level parameters the operation does not override.
fn parameters(operation: &Value, shared: &[Value]) -> Vec<Value> {
    let own = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let key = |parameter: &Value| (parameter.get("name").cloned(), parameter.get("in").cloned());
    let inherited = shared
        .iter()
        .filter(|parameter| own.iter().all(|o| key(o) != key(parameter)));
    own.iter().chain(inherited).map(parameter).collect()
}

fn parameter(parameter: &Value) -> Value {
    let mut view = parameter.as_object().cloned().unwrap_or_default();
    let name = parameter
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let location = parameter
        .get("in")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let required = parameter
        .get("required")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    view.insert("camelCaseName".to_string(), json!(camel_case(name)));
    for (flag, flag_location) in PARAMETER_LOCATIONS {
        view.insert(flag.to_string(), Value::Bool(location == *flag_location));
    }
    view.insert("required".to_string(), Value::Bool(required));
    view.insert(
        "cardinality".to_string(),
        json!(if required { "" } else { "?" }),
    );
    if let Some([singleton]) = parameter.get("enum").and_then(Value::as_array).map(Vec::as_slice) {
        view.insert("isSingleton".to_string(), Value::Bool(true));
        view.insert("singleton".to_string(), singleton.clone());
    }
    Value::Object(view)
}

fn definitions(swagger: &Value) -> Vec<Value> {
    swagger
        .get("definitions")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .map(|(name, schema)| json!({"name": name, "schema": schema}))
        .collect()
}

fn normalize_name(id: &str) -> String {
    id.replace(['.', '-', '{', '}'], "_")
}

/// e.g. `get` + `/pets/{petId}/toys` becomes `getPetsByPetIdToys`.
fn method_name_from_path(method: &str, path: &str) -> String {
    let method = method.to_lowercase();
    let segments = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|segment| segment.strip_suffix('}'))
            {
                Some(parameter) => format!("by-{}", capitalize(parameter)),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("-");
    if segments.is_empty() {
        return method;
    }
    format!("{}{}", method, capitalize(&camel_case(&segments)))
}

fn camel_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                lower_first(word)
            } else {
                capitalize(word)
            }
        })
        .collect()
}

fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
