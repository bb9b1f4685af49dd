use serde_json::{Map, Value};

use crate::config::{GenerationConfig, Templates};
use crate::model::SchemaIndex;

/// Module and class name used when none was configured.
pub const DEFAULT_NAME: &str = "Api";

/// Input to an emission entry point. Built fresh for every run.
///
/// There is no generation mode in here: the mode has already been used to pick the entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitSettings {
    pub module_name: String,
    pub class_name: String,
    pub templates: Templates,

    /// The fully-resolved document.
    pub swagger: Value,

    /// Values merged into the template context. Always holds `swagger` (the document),
    /// `swaggerJSON` (the document serialized) and `schemaJSON` (the [SchemaIndex] serialized)
    /// on top of any user-supplied values.
    pub mustache: Map<String, Value>,
}

impl EmitSettings {
    pub fn build(config: &GenerationConfig, document: &Value, index: &SchemaIndex) -> Self {
        let mut mustache = config.mustache.clone();
        mustache.insert("swagger".to_string(), document.clone());
        mustache.insert(
            "swaggerJSON".to_string(),
            Value::String(document.to_string()),
        );
        mustache.insert(
            "schemaJSON".to_string(),
            Value::String(index.to_value().to_string()),
        );
        Self {
            module_name: name_or_default(config.module_name.as_deref()),
            class_name: name_or_default(config.class_name.as_deref()),
            templates: config.templates.clone(),
            swagger: document.clone(),
            mustache,
        }
    }
}

fn name_or_default(name: Option<&str>) -> String {
    name.filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use crate::config::{GenerationConfig, Templates};
    use crate::generator::{EmitSettings, Mode, DEFAULT_NAME};
    use crate::model::SchemaIndex;

    fn config() -> GenerationConfig {
        GenerationConfig {
            mode: Mode::Node,
            module_name: None,
            class_name: None,
            templates: Templates::default(),
            mustache: Map::new(),
        }
    }

    #[test]
    fn names_default_to_placeholder() {
        let document = json!({"paths": {}});
        let settings = EmitSettings::build(&config(), &document, &SchemaIndex::default());
        assert_eq!(settings.module_name, DEFAULT_NAME);
        assert_eq!(settings.class_name, DEFAULT_NAME);
    }

    #[test]
    fn configured_names_are_kept() {
        let config = GenerationConfig {
            module_name: Some("petstore".to_string()),
            class_name: Some("PetStore".to_string()),
            ..config()
        };
        let settings = EmitSettings::build(&config, &json!({}), &SchemaIndex::default());
        assert_eq!(settings.module_name, "petstore");
        assert_eq!(settings.class_name, "PetStore");
    }

    #[test]
    fn injects_document_and_index() {
        let document = crate::test_util::petstore();
        let index = SchemaIndex::extract(&document);
        let settings = EmitSettings::build(&config(), &document, &index);

        assert_eq!(settings.swagger, document);
        assert_eq!(settings.mustache["swagger"], document);
        let swagger_json = settings.mustache["swaggerJSON"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(swagger_json).unwrap(), document);
        let schema_json = settings.mustache["schemaJSON"].as_str().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(schema_json).unwrap(),
            index.to_value()
        );
    }

    #[test]
    fn user_context_is_kept_but_derived_fields_win() {
        let config = GenerationConfig {
            mustache: json!({"license": "MIT", "swagger": "mine"})
                .as_object()
                .unwrap()
                .clone(),
            ..config()
        };
        let document = json!({"paths": {}});
        let settings = EmitSettings::build(&config, &document, &SchemaIndex::default());
        assert_eq!(settings.mustache["license"], json!("MIT"));
        assert_eq!(settings.mustache["swagger"], document);
        assert_eq!(settings.mustache.len(), 4);
    }
}
