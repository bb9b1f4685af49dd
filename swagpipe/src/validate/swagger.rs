use std::collections::HashSet;
use std::fmt::{self, Debug};

use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;
use jsonschema::Validator;
use serde_json::{Map, Value};

use crate::model::is_http_method;
use crate::resolver::reference::{self, escape, Reference};
use crate::validate::{Checker, Finding, ValidationResult};

/// JSON Schema (draft 4) describing a structurally valid Swagger 2.0 document.
const SWAGGER_SCHEMA: &str = include_str!("swagger-2.0.json");

/// Internal reference chains longer than this are not followed while checking.
const MAX_HOPS: usize = 32;

type Rule = fn(&Value) -> Vec<Finding>;

/// Rules the schema cannot express, run after structural validation.
const ERROR_RULES: &[Rule] = &[operation_parameters, operation_ids, unresolved_references];

const WARNING_RULES: &[Rule] = &[unused_components, missing_operation_ids];

/// Conformance checks for Swagger 2.0 documents.
///
/// Structure is validated against the Swagger 2.0 JSON Schema, and cross-cutting rules
/// (parameter combinations, operationId uniqueness, dangling references) run on top.
/// Meant to run while internal references are still in place: they are followed where a rule
/// needs the target, and they are what makes unused definitions detectable.
pub struct SwaggerChecker {
    validator: Validator,
}

impl SwaggerChecker {
    /// Compiles the embedded Swagger 2.0 schema.
    pub fn new() -> Result<Self> {
        let schema: Value =
            serde_json::from_str(SWAGGER_SCHEMA).context("Swagger 2.0 schema is not valid JSON")?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|err| anyhow!("failed to compile Swagger 2.0 schema: {}", err))?;
        Ok(Self { validator })
    }
}

impl Debug for SwaggerChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwaggerChecker").finish_non_exhaustive()
    }
}

impl Checker for SwaggerChecker {
    fn check(&self, document: &Value) -> Result<ValidationResult> {
        let root = document
            .as_object()
            .ok_or_else(|| anyhow!("document root must be an object"))?;
        supported_version(root)?;
        let mut errors = self
            .validator
            .iter_errors(document)
            .map(|error| {
                Finding::new(
                    &pointer_segments(&error.instance_path.to_string()),
                    error.to_string(),
                )
            })
            .collect_vec();
        errors.extend(ERROR_RULES.iter().flat_map(|rule| rule(document)));
        Ok(ValidationResult {
            errors,
            warnings: WARNING_RULES
                .iter()
                .flat_map(|rule| rule(document))
                .collect(),
        })
    }
}

fn supported_version(root: &Map<String, Value>) -> Result<()> {
    if let Some(version) = root.get("openapi") {
        bail!("unsupported specification version: OpenAPI {}", version);
    }
    match root.get("swagger") {
        Some(Value::String(version)) if version == "2.0" => Ok(()),
        Some(version) => bail!(
            "unsupported Swagger version {}, only 2.0 is supported",
            version
        ),
        None => Ok(()),
    }
}

/// Splits a JSON pointer such as `/paths/~1pets/get` into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

struct Operation<'a> {
    path: &'a str,
    method: &'a str,
    value: &'a Value,
    path_item: &'a Value,
}

impl Operation<'_> {
    fn location(&self) -> Vec<String> {
        vec![
            "paths".to_string(),
            self.path.to_string(),
            self.method.to_string(),
        ]
    }

    fn location_of(&self, segments: &[&str]) -> Vec<String> {
        let mut location = self.location();
        location.extend(segments.iter().map(ToString::to_string));
        location
    }
}

fn operations(document: &Value) -> Vec<Operation<'_>> {
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return vec![];
    };
    paths
        .iter()
        .filter_map(|(path, item)| item.as_object().map(|map| (path, item, map)))
        .flat_map(|(path, path_item, map)| {
            map.iter()
                .filter(|(method, _)| is_http_method(method))
                .map(move |(method, value)| Operation {
                    path,
                    method,
                    value,
                    path_item,
                })
        })
        .collect()
}

/// Follows internal references from `value`. Returns the last value reached, which is still a
/// reference if its target does not exist.
fn deref<'a>(document: &'a Value, value: &'a Value) -> &'a Value {
    let mut current = value;
    for _ in 0..MAX_HOPS {
        match reference::target(current).map(Reference::parse) {
            Some(Reference::Internal { pointer }) => match reference::lookup(document, pointer) {
                Ok(target) => current = target,
                Err(_) => break,
            },
            _ => break,
        }
    }
    current
}

fn is_reference(value: &Value) -> bool {
    reference::target(value).is_some()
}

/// A parameter after following references, with its location in the document.
struct Parameter<'a> {
    location: Vec<String>,
    value: &'a Value,
}

impl<'a> Parameter<'a> {
    fn name(&self) -> Option<&'a str> {
        self.value.get("name").and_then(Value::as_str)
    }

    fn location_in(&self) -> Option<&'a str> {
        self.value.get("in").and_then(Value::as_str)
    }

    fn key(&self) -> (Option<&'a str>, Option<&'a str>) {
        (self.name(), self.location_in())
    }
}

fn parameters<'a>(document: &'a Value, list: &'a Value, location: &[String]) -> Vec<Parameter<'a>> {
    list.as_array()
        .map(|params| {
            params
                .iter()
                .enumerate()
                .map(|(i, param)| {
                    let mut location = location.to_vec();
                    location.push(i.to_string());
                    Parameter {
                        location,
                        value: deref(document, param),
                    }
                })
                .filter(|param| !is_reference(param.value))
                .collect()
        })
        .unwrap_or_default()
}

/// Rules that apply to the combined parameters of each operation.
fn operation_parameters(document: &Value) -> Vec<Finding> {
    operations(document)
        .iter()
        .flat_map(|op| {
            let location = op.location();
            let own = op
                .value
                .get("parameters")
                .map(|list| parameters(document, list, &op.location_of(&["parameters"])))
                .unwrap_or_default();
            let shared = op
                .path_item
                .get("parameters")
                .map(|list| parameters(document, list, &[]))
                .unwrap_or_default();

            let mut findings = own
                .iter()
                .duplicates_by(|param| param.key())
                .map(|param| {
                    Finding::new(
                        &op.location_of(&["parameters"]),
                        format!(
                            "Operation cannot have duplicate parameters: {}/{}",
                            param.location_in().unwrap_or_default(),
                            param.name().unwrap_or_default()
                        ),
                    )
                })
                .collect_vec();

            // Operation parameters override path-level ones with the same name and location.
            let effective = own
                .iter()
                .chain(
                    shared
                        .iter()
                        .filter(|param| own.iter().all(|o| o.key() != param.key())),
                )
                .collect_vec();
            let count = |location: &str| {
                effective
                    .iter()
                    .filter(|param| param.location_in() == Some(location))
                    .count()
            };
            if count("body") > 1 {
                findings.push(Finding::new(
                    &location,
                    "Operation cannot have multiple body parameters",
                ));
            }
            if count("body") > 0 && count("formData") > 0 {
                findings.push(Finding::new(
                    &location,
                    "Operation cannot have a body parameter and a formData parameter",
                ));
            }

            let declared = template_variables(op.path);
            let defined = effective
                .iter()
                .filter(|param| param.location_in() == Some("path"))
                .filter_map(|param| param.name())
                .collect::<HashSet<_>>();
            findings.extend(
                declared
                    .iter()
                    .filter(|name| !defined.contains(*name))
                    .map(|name| {
                        Finding::new(
                            &location,
                            format!("Path parameter is declared but is not defined: {}", name),
                        )
                    }),
            );
            findings.extend(
                defined
                    .iter()
                    .filter(|name| !declared.contains(*name))
                    .sorted()
                    .map(|name| {
                        Finding::new(
                            &location,
                            format!("Path parameter is defined but is not declared: {}", name),
                        )
                    }),
            );
            findings
        })
        .collect()
}

/// Names within `{}` in a path template, e.g. `id` for `/pets/{id}`.
fn template_variables(path: &str) -> Vec<&str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
        .collect()
}

fn operation_ids(document: &Value) -> Vec<Finding> {
    let operations = operations(document);
    let counts = operations
        .iter()
        .filter_map(|op| op.value.get("operationId").and_then(Value::as_str))
        .counts();
    operations
        .iter()
        .filter_map(|op| {
            let id = op.value.get("operationId").and_then(Value::as_str)?;
            (counts[id] > 1).then(|| {
                Finding::new(
                    &op.location_of(&["operationId"]),
                    format!("Operation cannot have duplicate operationId: {}", id),
                )
            })
        })
        .collect()
}

fn unresolved_references(document: &Value) -> Vec<Finding> {
    let mut references = vec![];
    collect_references(document, &mut vec![], &mut references);
    references
        .into_iter()
        .filter_map(|(location, target)| match Reference::parse(target) {
            Reference::Internal { pointer } if reference::lookup(document, pointer).is_err() => {
                Some(Finding::new(
                    &location,
                    format!("Reference could not be resolved: {}", target),
                ))
            }
            _ => None,
        })
        .collect()
}

fn collect_references<'a>(
    value: &'a Value,
    location: &mut Vec<String>,
    references: &mut Vec<(Vec<String>, &'a str)>,
) {
    if let Some(target) = reference::target(value) {
        references.push((location.clone(), target));
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                location.push(key.clone());
                collect_references(value, location, references);
                location.pop();
            }
        }
        Value::Array(items) => {
            for (i, value) in items.iter().enumerate() {
                location.push(i.to_string());
                collect_references(value, location, references);
                location.pop();
            }
        }
        _ => {}
    }
}

fn unused_components(document: &Value) -> Vec<Finding> {
    let mut references = vec![];
    collect_references(document, &mut vec![], &mut references);
    let targets = references
        .iter()
        .map(|(_, target)| *target)
        .filter(|target| target.starts_with('#'))
        .collect_vec();
    let is_used = |target: &str| {
        targets.iter().any(|used| {
            *used == target
                || used
                    .strip_prefix(target)
                    .map(|rest| rest.starts_with('/'))
                    .unwrap_or(false)
        })
    };

    [
        ("definitions", "Definition"),
        ("parameters", "Parameter"),
        ("responses", "Response"),
    ]
    .iter()
    .flat_map(|(section, kind)| {
        document
            .get(*section)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|components| components.keys())
            .filter_map(|name| {
                let target = format!("#/{}/{}", section, escape(name));
                (!is_used(&target)).then(|| {
                    Finding::new(
                        &[*section, name.as_str()],
                        format!("{} is defined but is not used: {}", kind, target),
                    )
                })
            })
            .collect_vec()
    })
    .collect()
}

fn missing_operation_ids(document: &Value) -> Vec<Finding> {
    operations(document)
        .iter()
        .filter(|op| op.value.get("operationId").is_none())
        .map(|op| {
            Finding::new(
                &op.location(),
                "Operation has no operationId, a method name will be derived from its path",
            )
        })
        .collect()
}
