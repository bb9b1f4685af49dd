use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context as _, Result};
use itertools::Itertools;
use log::{debug, trace};
use serde_json::Value;

use crate::model::{document, Document};
use crate::resolver::reference::{self, Reference};
use crate::resolver::{Policy, Resolver};

/// Resolves JSON references (`{"$ref": "..."}`) against the document itself and against other
/// documents on the file system.
///
/// Content inlined from another document is always expanded completely within that document, so
/// the result never holds a reference that points across a document boundary. Circular
/// references cannot be expanded and fail the resolution.
#[derive(Debug, Default, Clone)]
pub struct Dereferencer {}

impl Resolver for Dereferencer {
    fn resolve(&self, document: Document, policy: Policy) -> Result<Document> {
        let Document {
            value,
            chunk,
            base_dir,
        } = document;
        let scope = Scope {
            name: chunk.to_string(),
            root: Rc::new(value),
            base_dir: base_dir.clone(),
            follow_internal: policy.follow_internal,
        };
        let mut context = Context::default();
        let value = expand(&scope.root, &scope, &mut context)?;
        debug!(
            "resolved '{}' ({:?}) using {} external document(s)",
            chunk,
            policy,
            context.documents.len()
        );
        Ok(Document {
            value,
            chunk,
            base_dir,
        })
    }
}

/// The document that references are currently being resolved relative to.
struct Scope {
    name: String,
    root: Rc<Value>,
    base_dir: Option<PathBuf>,
    follow_internal: bool,
}

/// State for a single [Dereferencer::resolve] call. Nothing outlives the call.
#[derive(Default)]
struct Context {
    documents: HashMap<PathBuf, Rc<Value>>,
    stack: Vec<String>,
}

impl Context {
    /// Runs `f` with `key` marked as being expanded. Seeing `key` again before `f` returns means
    /// the reference chain is circular.
    fn enter<T>(&mut self, key: String, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.stack.contains(&key) {
            return Err(anyhow!(
                "circular reference: {} -> {}",
                self.stack.iter().join(" -> "),
                key
            ));
        }
        trace!("expanding {}", key);
        self.stack.push(key);
        let result = f(self);
        self.stack.pop();
        result
    }

    fn load(&mut self, from: &Scope, file: &str) -> Result<Scope> {
        let base_dir = from.base_dir.as_ref().ok_or_else(|| {
            anyhow!(
                "cannot resolve '{}' from '{}' without a base directory",
                file,
                from.name
            )
        })?;
        let path = base_dir.join(file);
        let path = fs::canonicalize(&path).with_context(|| {
            format!(
                "referenced document '{}' (from '{}') does not exist",
                path.display(),
                from.name
            )
        })?;
        let root = match self.documents.get(&path) {
            Some(root) => root.clone(),
            None => {
                let data = fs::read_to_string(&path).with_context(|| {
                    format!("failed to read referenced document '{}'", path.display())
                })?;
                let value = document::parse(&data, Some(&path)).with_context(|| {
                    format!("failed to parse referenced document '{}'", path.display())
                })?;
                let root = Rc::new(value);
                self.documents.insert(path.clone(), root.clone());
                root
            }
        };
        Ok(Scope {
            name: path.display().to_string(),
            base_dir: path.parent().map(Path::to_path_buf),
            root,
            follow_internal: true,
        })
    }
}

fn expand(value: &Value, scope: &Scope, context: &mut Context) -> Result<Value> {
    if let Some(target) = reference::target(value) {
        return expand_reference(target, value, scope, context);
    }
    match value {
        Value::Object(map) => Ok(Value::Object(
            map.iter()
                .map(|(key, value)| Ok((key.clone(), expand(value, scope, context)?)))
                .collect::<Result<_>>()?,
        )),
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .map(|item| expand(item, scope, context))
                .collect::<Result<_>>()?,
        )),
        _ => Ok(value.clone()),
    }
}

fn expand_reference(
    target: &str,
    site: &Value,
    scope: &Scope,
    context: &mut Context,
) -> Result<Value> {
    match Reference::parse(target) {
        Reference::Remote(url) => Err(anyhow!(
            "remote reference '{}' in '{}' is not supported",
            url,
            scope.name
        )),
        Reference::Internal { pointer } => {
            if !scope.follow_internal {
                return Ok(site.clone());
            }
            let value = reference::lookup(&scope.root, pointer)
                .with_context(|| format!("cannot resolve '{}' in '{}'", target, scope.name))?;
            context.enter(format!("{}#{}", scope.name, pointer), |context| {
                expand(value, scope, context)
            })
        }
        Reference::External { file, pointer } => {
            let external = context.load(scope, file)?;
            let value = reference::lookup(&external.root, pointer).with_context(|| {
                format!("cannot resolve '{}' from '{}'", target, scope.name)
            })?;
            context.enter(format!("{}#{}", external.name, pointer), |context| {
                expand(value, &external, context)
            })
        }
    }
}
