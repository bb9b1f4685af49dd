use std::fmt::{Display, Formatter};

use anyhow::Result;
use itertools::Itertools;
use log::{error, info, warn};
use serde_json::Value;

pub use swagger::SwaggerChecker;

use crate::resolver::reference::escape;

mod swagger;

/// Checks a document for conformance with its description format.
///
/// Returning `Err` means the check itself could not run, which is distinct from the document
/// having errors.
pub trait Checker {
    fn check(&self, document: &Value) -> Result<ValidationResult>;
}

/// One validation error or warning.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Finding {
    /// Segments of the location within the document.
    pub path: Vec<String>,
    pub message: String,
}

impl Finding {
    pub fn new<S: ToString>(path: &[S], message: impl ToString) -> Self {
        Self {
            path: path.iter().map(ToString::to_string).collect(),
            message: message.to_string(),
        }
    }

    /// The location as a JSON pointer fragment, e.g. `#/paths/~1pets/get`.
    pub fn pointer(&self) -> String {
        format!("#/{}", self.path.iter().map(|s| escape(s)).join("/"))
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pointer(), self.message)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationResult {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        if !self.errors.is_empty() {
            Verdict::Errors
        } else if !self.warnings.is_empty() {
            Verdict::WarningsOnly
        } else {
            Verdict::Clean
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    Clean,
    WarningsOnly,
    Errors,
}

impl Verdict {
    /// Warnings never stop the pipeline.
    pub fn is_abort(&self) -> bool {
        *self == Verdict::Errors
    }
}

/// Runs `checker` once on `document`, reports every finding and classifies the result.
pub fn gate<C: Checker + ?Sized>(checker: &C, document: &Value) -> Result<Verdict> {
    let result = checker.check(document)?;
    report(&result);
    Ok(result.verdict())
}

fn report(result: &ValidationResult) {
    if result.is_empty() {
        return;
    }
    if !result.errors.is_empty() {
        error!("Validation errors:");
        for finding in &result.errors {
            error!("  {}", finding);
        }
    }
    if !result.warnings.is_empty() {
        warn!("Validation warnings:");
        for finding in &result.warnings {
            warn!("  {}", finding);
        }
    }
    info!(
        "{} error(s) and {} warning(s)",
        result.errors.len(),
        result.warnings.len()
    );
}

#[cfg(test)]
mod tests {
    use crate::validate::{Finding, ValidationResult, Verdict};

    #[test]
    fn finding_display() {
        let finding = Finding::new(&["paths", "/pets/{id}", "get"], "oops");
        assert_eq!(finding.to_string(), "#/paths/~1pets~1{id}/get: oops");
    }

    #[test]
    fn root_finding_display() {
        let finding = Finding::new::<&str>(&[], "Missing required property: info");
        assert_eq!(finding.to_string(), "#/: Missing required property: info");
    }

    mod gate {
        use anyhow::Result;
        use serde_json::json;

        use crate::test_util::FakeChecker;
        use crate::validate::{gate, Finding, ValidationResult, Verdict};

        #[test]
        fn clean() -> Result<()> {
            let checker = FakeChecker::new(ValidationResult::default());
            assert_eq!(gate(&checker, &json!({}))?, Verdict::Clean);
            Ok(())
        }

        #[test]
        fn warnings_continue() -> Result<()> {
            let checker = FakeChecker::new(ValidationResult {
                errors: vec![],
                warnings: vec![Finding::new(&["definitions", "Pet"], "unused")],
            });
            let verdict = gate(&checker, &json!({}))?;
            assert_eq!(verdict, Verdict::WarningsOnly);
            assert!(!verdict.is_abort());
            Ok(())
        }

        #[test]
        fn errors_abort() -> Result<()> {
            let checker = FakeChecker::new(ValidationResult {
                errors: vec![Finding::new(&["info"], "missing")],
                warnings: vec![Finding::new(&["definitions", "Pet"], "unused")],
            });
            assert!(gate(&checker, &json!({}))?.is_abort());
            Ok(())
        }

        #[test]
        fn checker_failure_propagates() {
            assert!(gate(&FakeChecker::failing(), &json!({})).is_err());
        }
    }

    #[test]
    fn verdict_classification() {
        let warning = Finding::new(&["a"], "w");
        let error = Finding::new(&["b"], "e");
        let mut result = ValidationResult::default();
        assert_eq!(result.verdict(), Verdict::Clean);
        result.warnings.push(warning);
        assert_eq!(result.verdict(), Verdict::WarningsOnly);
        result.errors.push(error);
        assert_eq!(result.verdict(), Verdict::Errors);
    }
}
