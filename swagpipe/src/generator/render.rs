use anyhow::{Context, Result};
use handlebars::{no_escape, Handlebars};

use crate::config::Templates;
use crate::generator::{view, EmitSettings, Mode};

const CLASS: &str = "class";
const METHOD: &str = "method";
const REQUEST: &str = "request";

/// Template text for one run. The class template is the entry; it can include the others as
/// the `method` and `request` partials.
#[derive(Debug, Copy, Clone)]
struct Fragments<'a> {
    class: &'a str,
    method: &'a str,
    request: &'a str,
}

const NODE: Fragments<'static> = Fragments {
    class: include_str!("templates/node-class.hbs"),
    method: include_str!("templates/method.hbs"),
    request: include_str!("templates/node-request.hbs"),
};

const ANGULAR: Fragments<'static> = Fragments {
    class: include_str!("templates/angular-class.hbs"),
    method: include_str!("templates/method.hbs"),
    request: include_str!("templates/angular-request.hbs"),
};

impl<'a> Fragments<'a> {
    fn from_templates(templates: &'a Templates) -> Self {
        Self {
            class: &templates.class,
            method: &templates.method,
            request: &templates.request,
        }
    }

    /// Empty fragments are taken from `builtin`.
    fn or(self, builtin: Fragments<'a>) -> Self {
        let pick = |supplied: &'a str, builtin: &'a str| {
            if supplied.is_empty() {
                builtin
            } else {
                supplied
            }
        };
        Self {
            class: pick(self.class, builtin.class),
            method: pick(self.method, builtin.method),
            request: pick(self.request, builtin.request),
        }
    }
}

/// Node.js client class.
pub fn get_node_code(settings: &EmitSettings) -> Result<String> {
    let fragments = Fragments::from_templates(&settings.templates).or(NODE);
    render(settings, Mode::Node, fragments)
}

/// AngularJS service.
pub fn get_angular_code(settings: &EmitSettings) -> Result<String> {
    let fragments = Fragments::from_templates(&settings.templates).or(ANGULAR);
    render(settings, Mode::Angular, fragments)
}

/// Caller-supplied templates only.
pub fn get_custom_code(settings: &EmitSettings) -> Result<String> {
    let fragments = Fragments::from_templates(&settings.templates);
    render(settings, Mode::Custom, fragments)
}

fn render(settings: &EmitSettings, mode: Mode, fragments: Fragments<'_>) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(no_escape);
    handlebars
        .register_partial(METHOD, fragments.method)
        .context("invalid method template")?;
    handlebars
        .register_partial(REQUEST, fragments.request)
        .context("invalid request template")?;
    handlebars
        .register_template_string(CLASS, fragments.class)
        .context("invalid class template")?;

    let view = view::build(settings, mode);
    handlebars
        .render(CLASS, &view)
        .with_context(|| format!("failed to render {} code", mode))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::config::Templates;
    use crate::generator::{get_angular_code, get_custom_code, get_node_code, EmitSettings};
    use crate::test_util;

    fn with_templates(class: &str, method: &str, request: &str) -> EmitSettings {
        EmitSettings {
            templates: Templates {
                class: class.to_string(),
                method: method.to_string(),
                request: request.to_string(),
            },
            ..test_util::emit_settings()
        }
    }

    mod builtin {
        use anyhow::Result;

        use crate::generator::{get_angular_code, get_node_code};
        use crate::test_util;

        #[test]
        fn node() -> Result<()> {
            let code = get_node_code(&test_util::emit_settings())?;
            assert!(code.contains("var Api = (function(){"));
            assert!(code.contains("require('request')"));
            assert!(code.contains("Api.prototype.listPets = function(parameters){"));
            assert!(code.contains("Api.prototype.createPet = function(parameters){"));
            assert!(code.contains("Api.prototype.showPetById = function(parameters){"));
            assert!(code.contains("path = path.replace('{' + 'petId' + '}'"));
            assert!(code.contains("queryParameters['limit'] = parameters['limit'];"));
            assert!(code.contains("this.domain = domain ? domain : 'http://petstore.swagger.io/v1';"));
            assert!(code.contains("exports.Api = Api;"));
            assert!(!code.contains("$q"));
            Ok(())
        }

        #[test]
        fn angular() -> Result<()> {
            let code = get_angular_code(&test_util::emit_settings())?;
            assert!(code.contains("angular.module('Api', [])"));
            assert!(code.contains(".factory('Api', ['$q', '$http', function($q, $http){"));
            assert!(code.contains("Api.prototype.listPets = function(parameters){"));
            assert!(code.contains("return $http({"));
            assert!(code.contains("$q.reject(new Error('Missing required parameter: petId'))"));
            assert!(!code.contains("require('request')"));
            Ok(())
        }

        #[test]
        fn output_is_not_escaped() -> Result<()> {
            let mut settings = test_util::emit_settings();
            settings.swagger["info"]["description"] = "Pets & <friends>".into();
            let code = get_node_code(&settings)?;
            assert!(code.contains(" * Pets & <friends>"));
            Ok(())
        }
    }

    #[test]
    fn custom_uses_only_supplied_templates() -> Result<()> {
        let settings = with_templates(
            "{{className}}:{{#each methods}}{{> method}};{{/each}}",
            "{{methodName}}",
            "",
        );
        assert_eq!(
            get_custom_code(&settings)?,
            "Api:listPets;createPet;showPetById;"
        );
        Ok(())
    }

    #[test]
    fn custom_sees_mustache_values() -> Result<()> {
        let mut settings = with_templates("{{license}} {{isNode}} {{swagger.info.title}}", "", "");
        settings
            .mustache
            .insert("license".to_string(), "MIT".into());
        assert_eq!(get_custom_code(&settings)?, "MIT false Swagger Petstore");
        Ok(())
    }

    #[test]
    fn builtin_fragments_fill_gaps() -> Result<()> {
        let settings = with_templates("", "", "REQUEST {{method}}");
        let code = get_node_code(&settings)?;
        assert!(code.contains("var Api = (function(){"));
        assert!(code.contains("REQUEST GET"));
        assert!(code.contains("REQUEST POST"));
        assert!(!code.contains("new Promise(function(resolve, reject)"));

        let settings = with_templates("class {{className}}", "", "");
        assert_eq!(get_angular_code(&settings)?, "class Api");
        Ok(())
    }

    #[test]
    fn invalid_template_errors() {
        let settings = with_templates("{{#each methods}}", "", "");
        assert!(get_custom_code(&settings).is_err());
    }
}
