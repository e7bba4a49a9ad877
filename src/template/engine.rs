// ABOUTME: Strict-mode Handlebars rendering of a template against resolved values
// ABOUTME: Compile and execute are separate steps so each failure is reported distinctly

use handlebars::{Handlebars, Template};
use std::io::Write;
use tracing::debug;

use super::error::Result;
use super::helpers;
use super::source::TemplateSource;
use crate::values::Mapping;

const TEMPLATE_NAME: &str = "template";

/// Template engine with the helper library registered and unknown keys treated as errors.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with all built-in helpers
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // A reference to an absent key fails the render instead of printing nothing
        handlebars.set_strict_mode(true);
        handlebars.set_dev_mode(false);

        // Output is plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        helpers::register_helpers(&mut handlebars);

        Self { handlebars }
    }

    /// Parse the template text, consuming the engine.
    pub fn compile(mut self, source: &TemplateSource) -> Result<CompiledTemplate> {
        let template = Template::compile(&source.text)?;
        debug!(
            "Compiled template from {:?} ({} bytes)",
            source.origin,
            source.text.len()
        );
        self.handlebars.register_template(TEMPLATE_NAME, template);
        Ok(CompiledTemplate {
            handlebars: self.handlebars,
        })
    }

    /// Register an additional helper before compiling.
    pub fn register_helper<F>(&mut self, name: &str, helper: F)
    where
        F: handlebars::HelperDef + Send + Sync + 'static,
    {
        self.handlebars.register_helper(name, helpers::strict(helper));
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A template that parsed successfully and is ready to execute.
pub struct CompiledTemplate {
    handlebars: Handlebars<'static>,
}

impl CompiledTemplate {
    /// Render against `values`, streaming into `out`.
    ///
    /// Text produced before a failure has already been written to `out`.
    pub fn execute<W: Write>(&self, values: &Mapping, out: W) -> Result<()> {
        self.handlebars.render_to_write(TEMPLATE_NAME, values, out)?;
        Ok(())
    }

    /// Render into a string.
    pub fn render(&self, values: &Mapping) -> Result<String> {
        Ok(self.handlebars.render(TEMPLATE_NAME, values)?)
    }
}

/// Convenience: compile `source` with the default engine and render it to a string.
pub fn render_source(source: &TemplateSource, values: &Mapping) -> Result<String> {
    TemplateEngine::new().compile(source)?.render(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateError;
    use crate::values::{apply_override, parse_document};

    fn values(yaml: &str) -> Mapping {
        parse_document(yaml).unwrap()
    }

    fn compile(text: &str) -> CompiledTemplate {
        TemplateEngine::new()
            .compile(&TemplateSource::from_text(text))
            .unwrap()
    }

    #[test]
    fn test_basic_template_rendering() {
        let vals = values("foo: bar\nkey: value\n");
        let out = compile("foo is {{foo}} and keyx2 is {{repeat 2 key}}")
            .render(&vals)
            .unwrap();
        assert_eq!(out, "foo is bar and keyx2 is valuevalue");
    }

    #[test]
    fn test_nested_values_and_blocks() {
        let vals = values("app:\n  name: shop\n  ports: [80, 443]\n  debug: false\n");
        let tpl = "{{app.name}}:{{#each app.ports}} {{this}}{{/each}}{{#if app.debug}} debug{{/if}}";
        assert_eq!(compile(tpl).render(&vals).unwrap(), "shop: 80 443");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let vals = values("present: yes\n");
        let err = compile("{{present}} {{absent}}").render(&vals).unwrap_err();
        match err {
            TemplateError::MissingKey { key } => assert!(key.contains("absent")),
            other => panic!("expected missing key, got {}", other),
        }
    }

    #[test]
    fn test_missing_nested_key_is_an_error() {
        let vals = values("db:\n  host: localhost\n");
        let err = compile("{{db.port}}").render(&vals).unwrap_err();
        assert!(matches!(err, TemplateError::MissingKey { .. }));
    }

    fn missing_key(template: &str, vals: &Mapping) -> String {
        match compile(template).render(vals) {
            Err(TemplateError::MissingKey { key }) => key,
            Err(other) => panic!("{}: expected missing key, got {}", template, other),
            Ok(out) => panic!("{}: expected missing key, rendered {:?}", template, out),
        }
    }

    #[test]
    fn test_conditionals_on_missing_key_fail() {
        let vals = values("present: yes\n");
        assert_eq!(missing_key("{{#if absent}}x{{else}}y{{/if}}", &vals), "absent");
        assert_eq!(missing_key("{{#unless absent}}x{{/unless}}", &vals), "absent");
        let key = missing_key("{{#if present}}{{#if nested.flag}}x{{/if}}{{/if}}", &vals);
        assert!(key.contains("flag"), "{}", key);
    }

    #[test]
    fn test_conditionals_on_present_values() {
        let vals = values("enabled: true\ndisabled: false\nzero: 0\n");
        let tpl = "{{#if enabled}}a{{/if}}{{#if disabled}}b{{else}}c{{/if}}{{#unless disabled}}d{{/unless}}";
        assert_eq!(compile(tpl).render(&vals).unwrap(), "acd");
        assert_eq!(
            compile("{{#if zero includeZero=true}}z{{/if}}").render(&vals).unwrap(),
            "z"
        );
    }

    #[test]
    fn test_helper_arguments_on_missing_key_fail() {
        let vals = values("word: hi\n");
        for tpl in [
            "{{repeat 2 absent}}",
            "{{upper absent}}",
            "{{default \"d\" absent}}",
            "{{toJson absent}}",
            "{{upper (default \"d\" absent)}}",
            "{{join \",\" absent}}",
        ] {
            assert_eq!(missing_key(tpl, &vals), "absent", "{}", tpl);
        }
        assert_eq!(compile("{{upper word}}").render(&vals).unwrap(), "HI");
    }

    #[test]
    fn test_oversized_repeat_is_a_render_error() {
        let err = compile("{{repeat 18446744073709551615 \"x\"}}")
            .render(&Mapping::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Render(_)));
    }

    #[test]
    fn test_no_html_escaping() {
        let mut vals = Mapping::new();
        apply_override(&mut vals, "html=<b>&</b>").unwrap();
        assert_eq!(compile("{{html}}").render(&vals).unwrap(), "<b>&</b>");
    }

    #[test]
    fn test_compile_error() {
        let err = TemplateEngine::new()
            .compile(&TemplateSource::from_text("Hello {{name}"))
            .err()
            .unwrap();
        assert!(matches!(err, TemplateError::Compile(_)));
        assert!(err.to_string().starts_with("could not parse template"));

        let err = TemplateEngine::new()
            .compile(&TemplateSource::from_text("{{#if x}}unclosed"))
            .err()
            .unwrap();
        assert!(matches!(err, TemplateError::Compile(_)));
    }

    #[test]
    fn test_helper_failure_is_a_render_error() {
        let err = compile("{{div 1 0}}").render(&Mapping::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Render(_)));
    }

    #[test]
    fn test_execute_streams_to_writer() {
        let vals = values("name: world\n");
        let mut out = Vec::new();
        compile("hello {{name}}\n").execute(&vals, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello world\n");
    }

    #[test]
    fn test_execute_failure_keeps_partial_output() {
        let vals = values("name: world\n");
        let mut out = Vec::new();
        let result = compile("hello {{name}} {{missing}}").execute(&vals, &mut out);
        assert!(result.is_err());
        assert!(String::from_utf8(out).unwrap().starts_with("hello world"));
    }

    fn shout_helper(
        h: &handlebars::Helper,
        _: &Handlebars,
        _: &handlebars::Context,
        _: &mut handlebars::RenderContext,
        out: &mut dyn handlebars::Output,
    ) -> handlebars::HelperResult {
        let text = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
        out.write(&format!("{}!", text.to_uppercase()))?;
        Ok(())
    }

    #[test]
    fn test_custom_helper() {
        let mut engine = TemplateEngine::new();
        engine.register_helper("shout", shout_helper);

        let vals = values("word: hey\n");
        let compiled = engine
            .compile(&TemplateSource::from_text("{{shout word}}"))
            .unwrap();
        assert_eq!(compiled.render(&vals).unwrap(), "HEY!");
    }

    #[test]
    fn test_render_is_deterministic() {
        let vals = values("m:\n  b: 2\n  a: 1\n");
        let first = render_source(&TemplateSource::from_text("{{toJson m}}"), &vals).unwrap();
        let second = render_source(&TemplateSource::from_text("{{toJson m}}"), &vals).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, r#"{"a":1,"b":2}"#);
    }
}
