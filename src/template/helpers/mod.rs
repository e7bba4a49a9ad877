// ABOUTME: Handlebars helper library available to every template
// ABOUTME: Sprig-style string, math, date, encoding, collection and default functions

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy, Output, RenderContext,
    RenderError, RenderErrorReason, Renderable, ScopedJson,
};
use serde_json::Value as Json;

pub mod collections;
pub mod dates;
pub mod encoding;
pub mod math;
pub mod misc;
pub mod strings;

/// Register the full helper library with a Handlebars instance.
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("if", Box::new(Conditional { positive: true }));
    handlebars.register_helper("unless", Box::new(Conditional { positive: false }));
    strings::register(handlebars);
    math::register(handlebars);
    dates::register(handlebars);
    encoding::register(handlebars);
    collections::register(handlebars);
    misc::register(handlebars);
}

/// Render a JSON value the way it would appear in template output.
pub(crate) fn to_text(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whether a value counts as "empty" for `default` and `empty`.
pub(crate) fn is_empty(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::Bool(b) => !b,
        Json::Number(n) => n.as_f64() == Some(0.0),
        Json::String(s) => s.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(map) => map.is_empty(),
    }
}

/// In strict mode, fail on the first parameter or hash value that names an absent key.
pub(crate) fn check_params(h: &Helper, r: &Handlebars) -> Result<(), RenderError> {
    if !r.strict_mode() {
        return Ok(());
    }
    let missing = h
        .params()
        .iter()
        .chain(h.hash().values())
        .find(|p| p.is_value_missing());
    match missing {
        Some(p) => Err(RenderErrorReason::MissingVariable(p.relative_path().cloned()).into()),
        None => Ok(()),
    }
}

/// Wraps a helper so absent arguments are reported as missing keys before it runs.
pub struct StrictParams<H>(pub H);

impl<H: HelperDef> HelperDef for StrictParams<H> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        check_params(h, r)?;
        self.0.call_inner(h, r, ctx, rc)
    }

    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_params(h, r)?;
        self.0.call(h, r, ctx, rc, out)
    }
}

pub(crate) fn strict<H>(helper: H) -> Box<dyn HelperDef + Send + Sync>
where
    H: HelperDef + Send + Sync + 'static,
{
    Box::new(StrictParams(helper))
}

/// `if`/`unless` that treat a condition on an absent key as an error in strict mode.
struct Conditional {
    positive: bool,
}

impl HelperDef for Conditional {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = if self.positive { "if" } else { "unless" };
        let param = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(name, 0))?;
        check_params(h, r)?;

        let include_zero = h
            .hash_get("includeZero")
            .and_then(|v| v.value().as_bool())
            .unwrap_or(false);
        let truthy = param.value().is_truthy(include_zero) == self.positive;

        match if truthy { h.template() } else { h.inverse() } {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

type HelperFn = dyn Fn(&[&Json]) -> Result<Json, String> + Send + Sync;

/// A helper that computes a value and may fail.
///
/// Returning a value (rather than writing text) lets the result feed
/// subexpressions such as `{{add (div total 2) 1}}` with its JSON type intact.
pub struct FallibleHelper {
    name: &'static str,
    func: Box<HelperFn>,
}

impl FallibleHelper {
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&[&Json]) -> Result<Json, String> + Send + Sync + 'static,
    {
        Self {
            name,
            func: Box::new(func),
        }
    }

    pub fn register(self, handlebars: &mut Handlebars) {
        let name = self.name;
        handlebars.register_helper(name, Box::new(self));
    }
}

impl HelperDef for FallibleHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        check_params(h, r)?;
        let params: Vec<&Json> = h.params().iter().map(|p| p.value()).collect();
        (self.func)(&params)
            .map(ScopedJson::Derived)
            .map_err(|msg| RenderErrorReason::Other(format!("{}: {}", self.name, msg)).into())
    }
}

/// Fetch positional argument `index` or explain which one is missing.
pub(crate) fn arg<'a>(params: &[&'a Json], index: usize) -> Result<&'a Json, String> {
    params
        .get(index)
        .copied()
        .ok_or_else(|| format!("missing argument {}", index + 1))
}

pub(crate) fn str_arg<'a>(params: &[&'a Json], index: usize) -> Result<&'a str, String> {
    arg(params, index)?
        .as_str()
        .ok_or_else(|| format!("argument {} must be a string", index + 1))
}

pub(crate) fn int_arg(params: &[&Json], index: usize) -> Result<i64, String> {
    let value = arg(params, index)?;
    match value {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| format!("argument {} is out of range", index + 1)),
        Json::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("argument {} must be an integer, got {:?}", index + 1, s)),
        other => Err(format!(
            "argument {} must be an integer, got {}",
            index + 1,
            other
        )),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use handlebars::Handlebars;
    use serde_json::Value as Json;

    pub fn handlebars() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        super::register_helpers(&mut handlebars);
        handlebars
    }

    pub fn render(template: &str, data: &Json) -> String {
        handlebars().render_template(template, data).unwrap()
    }

    pub fn render_err(template: &str, data: &Json) -> String {
        handlebars()
            .render_template(template, data)
            .unwrap_err()
            .to_string()
    }
}
