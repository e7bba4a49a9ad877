// ABOUTME: Defaulting, conditional and environment helpers
// ABOUTME: default/empty/ternary plus uuidv4 and env lookups

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use std::env;
use uuid::Uuid;

use super::{is_empty, strict};

handlebars_helper!(default_value: |fallback: Json, given: Json| {
    if is_empty(given) { fallback.clone() } else { given.clone() }
});
handlebars_helper!(empty: |value: Json| is_empty(value));
handlebars_helper!(ternary: |if_true: Json, if_false: Json, condition: bool| {
    if condition { if_true.clone() } else { if_false.clone() }
});

/// UUID helper - generates a new UUID v4
pub fn uuid_helper(
    _h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&Uuid::new_v4().to_string())?;
    Ok(())
}

/// Environment variable helper - empty when the variable is unset
pub fn env_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .and_then(|name| env::var(name).ok())
        .unwrap_or_default();
    out.write(&value)?;
    Ok(())
}

pub fn register(handlebars: &mut Handlebars) {
    handlebars.register_helper("default", strict(default_value));
    handlebars.register_helper("empty", strict(empty));
    handlebars.register_helper("ternary", strict(ternary));
    handlebars.register_helper("uuidv4", strict(uuid_helper));
    handlebars.register_helper("env", strict(env_helper));
}
