// ABOUTME: Integer and float arithmetic helpers
// ABOUTME: Overflow and division by zero are render errors rather than silent wraparound

use handlebars::Handlebars;
use serde_json::Value as Json;

use super::{arg, int_arg, FallibleHelper};

pub fn register(handlebars: &mut Handlebars) {
    FallibleHelper::new("add", |p| checked(p, i64::checked_add)).register(handlebars);
    FallibleHelper::new("sub", |p| checked(p, i64::checked_sub)).register(handlebars);
    FallibleHelper::new("mul", |p| checked(p, i64::checked_mul)).register(handlebars);
    FallibleHelper::new("div", |p| nonzero_divisor(p, i64::checked_div)).register(handlebars);
    FallibleHelper::new("mod", |p| nonzero_divisor(p, i64::checked_rem)).register(handlebars);
    FallibleHelper::new("max", |p| pair(p).map(|(a, b)| Json::from(a.max(b)))).register(handlebars);
    FallibleHelper::new("min", |p| pair(p).map(|(a, b)| Json::from(a.min(b)))).register(handlebars);
    FallibleHelper::new("floor", |p| float_arg(p, 0).map(|f| Json::from(f.floor())))
        .register(handlebars);
    FallibleHelper::new("ceil", |p| float_arg(p, 0).map(|f| Json::from(f.ceil())))
        .register(handlebars);
    FallibleHelper::new("round", round).register(handlebars);
}

fn pair(params: &[&Json]) -> Result<(i64, i64), String> {
    Ok((int_arg(params, 0)?, int_arg(params, 1)?))
}

fn checked(params: &[&Json], op: fn(i64, i64) -> Option<i64>) -> Result<Json, String> {
    let (a, b) = pair(params)?;
    op(a, b)
        .map(Json::from)
        .ok_or_else(|| format!("integer overflow for {} and {}", a, b))
}

fn nonzero_divisor(params: &[&Json], op: fn(i64, i64) -> Option<i64>) -> Result<Json, String> {
    if int_arg(params, 1)? == 0 {
        return Err("division by zero".to_string());
    }
    checked(params, op)
}

fn float_arg(params: &[&Json], index: usize) -> Result<f64, String> {
    match arg(params, index)? {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("argument {} is not a finite number", index + 1)),
        Json::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("argument {} must be a number, got {:?}", index + 1, s)),
        other => Err(format!("argument {} must be a number, got {}", index + 1, other)),
    }
}

/// `round value [places]`, rounding half away from zero.
fn round(params: &[&Json]) -> Result<Json, String> {
    let value = float_arg(params, 0)?;
    let places = if params.len() > 1 { int_arg(params, 1)? } else { 0 };
    let factor = 10f64.powi(places.clamp(0, 15) as i32);
    Ok(Json::from((value * factor).round() / factor))
}
