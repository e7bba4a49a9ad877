// ABOUTME: Date and time helpers built on chrono
// ABOUTME: Formats use strftime syntax

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::Value as Json;

use super::{arg, str_arg, strict, FallibleHelper};

const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time, RFC 3339 unless a format string is given.
pub fn now_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let now = Utc::now();
    let formatted = match h.param(0).and_then(|v| v.value().as_str()) {
        Some(format) => now.format(format).to_string(),
        None => now.to_rfc3339(),
    };
    out.write(&formatted)?;
    Ok(())
}

/// Seconds since the Unix epoch.
pub fn unix_epoch_helper(
    _h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&Utc::now().timestamp().to_string())?;
    Ok(())
}

/// `date format timestamp` where timestamp is RFC 3339 text or Unix seconds.
fn date(params: &[&Json]) -> Result<Json, String> {
    let format = str_arg(params, 0).unwrap_or(DEFAULT_FORMAT);
    let datetime = parse_timestamp(arg(params, 1)?)?;
    Ok(Json::from(datetime.format(format).to_string()))
}

fn parse_timestamp(value: &Json) -> Result<DateTime<FixedOffset>, String> {
    let seconds = match value {
        Json::String(s) => {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return Ok(parsed);
            }
            s.trim()
                .parse::<i64>()
                .map_err(|_| format!("failed to parse timestamp {:?}", s))?
        }
        Json::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("timestamp {} is not whole seconds", n))?,
        other => return Err(format!("unsupported timestamp {}", other)),
    };

    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(DateTime::<FixedOffset>::from)
        .ok_or_else(|| format!("timestamp {} is out of range", seconds))
}

pub fn register(handlebars: &mut Handlebars) {
    handlebars.register_helper("now", strict(now_helper));
    handlebars.register_helper("unixEpoch", strict(unix_epoch_helper));
    FallibleHelper::new("date", date).register(handlebars);
}
