// ABOUTME: Encoding helpers: base64 and JSON/YAML serialization of values
// ABOUTME: Serializers accept whole subtrees of the resolved values

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value as Json;

use super::{arg, str_arg, strict, FallibleHelper};

handlebars_helper!(b64enc: |s: str| BASE64.encode(s.as_bytes()));

fn b64dec(params: &[&Json]) -> Result<Json, String> {
    let input = str_arg(params, 0)?;
    let bytes = BASE64
        .decode(input)
        .map_err(|e| format!("base64 decode error: {}", e))?;
    let decoded = String::from_utf8(bytes).map_err(|e| format!("UTF-8 decode error: {}", e))?;
    Ok(Json::from(decoded))
}

fn to_json(params: &[&Json]) -> Result<Json, String> {
    serde_json::to_string(arg(params, 0)?)
        .map(Json::from)
        .map_err(|e| e.to_string())
}

fn to_pretty_json(params: &[&Json]) -> Result<Json, String> {
    serde_json::to_string_pretty(arg(params, 0)?)
        .map(Json::from)
        .map_err(|e| e.to_string())
}

fn to_yaml(params: &[&Json]) -> Result<Json, String> {
    serde_yaml::to_string(arg(params, 0)?)
        .map(|yaml| Json::from(yaml.trim_end().to_string()))
        .map_err(|e| e.to_string())
}

pub fn register(handlebars: &mut Handlebars) {
    handlebars.register_helper("b64enc", strict(b64enc));
    FallibleHelper::new("b64dec", b64dec).register(handlebars);
    FallibleHelper::new("toJson", to_json).register(handlebars);
    FallibleHelper::new("toPrettyJson", to_pretty_json).register(handlebars);
    FallibleHelper::new("toYaml", to_yaml).register(handlebars);
}
