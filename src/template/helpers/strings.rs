// ABOUTME: String and regular expression helpers
// ABOUTME: Argument order follows sprig, with the piped string last

use handlebars::{handlebars_helper, Handlebars};
use regex::Regex;
use serde_json::Value as Json;

use super::{int_arg, str_arg, strict, to_text, FallibleHelper};

/// Upper bound on text produced by `repeat` and the indent helpers.
const MAX_REPEAT_BYTES: usize = 64 * 1024 * 1024;

handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(title: |s: str| title_case(s));
handlebars_helper!(trim: |s: str| s.trim());
handlebars_helper!(trim_all: |cutset: str, s: str| s.trim_matches(|c: char| cutset.contains(c)));
handlebars_helper!(trim_prefix: |prefix: str, s: str| s.strip_prefix(prefix).unwrap_or(s));
handlebars_helper!(trim_suffix: |suffix: str, s: str| s.strip_suffix(suffix).unwrap_or(s));
handlebars_helper!(replace: |old: str, new: str, s: str| s.replace(old, new));
handlebars_helper!(contains: |needle: str, s: str| s.contains(needle));
handlebars_helper!(has_prefix: |prefix: str, s: str| s.starts_with(prefix));
handlebars_helper!(has_suffix: |suffix: str, s: str| s.ends_with(suffix));
handlebars_helper!(quote: |value: Json| format!("{:?}", to_text(value)));
handlebars_helper!(squote: |value: Json| format!("'{}'", to_text(value)));
handlebars_helper!(trunc: |length: i64, s: str| truncate(s, length));
handlebars_helper!(substr: |start: i64, end: i64, s: str| substring(s, start, end));
handlebars_helper!(split_list: |sep: str, s: str| s.split(sep).map(str::to_string).collect::<Vec<_>>());
handlebars_helper!(snakecase: |s: str| snake_case(s));
handlebars_helper!(camelcase: |s: str| camel_case(s));
handlebars_helper!(nospace: |s: str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>());

// Invalid patterns behave like sprig's non-"must" variants: no match, input unchanged.
handlebars_helper!(regex_match: |pattern: str, s: str| {
    Regex::new(pattern).map(|re| re.is_match(s)).unwrap_or(false)
});
handlebars_helper!(regex_find: |pattern: str, s: str| {
    Regex::new(pattern)
        .ok()
        .and_then(|re| re.find(s).map(|m| m.as_str().to_string()))
        .unwrap_or_default()
});
handlebars_helper!(regex_replace_all: |pattern: str, s: str, replacement: str| {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(s, replacement).into_owned(),
        Err(_) => s.to_string(),
    }
});

pub fn register(handlebars: &mut Handlebars) {
    handlebars.register_helper("upper", strict(upper));
    handlebars.register_helper("lower", strict(lower));
    handlebars.register_helper("title", strict(title));
    handlebars.register_helper("trim", strict(trim));
    handlebars.register_helper("trimAll", strict(trim_all));
    handlebars.register_helper("trimPrefix", strict(trim_prefix));
    handlebars.register_helper("trimSuffix", strict(trim_suffix));
    FallibleHelper::new("repeat", repeat).register(handlebars);
    handlebars.register_helper("replace", strict(replace));
    handlebars.register_helper("contains", strict(contains));
    handlebars.register_helper("hasPrefix", strict(has_prefix));
    handlebars.register_helper("hasSuffix", strict(has_suffix));
    handlebars.register_helper("quote", strict(quote));
    handlebars.register_helper("squote", strict(squote));
    FallibleHelper::new("indent", |p| indent(p).map(Json::from)).register(handlebars);
    FallibleHelper::new("nindent", |p| indent(p).map(|s| Json::from(format!("\n{}", s))))
        .register(handlebars);
    handlebars.register_helper("trunc", strict(trunc));
    handlebars.register_helper("substr", strict(substr));
    handlebars.register_helper("splitList", strict(split_list));
    handlebars.register_helper("snakecase", strict(snakecase));
    handlebars.register_helper("camelcase", strict(camelcase));
    handlebars.register_helper("nospace", strict(nospace));
    handlebars.register_helper("regexMatch", strict(regex_match));
    handlebars.register_helper("regexFind", strict(regex_find));
    handlebars.register_helper("regexReplaceAll", strict(regex_replace_all));
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn count_arg(params: &[&Json], index: usize) -> Result<usize, String> {
    let count = int_arg(params, index)?;
    usize::try_from(count).map_err(|_| format!("count {} must not be negative", count))
}

fn repeated(s: &str, count: usize) -> Result<String, String> {
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_BYTES => Ok(s.repeat(count)),
        _ => Err(format!("repeating {} bytes {} times is too large", s.len(), count)),
    }
}

/// `repeat count s`
fn repeat(params: &[&Json]) -> Result<Json, String> {
    let count = count_arg(params, 0)?;
    repeated(str_arg(params, 1)?, count).map(Json::from)
}

/// `indent width s`: pad every line of `s` with `width` spaces.
fn indent(params: &[&Json]) -> Result<String, String> {
    let pad = repeated(" ", count_arg(params, 0)?)?;
    let s = str_arg(params, 1)?;
    Ok(format!("{}{}", pad, s.replace('\n', &format!("\n{}", pad))))
}

/// Keep the first `length` characters, or the last `-length` when negative.
fn truncate(s: &str, length: i64) -> String {
    let count = s.chars().count();
    let wanted = length.unsigned_abs() as usize;
    if wanted >= count {
        return s.to_string();
    }
    if length < 0 {
        s.chars().skip(count - wanted).collect()
    } else {
        s.chars().take(wanted).collect()
    }
}

/// Character slice `[start, end)`; a negative start means "from the beginning",
/// a negative or oversized end means "to the end".
fn substring(s: &str, start: i64, end: i64) -> String {
    let count = s.chars().count();
    let start = if start < 0 { 0 } else { (start as usize).min(count) };
    let end = if end < 0 || end as usize > count {
        count
    } else {
        end as usize
    };
    if start >= end {
        return String::new();
    }
    s.chars().skip(start).take(end - start).collect()
}

fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in s.chars() {
        if c == ' ' || c == '-' || c == '_' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower_or_digit = false;
        } else if c.is_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

fn camel_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
