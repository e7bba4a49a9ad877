// ABOUTME: Deep merge of value mappings
// ABOUTME: Later fragments win on every leaf; only nested mappings are merged recursively

use super::value::{Mapping, Value};

/// Merge `src` into `dest`, preferring values from `src`.
///
/// Sequences are leaves: an incoming sequence replaces the existing one
/// rather than being appended to it.
pub fn merge_values(mut dest: Mapping, src: Mapping) -> Mapping {
    for (key, incoming) in src {
        let merged = match (dest.remove(&key), incoming) {
            (None, incoming) => incoming,
            (Some(Value::Mapping(existing)), Value::Mapping(nested)) => {
                Value::Mapping(merge_values(existing, nested))
            }
            // Leaf overwrite, or a mapping replacing a non-mapping wholesale.
            (Some(_), incoming) => incoming,
        };
        dest.insert(key, merged);
    }
    dest
}
