// ABOUTME: Parser for --set style overrides (key=value, dotted paths, list indexes)
// ABOUTME: Writes typed scalars into a mapping, creating nested structure on demand

use std::iter::Peekable;
use std::str::Chars;

use super::error::OverrideError;
use super::value::{Mapping, Value};

/// Largest list index an override may address.
pub const MAX_INDEX: usize = 65536;

/// Apply one override string such as `a.b=1,list[0].name=x,tags={a,b}`.
pub fn apply_override(mapping: &mut Mapping, input: &str) -> Result<(), OverrideError> {
    let mut parser = OverrideParser::new(input);
    while parser.assignment(mapping)? {}
    Ok(())
}

struct OverrideParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> OverrideParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Read up to (and consuming) the first unescaped stop character.
    fn read_until(&mut self, stop: &[char]) -> (String, Option<char>) {
        let mut buf = String::new();
        while let Some(c) = self.chars.next() {
            if stop.contains(&c) {
                return (buf, Some(c));
            }
            if c == '\\' {
                match self.chars.next() {
                    Some(escaped) => buf.push(escaped),
                    None => break,
                }
            } else {
                buf.push(c);
            }
        }
        (buf, None)
    }

    /// Parse one assignment into `data`. Returns `false` once the input is exhausted.
    fn assignment(&mut self, data: &mut Mapping) -> Result<bool, OverrideError> {
        let (key, last) = self.read_until(&['=', '[', ',', '.']);
        let Some(last) = last else {
            if key.is_empty() {
                return Ok(false);
            }
            return Err(OverrideError::NoValue { key });
        };
        if key.is_empty() {
            return Err(OverrideError::EmptyKey);
        }

        match last {
            '=' => {
                let value = self.value()?;
                data.insert(key, value);
            }
            ',' => return Err(OverrideError::TrailingComma { key }),
            '.' => {
                let mut inner = match data.remove(&key) {
                    Some(Value::Mapping(map)) => map,
                    _ => Mapping::new(),
                };
                if !self.assignment(&mut inner)? {
                    return Err(OverrideError::EmptyMap { key });
                }
                data.insert(key, Value::Mapping(inner));
            }
            _ => {
                let index = self.index()?;
                let mut list = match data.remove(&key) {
                    Some(Value::Sequence(items)) => items,
                    _ => Vec::new(),
                };
                self.list_item(&key, &mut list, index)?;
                data.insert(key, Value::Sequence(list));
            }
        }
        Ok(true)
    }

    fn index(&mut self) -> Result<usize, OverrideError> {
        let (raw, last) = self.read_until(&[']']);
        if last.is_none() {
            return Err(OverrideError::UnclosedIndex);
        }
        let index: i64 = raw
            .parse()
            .map_err(|_| OverrideError::InvalidIndex(raw.clone()))?;
        let index = usize::try_from(index).map_err(|_| OverrideError::NegativeIndex(index))?;
        if index > MAX_INDEX {
            return Err(OverrideError::IndexTooLarge {
                index,
                max: MAX_INDEX,
            });
        }
        Ok(index)
    }

    fn list_item(
        &mut self,
        key: &str,
        list: &mut Vec<Value>,
        index: usize,
    ) -> Result<(), OverrideError> {
        let (rest, last) = self.read_until(&['[', '.', '=']);
        if !rest.is_empty() {
            return Err(OverrideError::UnexpectedIndexData(rest));
        }

        match last {
            None => Err(OverrideError::NoValue {
                key: format!("{}[{}]", key, index),
            }),
            Some('=') => {
                let value = self.value()?;
                set_index(list, index, value);
                Ok(())
            }
            Some('[') => {
                let nested_index = self.index()?;
                let mut nested = match take_index(list, index) {
                    Some(Value::Sequence(items)) => items,
                    _ => Vec::new(),
                };
                let nested_key = format!("{}[{}]", key, index);
                self.list_item(&nested_key, &mut nested, nested_index)?;
                set_index(list, index, Value::Sequence(nested));
                Ok(())
            }
            Some(_) => {
                let mut inner = match take_index(list, index) {
                    Some(Value::Mapping(map)) => map,
                    _ => Mapping::new(),
                };
                self.assignment(&mut inner)?;
                set_index(list, index, Value::Mapping(inner));
                Ok(())
            }
        }
    }

    fn value(&mut self) -> Result<Value, OverrideError> {
        match self.chars.peek() {
            None => Ok(Value::from("")),
            Some('{') => {
                self.chars.next();
                self.value_list()
            }
            Some(_) => {
                let (raw, _) = self.read_until(&[',']);
                Ok(typed_value(&raw))
            }
        }
    }

    fn value_list(&mut self) -> Result<Value, OverrideError> {
        let mut items = Vec::new();
        loop {
            let (raw, last) = self.read_until(&[',', '}']);
            match last {
                None => return Err(OverrideError::UnterminatedList),
                Some('}') => {
                    items.push(typed_value(&raw));
                    if self.chars.peek() == Some(&',') {
                        self.chars.next();
                    }
                    return Ok(Value::Sequence(items));
                }
                Some(_) => items.push(typed_value(&raw)),
            }
        }
    }
}

fn take_index(list: &mut [Value], index: usize) -> Option<Value> {
    list.get_mut(index)
        .map(|slot| std::mem::replace(slot, Value::null()))
}

fn set_index(list: &mut Vec<Value>, index: usize, value: Value) {
    if list.len() <= index {
        list.resize(index + 1, Value::null());
    }
    list[index] = value;
}

/// Booleans, null and plain decimal integers are typed; everything else stays a string.
/// Integers with a leading zero are kept as strings so `007` survives intact.
fn typed_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::from(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::from(false);
    }
    if raw.eq_ignore_ascii_case("null") {
        return Value::null();
    }
    if raw == "0" {
        return Value::from(0);
    }
    if !raw.starts_with('0') {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::from(i);
        }
    }
    Value::from(raw)
}
