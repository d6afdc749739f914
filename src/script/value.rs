//! Script values and name tables
//!
//! `ValueMap` is used both as the variable environment of a parse session and
//! as the argument map of a single task call.

use std::fmt;

/// A resolved script value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// Identifier with no variable binding, kept as its own text
    Ident(String),
}

impl Value {
    /// Condition truthiness: null and `false` are false, everything else is true
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    /// Text form of the value, `None` for null
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Ident(s) => f.write_str(s),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Insertion-ordered name to value table; `set` overwrites an existing name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Text of a non-null value bound to `name`
    pub fn get_str(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {:?}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect();
        write!(f, "{{ {} }}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(Value::Ident("release".to_string()).is_truthy());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(-2.0).to_string(), "-2");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Value::Null.as_text(), None);
        assert_eq!(Value::Boolean(true).as_text(), Some("true".to_string()));
        assert_eq!(
            Value::Ident("dist".to_string()).as_text(),
            Some("dist".to_string())
        );
    }

    #[test]
    fn test_map_overwrites() {
        let mut map = ValueMap::new();
        map.set("x", Value::Number(1.0));
        map.set("y", Value::Null);
        map.set("x", Value::String("two".to_string()));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x"), Some(&Value::String("two".to_string())));
        assert_eq!(map.get_str("y"), None);
        assert!(map.contains("y"));
        assert!(!map.contains("z"));
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let map: ValueMap = vec![
            ("src", Value::String("a".to_string())),
            ("dst", Value::String("b".to_string())),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["src", "dst"]);
        assert_eq!(map.to_string(), r#"{ src: "a", dst: "b" }"#);
    }
}
