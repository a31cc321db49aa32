use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

/// Supported column data types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Integer,
    Varchar,
    Boolean,
}

impl DataType {
    /// Parses a type name from a CREATE TABLE column definition (case-insensitive)
    pub fn from_name(name: &str) -> Option<DataType> {
        Some(match name.to_uppercase().as_ref() {
            "INTEGER" | "INT" => DataType::Integer,
            "VARCHAR" | "TEXT" => DataType::Varchar,
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Varchar => "VARCHAR",
            DataType::Boolean => "BOOLEAN",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A single cell value
///
/// Serialized untagged, so a row file holds plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl Value {
    /// Parses a literal token: NULL, TRUE/FALSE, a base-10 integer, or text
    pub fn from_literal(token: &str) -> Self {
        match token.to_uppercase().as_ref() {
            "NULL" => return Value::Null,
            "TRUE" => return Value::Boolean(true),
            "FALSE" => return Value::Boolean(false),
            _ => {}
        }
        match token.parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::String(token.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the data type of the value, or None if it's Null
    pub fn datatype(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(DataType::Boolean),
            Self::Integer(_) => Some(DataType::Integer),
            Self::String(_) => Some(DataType::Varchar),
        }
    }

    /// Exact integer reading: integers, and text that parses as an `i64`
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Null | Value::Boolean(_) => None,
        }
    }

    /// Numeric reading used by comparisons; text counts if it parses as a
    /// finite float (`nan` and `inf` stay text)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::String(s) => s.parse::<f64>().ok().filter(|f| f.is_finite()),
            Value::Null | Value::Boolean(_) => None,
        }
    }

    /// Orders two non-null values.
    ///
    /// Both integral: exact `i64` order. Otherwise both numeric: float
    /// order. Both boolean: false < true. Anything else: lexical order of
    /// the rendered text.
    pub fn compare(&self, other: &Value) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return a.cmp(&b);
        }
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.total_cmp(&b);
        }
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

/// Anchored, case-sensitive LIKE match: `%` is any run, `_` is one character
///
/// Greedy scan that only ever backtracks to the most recent `%`, so the cost
/// stays linear in text length times pattern length.
pub fn like_match(text: &str, pattern: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    // Pattern position after the last `%`, and the text position it resumes at
    let mut resume: Option<(usize, usize)> = None;
    while ti < txt.len() {
        match pat.get(pi) {
            Some('%') => {
                pi += 1;
                resume = Some((pi, ti));
            }
            Some(&c) if c == '_' || c == txt[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match resume {
                Some((rp, rt)) => {
                    pi = rp;
                    ti = rt + 1;
                    resume = Some((rp, rt + 1));
                }
                None => return false,
            },
        }
    }
    pat[pi..].iter().all(|&c| c == '%')
}

/// A row holds one value per table column, in column order
pub type Row = Vec<Value>;

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{DataType, Value, like_match};

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from_literal("null"), Value::Null);
        assert_eq!(Value::from_literal("NULL"), Value::Null);
        assert_eq!(Value::from_literal("True"), Value::Boolean(true));
        assert_eq!(Value::from_literal("FALSE"), Value::Boolean(false));
        assert_eq!(Value::from_literal("42"), Value::Integer(42));
        assert_eq!(Value::from_literal("-7"), Value::Integer(-7));
        assert_eq!(Value::from_literal("4.5"), Value::String("4.5".into()));
        assert_eq!(Value::from_literal("Alice"), Value::String("Alice".into()));
    }

    #[test]
    fn test_compare() {
        assert_eq!(Value::Integer(30).compare(&Value::Integer(25)), Ordering::Greater);
        // numeric text compares numerically against integers
        assert_eq!(Value::String("10".into()).compare(&Value::Integer(9)), Ordering::Greater);
        assert_eq!(Value::String("2.5".into()).compare(&Value::Integer(2)), Ordering::Greater);
        // non-numeric text falls back to lexical order
        assert_eq!(Value::String("Bob".into()).compare(&Value::String("Alice".into())), Ordering::Greater);
        assert_eq!(Value::Integer(10).compare(&Value::String("abc".into())), Ordering::Less);
        assert_eq!(Value::Boolean(false).compare(&Value::Boolean(true)), Ordering::Less);
        assert_eq!(Value::Boolean(true).compare(&Value::String("true".into())), Ordering::Equal);
    }

    #[test]
    fn test_compare_large_integers() {
        let a = Value::Integer(9_007_199_254_740_992);
        let b = Value::Integer(9_007_199_254_740_993);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
        assert_eq!(b.compare(&Value::String("9007199254740993".into())), Ordering::Equal);
        assert_eq!(a.compare(&Value::String("9007199254740993".into())), Ordering::Less);
        assert_eq!(Value::Integer(i64::MAX).compare(&Value::Integer(i64::MAX - 1)), Ordering::Greater);
    }

    #[test]
    fn test_non_finite_text_is_not_numeric() {
        assert_eq!(Value::String("nan".into()).as_number(), None);
        assert_eq!(Value::String("Infinity".into()).as_number(), None);
        assert_eq!(Value::String("-inf".into()).as_number(), None);
        // compared as text, like any other non-numeric string
        assert_eq!(Value::String("nan".into()).compare(&Value::Integer(5)), Ordering::Greater);
        assert_eq!(Value::String("inf".into()).compare(&Value::String("j".into())), Ordering::Less);
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("Alice", "A%"));
        assert!(!like_match("Bob", "A%"));
        assert!(like_match("Alice", "%ic%"));
        assert!(like_match("Alice", "Al_ce"));
        assert!(!like_match("Alice", "Al_"));
        assert!(like_match("", "%"));
        assert!(!like_match("", "_"));
        assert!(like_match("a.c", "a.c"));
        assert!(!like_match("abc", "a.c"));
        // case-sensitive
        assert!(!like_match("alice", "A%"));
        assert!(like_match("abcabd", "%ab_"));
        assert!(like_match("xaay", "%a%y"));
        assert!(!like_match("xaay", "%a%z"));
        assert!(like_match("abc", "a%%c"));

        // many wildcards over long text finish quickly
        let text = "a".repeat(10_000);
        assert!(!like_match(&text, "%a%a%a%a%a%a%a%a%b"));
        assert!(like_match(&format!("{}b", text), "%a%a%a%a%a%a%a%a%b"));
    }

    #[test]
    fn test_datatype_from_name() {
        assert_eq!(DataType::from_name("int"), Some(DataType::Integer));
        assert_eq!(DataType::from_name("Varchar"), Some(DataType::Varchar));
        assert_eq!(DataType::from_name("bool"), Some(DataType::Boolean));
        assert_eq!(DataType::from_name("float"), None);
    }

    #[test]
    fn test_value_json() {
        let row = vec![
            Value::Integer(1),
            Value::String("Alice".into()),
            Value::Boolean(true),
            Value::Null,
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[1,"Alice",true,null]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
