//! The engine-independent value model.
//!
//! [`GenericValue`] is the tagged union every value crosses the bridge as,
//! in either direction. It covers the tags both sides can represent without
//! loss (null, undefined, bool, number, string, list, map) plus
//! [`GenericValue::Unsupported`], which carries a short sentinel naming an
//! engine tag that has no native counterpart (functions, symbols, binary
//! buffers, and so on).
//!
//! Equality is structural: list order is significant, map key order is not.

use rustc_hash::FxHashMap;

/// A dynamically typed value shared between the host and the script engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenericValue {
    /// The engine's `null`.
    Null,
    /// The engine's `undefined`. Also the sentinel returned by failed calls.
    #[default]
    Undefined,
    Bool(bool),
    /// All numbers are carried as `f64`, matching the engine's number model.
    Number(f64),
    String(String),
    List(Vec<GenericValue>),
    Map(FxHashMap<String, GenericValue>),
    /// An engine value that cannot be represented natively. The payload is a
    /// deterministic sentinel such as `"[FUNCTION]"` or `"[SYMBOL]"`.
    Unsupported(String),
}

impl GenericValue {
    /// Build a map value from key/value pairs.
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, GenericValue)>,
    {
        GenericValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect::<FxHashMap<_, _>>(),
        )
    }

    /// Tag name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            GenericValue::Null => "null",
            GenericValue::Undefined => "undefined",
            GenericValue::Bool(_) => "bool",
            GenericValue::Number(_) => "number",
            GenericValue::String(_) => "string",
            GenericValue::List(_) => "list",
            GenericValue::Map(_) => "map",
            GenericValue::Unsupported(_) => "unsupported",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, GenericValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GenericValue::Null)
    }

    /// The number payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            GenericValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GenericValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GenericValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[GenericValue]> {
        match self {
            GenericValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FxHashMap<String, GenericValue>> {
        match self {
            GenericValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

// ============================================================================
// Construction conveniences
// ============================================================================

impl From<bool> for GenericValue {
    fn from(v: bool) -> Self {
        GenericValue::Bool(v)
    }
}

impl From<f64> for GenericValue {
    fn from(v: f64) -> Self {
        GenericValue::Number(v)
    }
}

impl From<i32> for GenericValue {
    fn from(v: i32) -> Self {
        GenericValue::Number(v as f64)
    }
}

impl From<&str> for GenericValue {
    fn from(v: &str) -> Self {
        GenericValue::String(v.to_string())
    }
}

impl From<String> for GenericValue {
    fn from(v: String) -> Self {
        GenericValue::String(v)
    }
}

impl From<Vec<GenericValue>> for GenericValue {
    fn from(v: Vec<GenericValue>) -> Self {
        GenericValue::List(v)
    }
}

impl<T: Into<GenericValue>> From<Option<T>> for GenericValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => GenericValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_undefined() {
        assert_eq!(GenericValue::default(), GenericValue::Undefined);
    }

    #[test]
    fn structural_equality_ignores_map_order() {
        let a = GenericValue::map([("x", 1.0.into()), ("y", 2.0.into())]);
        let b = GenericValue::map([("y", 2.0.into()), ("x", 1.0.into())]);
        assert_eq!(a, b);
    }

    #[test]
    fn list_order_is_significant() {
        let a = GenericValue::from(vec![1.0.into(), 2.0.into()]);
        let b = GenericValue::from(vec![2.0.into(), 1.0.into()]);
        assert_ne!(a, b);
    }

    #[test]
    fn from_impls() {
        assert_eq!(GenericValue::from(3), GenericValue::Number(3.0));
        assert_eq!(GenericValue::from(true), GenericValue::Bool(true));
        assert_eq!(
            GenericValue::from("hi"),
            GenericValue::String("hi".to_string())
        );
        assert_eq!(GenericValue::from(None::<f64>), GenericValue::Null);
    }

    #[test]
    fn type_names() {
        assert_eq!(GenericValue::Null.type_name(), "null");
        assert_eq!(GenericValue::Number(0.0).type_name(), "number");
        assert_eq!(
            GenericValue::Unsupported("[FUNCTION]".into()).type_name(),
            "unsupported"
        );
    }
}
