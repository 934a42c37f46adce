//! Argument coercion for call dispatch.
//!
//! Declared parameter types are checked in a fixed priority order:
//! `Int`, `Double`, `Bool`, `String`. A value whose tag already matches the
//! declared type passes through unchanged (`Int` still truncates, since the
//! value model only carries `f64`); otherwise the single coercion for that
//! declared type is attempted, and failure is a
//! [`ConversionError::TypeMismatch`]. `List` and `Map` parameters accept
//! only their exact tags.
//!
//! Coercion is silent on success. `3.9` passed where an `Int` is declared
//! arrives as `3`; truncation is toward zero.

use crate::descriptor::SemanticType;
use crate::error::ConversionError;
use crate::value::GenericValue;

/// Coerce one argument to its declared parameter type.
pub fn coerce_argument(
    value: &GenericValue,
    target: SemanticType,
) -> Result<GenericValue, ConversionError> {
    match target {
        SemanticType::Int => coerce_int(value),
        SemanticType::Double => coerce_double(value),
        SemanticType::Bool => coerce_bool(value),
        SemanticType::String => coerce_string(value),
        SemanticType::List => match value {
            GenericValue::List(_) => Ok(value.clone()),
            other => Err(mismatch("list", other)),
        },
        SemanticType::Map => match value {
            GenericValue::Map(_) => Ok(value.clone()),
            other => Err(mismatch("map", other)),
        },
        // Void is a return type; nothing coerces to it.
        SemanticType::Void => Err(mismatch("void", value)),
    }
}

fn mismatch(expected: &'static str, actual: &GenericValue) -> ConversionError {
    ConversionError::TypeMismatch {
        expected,
        actual: actual.type_name(),
    }
}

fn coerce_int(value: &GenericValue) -> Result<GenericValue, ConversionError> {
    match value {
        GenericValue::Number(n) if n.is_finite() => Ok(GenericValue::Number(n.trunc())),
        GenericValue::Bool(b) => Ok(GenericValue::Number(if *b { 1.0 } else { 0.0 })),
        GenericValue::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(GenericValue::Number(n.trunc())),
            _ => Err(mismatch("int", value)),
        },
        other => Err(mismatch("int", other)),
    }
}

fn coerce_double(value: &GenericValue) -> Result<GenericValue, ConversionError> {
    match value {
        GenericValue::Number(n) => Ok(GenericValue::Number(*n)),
        GenericValue::Bool(b) => Ok(GenericValue::Number(if *b { 1.0 } else { 0.0 })),
        GenericValue::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => Ok(GenericValue::Number(n)),
            Err(_) => Err(mismatch("double", value)),
        },
        other => Err(mismatch("double", other)),
    }
}

fn coerce_bool(value: &GenericValue) -> Result<GenericValue, ConversionError> {
    match value {
        GenericValue::Bool(b) => Ok(GenericValue::Bool(*b)),
        GenericValue::Number(n) => Ok(GenericValue::Bool(*n != 0.0 && !n.is_nan())),
        GenericValue::String(s) => {
            let truthy = !(s.is_empty() || s == "false" || s == "0");
            Ok(GenericValue::Bool(truthy))
        }
        other => Err(mismatch("bool", other)),
    }
}

fn coerce_string(value: &GenericValue) -> Result<GenericValue, ConversionError> {
    match value {
        GenericValue::String(s) => Ok(GenericValue::String(s.clone())),
        GenericValue::Number(n) => Ok(GenericValue::String(format_number(*n))),
        GenericValue::Bool(b) => Ok(GenericValue::String(b.to_string())),
        other => Err(mismatch("string", other)),
    }
}

/// Integral numbers print without a trailing `.0` so `echo(5)` observes
/// `"5"`, matching what the script side would produce.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_truncates_toward_zero() {
        assert_eq!(
            coerce_argument(&GenericValue::Number(3.9), SemanticType::Int),
            Ok(GenericValue::Number(3.0))
        );
        assert_eq!(
            coerce_argument(&GenericValue::Number(-3.9), SemanticType::Int),
            Ok(GenericValue::Number(-3.0))
        );
    }

    #[test]
    fn int_from_bool_and_string() {
        assert_eq!(
            coerce_argument(&GenericValue::Bool(true), SemanticType::Int),
            Ok(GenericValue::Number(1.0))
        );
        assert_eq!(
            coerce_argument(&"42".into(), SemanticType::Int),
            Ok(GenericValue::Number(42.0))
        );
        assert!(coerce_argument(&"not a number".into(), SemanticType::Int).is_err());
    }

    #[test]
    fn int_rejects_non_finite() {
        assert!(coerce_argument(&GenericValue::Number(f64::NAN), SemanticType::Int).is_err());
        assert!(coerce_argument(&GenericValue::Number(f64::INFINITY), SemanticType::Int).is_err());
    }

    #[test]
    fn double_passes_numbers_through() {
        assert_eq!(
            coerce_argument(&GenericValue::Number(3.9), SemanticType::Double),
            Ok(GenericValue::Number(3.9))
        );
    }

    #[test]
    fn bool_from_number_and_string() {
        assert_eq!(
            coerce_argument(&GenericValue::Number(0.0), SemanticType::Bool),
            Ok(GenericValue::Bool(false))
        );
        assert_eq!(
            coerce_argument(&GenericValue::Number(f64::NAN), SemanticType::Bool),
            Ok(GenericValue::Bool(false))
        );
        assert_eq!(
            coerce_argument(&"false".into(), SemanticType::Bool),
            Ok(GenericValue::Bool(false))
        );
        assert_eq!(
            coerce_argument(&"yes".into(), SemanticType::Bool),
            Ok(GenericValue::Bool(true))
        );
    }

    #[test]
    fn string_from_number_drops_integral_fraction() {
        assert_eq!(
            coerce_argument(&GenericValue::Number(5.0), SemanticType::String),
            Ok(GenericValue::String("5".to_string()))
        );
        assert_eq!(
            coerce_argument(&GenericValue::Number(2.5), SemanticType::String),
            Ok(GenericValue::String("2.5".to_string()))
        );
    }

    #[test]
    fn containers_require_exact_tags() {
        assert!(coerce_argument(&GenericValue::Number(1.0), SemanticType::List).is_err());
        assert!(coerce_argument(&GenericValue::map([("k", 1.0.into())]), SemanticType::Map).is_ok());
        assert!(coerce_argument(&GenericValue::map([("k", 1.0.into())]), SemanticType::List).is_err());
    }

    #[test]
    fn null_and_undefined_never_coerce() {
        for target in [
            SemanticType::Int,
            SemanticType::Double,
            SemanticType::Bool,
            SemanticType::String,
        ] {
            assert!(coerce_argument(&GenericValue::Null, target).is_err());
            assert!(coerce_argument(&GenericValue::Undefined, target).is_err());
        }
    }
}
