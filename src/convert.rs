//! Conversion between [`GenericValue`] and engine values.
//!
//! Conversion is total for the safe tags in both directions. Engine tags
//! with no native counterpart never fail the conversion; they degrade to
//! [`GenericValue::Unsupported`] carrying one of the sentinel strings below,
//! so a host reading a global that happens to hold a function sees
//! `"[FUNCTION]"` rather than an error.
//!
//! Objects convert by their own enumerable string keys only; the prototype
//! chain is never walked. Arrays convert by index, preserving order.

use jsbind_core::{ConversionError, GenericValue};
use rquickjs::{Array, Ctx, Object, Value};

pub const FUNCTION_SENTINEL: &str = "[FUNCTION]";
pub const SYMBOL_SENTINEL: &str = "[SYMBOL]";
pub const ERROR_SENTINEL: &str = "[ERROR]";
pub const ARRAY_BUFFER_SENTINEL: &str = "[ARRAYBUFFER]";
pub const DATA_VIEW_SENTINEL: &str = "[DATAVIEW]";
pub const TYPED_ARRAY_SENTINEL: &str = "[TYPEDARRAY]";

/// Materialise a native value in the engine.
///
/// `Unsupported` cannot be materialised; it logs a warning and yields
/// `undefined` so an otherwise convertible aggregate still goes through.
pub fn to_script<'js>(ctx: &Ctx<'js>, value: &GenericValue) -> rquickjs::Result<Value<'js>> {
    match value {
        GenericValue::Null => Ok(Value::new_null(ctx.clone())),
        GenericValue::Undefined => Ok(Value::new_undefined(ctx.clone())),
        GenericValue::Bool(b) => Ok(Value::new_bool(ctx.clone(), *b)),
        GenericValue::Number(n) => Ok(Value::new_number(ctx.clone(), *n)),
        GenericValue::String(s) => Ok(rquickjs::String::from_str(ctx.clone(), s)?.into_value()),
        GenericValue::List(items) => {
            let array = Array::new(ctx.clone())?;
            for (index, item) in items.iter().enumerate() {
                array.set(index, to_script(ctx, item)?)?;
            }
            Ok(array.into_value())
        }
        GenericValue::Map(entries) => {
            let object = Object::new(ctx.clone())?;
            for (key, entry) in entries {
                object.set(key.as_str(), to_script(ctx, entry)?)?;
            }
            Ok(object.into_value())
        }
        GenericValue::Unsupported(tag) => {
            tracing::warn!(tag, "cannot materialise unsupported value, using undefined");
            Ok(Value::new_undefined(ctx.clone()))
        }
    }
}

/// Read an engine value into the native model.
pub fn to_native<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> Result<GenericValue, ConversionError> {
    use rquickjs::Type;

    match value.type_of() {
        Type::Uninitialized | Type::Undefined => Ok(GenericValue::Undefined),
        Type::Null => Ok(GenericValue::Null),
        Type::Bool => Ok(GenericValue::Bool(value.as_bool().unwrap_or(false))),
        Type::Int | Type::Float => value
            .get::<f64>()
            .map(GenericValue::Number)
            .map_err(|e| ConversionError::Engine(e.to_string())),
        Type::String => value
            .get::<String>()
            .map(GenericValue::String)
            .map_err(|e| ConversionError::Engine(e.to_string())),
        Type::Symbol => Ok(GenericValue::Unsupported(SYMBOL_SENTINEL.to_string())),
        Type::Function | Type::Constructor => {
            Ok(GenericValue::Unsupported(FUNCTION_SENTINEL.to_string()))
        }
        Type::Exception => Ok(GenericValue::Unsupported(ERROR_SENTINEL.to_string())),
        Type::Array => match value.as_array() {
            Some(array) => array_to_native(ctx, array),
            None => Err(ConversionError::Engine("array tag without array".to_string())),
        },
        // Everything else is either object-like (promises, plain objects
        // with exotic classes) or a tag with no native shape at all, which
        // degrades to a sentinel named after the tag (e.g. "[BIGINT]").
        _ => match value.as_object() {
            Some(object) => object_to_native(ctx, object),
            None => Ok(GenericValue::Unsupported(format!(
                "[{}]",
                format!("{:?}", value.type_of()).to_uppercase()
            ))),
        },
    }
}

fn array_to_native<'js>(
    ctx: &Ctx<'js>,
    array: &Array<'js>,
) -> Result<GenericValue, ConversionError> {
    let len = array.len();
    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        let element: Value = array.get(index).map_err(|e| ConversionError::ElementRead {
            index: index as u32,
            reason: e.to_string(),
        })?;
        items.push(to_native(ctx, &element)?);
    }
    Ok(GenericValue::List(items))
}

fn object_to_native<'js>(
    ctx: &Ctx<'js>,
    object: &Object<'js>,
) -> Result<GenericValue, ConversionError> {
    if let Some(sentinel) = special_sentinel(object) {
        return Ok(GenericValue::Unsupported(sentinel.to_string()));
    }

    let mut entries = rustc_hash::FxHashMap::default();
    for key in object.keys::<String>() {
        let key = key.map_err(|e| ConversionError::Engine(e.to_string()))?;
        let entry: Value = object.get(&key).map_err(|e| ConversionError::PropertyRead {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        entries.insert(key, to_native(ctx, &entry)?);
    }
    Ok(GenericValue::Map(entries))
}

/// Classify binary buffers and error instances by constructor name. These
/// all carry the generic object tag, so the runtime type alone cannot tell
/// them apart from plain objects.
fn special_sentinel(object: &Object<'_>) -> Option<&'static str> {
    let constructor: Object = object.get("constructor").ok()?;
    let name: String = constructor.get("name").ok()?;
    match name.as_str() {
        "ArrayBuffer" | "SharedArrayBuffer" => Some(ARRAY_BUFFER_SENTINEL),
        "DataView" => Some(DATA_VIEW_SENTINEL),
        "Int8Array" | "Uint8Array" | "Uint8ClampedArray" | "Int16Array" | "Uint16Array"
        | "Int32Array" | "Uint32Array" | "Float32Array" | "Float64Array" | "BigInt64Array"
        | "BigUint64Array" => Some(TYPED_ARRAY_SENTINEL),
        "Error" | "TypeError" | "RangeError" | "SyntaxError" | "ReferenceError" | "EvalError"
        | "URIError" => Some(ERROR_SENTINEL),
        _ => None,
    }
}
