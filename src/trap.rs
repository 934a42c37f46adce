//! The property trap installed around every registered object.
//!
//! Registered objects are published as `new Proxy(raw, handler)` where the
//! handler's `get` and `set` are the native trap functions below. Members
//! synthesized on the raw target (method callables and the two internal
//! accessors) short-circuit; everything else forwards to the object's
//! native accessor pair, so undeclared properties resolve dynamically.
//!
//! Shadowing is blocked: a write to a name the raw target owns is a silent
//! no-op, so a script cannot replace a synthesized method. Symbol keys have
//! no native counterpart and read as `undefined`.

use rquickjs::{Ctx, Function, Object, Value, function::Rest};

/// Internal read accessor installed on the raw target.
pub const ACCESSOR_GET: &str = "__jb_get";
/// Internal write accessor installed on the raw target.
pub const ACCESSOR_SET: &str = "__jb_set";

/// Build the handler object with native `get`/`set` traps.
pub fn build_handler<'js>(ctx: &Ctx<'js>) -> rquickjs::Result<Object<'js>> {
    let handler = Object::new(ctx.clone())?;

    let get = Function::new(ctx.clone(), move |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
        trap_get(ctx, args.0)
    })?;
    handler.set("get", get)?;

    let set = Function::new(ctx.clone(), move |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
        trap_set(ctx, args.0)
    })?;
    handler.set("set", set)?;

    Ok(handler)
}

/// `get(target, key)`: own members win, everything else goes to the native
/// read accessor.
fn trap_get<'js>(ctx: Ctx<'js>, args: Vec<Value<'js>>) -> rquickjs::Result<Value<'js>> {
    let undefined = Value::new_undefined(ctx.clone());
    let Some(target) = args.first().and_then(|v| v.as_object()).cloned() else {
        return Ok(undefined);
    };
    let Some(key) = args.get(1) else {
        return Ok(undefined);
    };
    let Ok(name) = key.get::<String>() else {
        // Symbol key.
        return Ok(undefined);
    };

    if has_own(&target, &name) {
        return target.get::<_, Value>(name.as_str());
    }

    let getter: Function = target.get(ACCESSOR_GET)?;
    getter.call((name,))
}

/// `set(target, key, value)`: own members are write-protected, everything
/// else goes to the native write accessor. Always reports success to the
/// engine; failed writes are latched out-of-band.
fn trap_set<'js>(ctx: Ctx<'js>, args: Vec<Value<'js>>) -> rquickjs::Result<Value<'js>> {
    let ok = Value::new_bool(ctx.clone(), true);
    let Some(target) = args.first().and_then(|v| v.as_object()).cloned() else {
        return Ok(ok);
    };
    let Some(key) = args.get(1) else {
        return Ok(ok);
    };
    let Ok(name) = key.get::<String>() else {
        return Ok(ok);
    };

    if has_own(&target, &name) {
        return Ok(ok);
    }

    let value = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| Value::new_undefined(ctx.clone()));
    let setter: Function = target.get(ACCESSOR_SET)?;
    setter.call::<_, Value>((name, value))?;
    Ok(ok)
}

/// Own enumerable membership on the raw target. Synthesized members are
/// all installed as own enumerable properties.
fn has_own(target: &Object<'_>, name: &str) -> bool {
    target
        .keys::<String>()
        .filter_map(|k| k.ok())
        .any(|k| k == name)
}
