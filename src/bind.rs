//! Registration-time synthesis of script-callable objects.
//!
//! For each registered object this module builds the raw engine object
//! (one callable per catalog method plus the internal accessor pair), wraps
//! it in the property trap, and publishes the proxy under the exposed name
//! in the global namespace.
//!
//! Callable closures capture a bridge-owned [`CallbackContext`]; the engine
//! keeps the closure (and so the context) alive until it reclaims the
//! function object.

use std::rc::Rc;

use jsbind_core::{CallTarget, CallbackContext, ClassCatalog, ErrorReporter, ObjectHandle};
use rquickjs::{Ctx, Function, Object, Value, function::Rest};

use crate::thunk;
use crate::trap::{self, ACCESSOR_GET, ACCESSOR_SET};

/// Build and publish the proxy for one object. The catalog has already been
/// validated and the exposed name checked for collisions.
pub fn install_object<'js>(
    ctx: &Ctx<'js>,
    reporter: &Rc<ErrorReporter>,
    handle: &ObjectHandle,
    exposed_name: &str,
    catalog: &ClassCatalog,
) -> rquickjs::Result<()> {
    let target = Object::new(ctx.clone())?;

    for descriptor in catalog.methods() {
        let call = Rc::new(CallbackContext::new(
            handle.clone(),
            exposed_name,
            CallTarget::Method(descriptor.clone()),
        ));
        let reporter = reporter.clone();
        let callable = Function::new(ctx.clone(), move |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
            thunk::dispatch_method(&ctx, &reporter, &call, &args.0)
        })?;
        target.set(descriptor.name.as_str(), callable)?;
    }

    let accessor = Rc::new(CallbackContext::new(
        handle.clone(),
        exposed_name,
        CallTarget::Accessor(catalog.properties().to_vec()),
    ));

    let call = accessor.clone();
    let rep = reporter.clone();
    let getter = Function::new(ctx.clone(), move |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
        thunk::dispatch_get(&ctx, &rep, &call, &args.0)
    })?;
    target.set(ACCESSOR_GET, getter)?;

    let call = accessor;
    let rep = reporter.clone();
    let setter = Function::new(ctx.clone(), move |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
        thunk::dispatch_set(&ctx, &rep, &call, &args.0)
    })?;
    target.set(ACCESSOR_SET, setter)?;

    let handler = trap::build_handler(ctx)?;
    let proxy = wrap_in_proxy(ctx, &target, &handler)?;
    ctx.globals().set(exposed_name, proxy)?;

    tracing::debug!(
        name = exposed_name,
        methods = catalog.methods().len(),
        properties = catalog.properties().len(),
        "registered object"
    );
    Ok(())
}

/// `new Proxy(target, handler)` via a one-shot factory function; the trap
/// logic itself stays native.
fn wrap_in_proxy<'js>(
    ctx: &Ctx<'js>,
    target: &Object<'js>,
    handler: &Object<'js>,
) -> rquickjs::Result<Value<'js>> {
    let factory: Function = ctx.eval("(t, h) => new Proxy(t, h)")?;
    factory.call((target.clone(), handler.clone()))
}
