//! Call-time dispatch from synthesized engine callables into native code.
//!
//! Every failure on this path is fail-soft: the script receives `undefined`
//! and the reporter latches the error for the host to poll. A script call
//! never observes a thrown exception from the bridge itself.

use jsbind_core::{
    CallTarget, CallbackContext, DispatchError, ErrorReporter, HostError, MAX_CALL_ARGS,
    MethodDescriptor, SemanticType, Severity, coerce_argument,
};
use rquickjs::{Ctx, Value};

use crate::convert::{to_native, to_script};

/// Entry point for a synthesized method callable.
pub fn dispatch_method<'js>(
    ctx: &Ctx<'js>,
    reporter: &ErrorReporter,
    call: &CallbackContext,
    args: &[Value<'js>],
) -> rquickjs::Result<Value<'js>> {
    let CallTarget::Method(descriptor) = &call.target else {
        // Installation wires method contexts to method callables; an
        // accessor context here means the wiring is broken.
        soft_fail(
            reporter,
            Severity::Critical,
            DispatchError::UnknownMethod {
                method: call.exposed_name.clone(),
            }
            .into(),
        );
        return Ok(Value::new_undefined(ctx.clone()));
    };

    match run_method(ctx, reporter, call, descriptor, args) {
        Ok(value) => Ok(value),
        Err(Failure::Reported) => Ok(Value::new_undefined(ctx.clone())),
        Err(Failure::Engine(e)) => Err(e),
    }
}

/// Entry point for the internal property-read callable.
pub fn dispatch_get<'js>(
    ctx: &Ctx<'js>,
    reporter: &ErrorReporter,
    call: &CallbackContext,
    args: &[Value<'js>],
) -> rquickjs::Result<Value<'js>> {
    let Some(name) = property_name(args) else {
        return Ok(Value::new_undefined(ctx.clone()));
    };
    if let Some(declared) = declared_property(call, &name) {
        if !declared.readable {
            soft_fail(
                reporter,
                Severity::Warning,
                DispatchError::PropertyNotReadable { property: name }.into(),
            );
            return Ok(Value::new_undefined(ctx.clone()));
        }
    }
    let Some(object) = live_object(reporter, call) else {
        return Ok(Value::new_undefined(ctx.clone()));
    };

    let value = object.borrow().get_property(&name);
    tracing::debug!(object = %call.exposed_name, property = %name, "fallback read");
    to_script(ctx, &value)
}

/// Entry point for the internal property-write callable.
pub fn dispatch_set<'js>(
    ctx: &Ctx<'js>,
    reporter: &ErrorReporter,
    call: &CallbackContext,
    args: &[Value<'js>],
) -> rquickjs::Result<Value<'js>> {
    let undefined = Value::new_undefined(ctx.clone());
    let Some(name) = property_name(args) else {
        return Ok(undefined);
    };
    if let Some(declared) = declared_property(call, &name) {
        if !declared.writable {
            soft_fail(
                reporter,
                Severity::Warning,
                DispatchError::PropertyNotWritable { property: name }.into(),
            );
            return Ok(undefined);
        }
    }
    let Some(object) = live_object(reporter, call) else {
        return Ok(undefined);
    };

    let raw = args.get(1).cloned().unwrap_or_else(|| undefined.clone());
    match to_native(ctx, &raw) {
        Ok(value) => {
            tracing::debug!(object = %call.exposed_name, property = %name, "fallback write");
            object.borrow_mut().set_property(&name, value);
        }
        Err(e) => soft_fail(reporter, Severity::Warning, e.into()),
    }
    Ok(undefined)
}

enum Failure {
    /// Already latched; the caller substitutes `undefined`.
    Reported,
    /// The engine itself faulted; propagate so it can unwind normally.
    Engine(rquickjs::Error),
}

impl From<rquickjs::Error> for Failure {
    fn from(e: rquickjs::Error) -> Self {
        Failure::Engine(e)
    }
}

fn run_method<'js>(
    ctx: &Ctx<'js>,
    reporter: &ErrorReporter,
    call: &CallbackContext,
    descriptor: &MethodDescriptor,
    args: &[Value<'js>],
) -> Result<Value<'js>, Failure> {
    // Slot budget first, before any conversion work.
    if args.len() > MAX_CALL_ARGS {
        soft_fail(
            reporter,
            Severity::Warning,
            DispatchError::ArityOverflow {
                method: descriptor.name.clone(),
                actual: args.len(),
                limit: MAX_CALL_ARGS,
            }
            .into(),
        );
        return Err(Failure::Reported);
    }

    if args.len() != descriptor.arity() {
        soft_fail(
            reporter,
            Severity::Warning,
            DispatchError::ArityMismatch {
                method: descriptor.name.clone(),
                expected: descriptor.arity(),
                actual: args.len(),
            }
            .into(),
        );
        return Err(Failure::Reported);
    }

    let mut coerced = Vec::with_capacity(args.len());
    for (index, (raw, target)) in args.iter().zip(&descriptor.params).enumerate() {
        let native = match to_native(ctx, raw) {
            Ok(v) => v,
            Err(e) => {
                soft_fail(reporter, Severity::Warning, e.into());
                return Err(Failure::Reported);
            }
        };
        match coerce_argument(&native, *target) {
            Ok(v) => coerced.push(v),
            Err(e) => {
                soft_fail(
                    reporter,
                    Severity::Warning,
                    DispatchError::Coercion {
                        method: descriptor.name.clone(),
                        index,
                        source: e,
                    }
                    .into(),
                );
                return Err(Failure::Reported);
            }
        }
    }

    let Some(object) = live_object(reporter, call) else {
        return Err(Failure::Reported);
    };

    tracing::debug!(
        object = %call.exposed_name,
        method = %descriptor.name,
        argc = coerced.len(),
        "dispatching call"
    );

    let result = object.borrow_mut().invoke(&descriptor.name, &coerced);
    match result {
        Ok(value) => {
            if descriptor.returns == SemanticType::Void {
                Ok(Value::new_undefined(ctx.clone()))
            } else {
                Ok(to_script(ctx, &value)?)
            }
        }
        Err(e) => {
            soft_fail(reporter, Severity::Warning, e.into());
            Err(Failure::Reported)
        }
    }
}

/// Upgrade the weak handle; a dead handle is a Critical report.
fn live_object(
    reporter: &ErrorReporter,
    call: &CallbackContext,
) -> Option<jsbind_core::SharedObject> {
    match call.upgrade() {
        Some(object) => Some(object),
        None => {
            soft_fail(
                reporter,
                Severity::Critical,
                DispatchError::ObjectGone {
                    name: call.exposed_name.clone(),
                }
                .into(),
            );
            None
        }
    }
}

/// First argument as a property name; symbol keys yield `None`.
fn property_name(args: &[Value<'_>]) -> Option<String> {
    args.first().and_then(|v| v.get::<String>().ok())
}

/// The catalog declaration for `name`, if the accessor context carries one.
/// Undeclared names resolve dynamically and carry no access restrictions.
fn declared_property<'a>(
    call: &'a CallbackContext,
    name: &str,
) -> Option<&'a jsbind_core::PropertyDescriptor> {
    match &call.target {
        CallTarget::Accessor(properties) => properties.iter().find(|p| p.name == name),
        CallTarget::Method(_) => None,
    }
}

/// Latch and log without raising into the script. The reporter's raise
/// policy applies to host-facing operations; in-call failures always
/// degrade to `undefined`.
fn soft_fail(reporter: &ErrorReporter, severity: Severity, error: HostError) {
    let _ = reporter.report(severity, error);
}
