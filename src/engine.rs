//! The script host: engine lifecycle and the embedding-facing API.
//!
//! [`ScriptHost`] owns one QuickJS runtime and context, the per-host object
//! registry, and the error reporter. Hosts are single-threaded by
//! construction (the engine handles are not `Send`); one host per thread is
//! the intended shape, with no shared state between hosts.
//!
//! Every public operation clears the error latch on entry, so
//! [`error_encountered`](ScriptHost::error_encountered) always describes the
//! most recent operation only.

use std::cell::RefCell;
use std::rc::Rc;

use jsbind_core::{
    ConversionError, ErrorReporter, FailurePolicy, GenericValue, HostError, ObjectRegistry,
    RegisteredObject, RegistrationError, ScriptClass, Severity, SharedObject, format_number,
};
use rquickjs::context::EvalOptions;
use rquickjs::{Context, Ctx, Runtime, Value};

use crate::bind;
use crate::convert::{to_native, to_script};

/// Construction-time host configuration.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub failure_policy: FailurePolicy,
    /// Engine heap budget in bytes; unlimited when `None`.
    pub memory_limit: Option<usize>,
    /// Engine stack budget in bytes; the engine default when `None`.
    pub max_stack_size: Option<usize>,
}

/// One embedded engine instance plus the bridge state around it.
pub struct ScriptHost {
    // Keeps the engine alive for the context's lifetime.
    runtime: Runtime,
    context: Context,
    registry: RefCell<ObjectRegistry>,
    reporter: Rc<ErrorReporter>,
}

impl ScriptHost {
    pub fn new() -> Result<Self, HostError> {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Result<Self, HostError> {
        let runtime = Runtime::new().map_err(|e| HostError::Init(e.to_string()))?;
        if let Some(limit) = config.memory_limit {
            runtime.set_memory_limit(limit);
        }
        if let Some(size) = config.max_stack_size {
            runtime.set_max_stack_size(size);
        }
        let context = Context::full(&runtime).map_err(|e| HostError::Init(e.to_string()))?;

        tracing::debug!(
            memory_limit = ?config.memory_limit,
            max_stack_size = ?config.max_stack_size,
            "engine ready"
        );

        Ok(Self {
            runtime,
            context,
            registry: RefCell::new(ObjectRegistry::new()),
            reporter: Rc::new(ErrorReporter::new(config.failure_policy)),
        })
    }

    /// Expose a host object to scripts under `name`.
    ///
    /// The embedding code keeps exclusive ownership of the instance; the
    /// bridge holds a weak handle only. Registration is all-or-nothing: a
    /// rejected catalog or a name collision leaves both the engine and the
    /// registry untouched.
    pub fn register<T>(&self, object: &Rc<RefCell<T>>, name: &str) -> Result<(), HostError>
    where
        T: ScriptClass + 'static,
    {
        self.reporter.clear();

        if name.is_empty() {
            return Err(self.hard_fail(Severity::Warning, RegistrationError::EmptyName.into()));
        }

        let shared: SharedObject = object.clone();
        let catalog = shared.borrow().catalog();
        if let Err(e) = catalog.validate() {
            return Err(self.hard_fail(Severity::Warning, e.into()));
        }
        if self.registry.borrow().contains(name) {
            return Err(self.hard_fail(
                Severity::Warning,
                RegistrationError::DuplicateName(name.to_string()).into(),
            ));
        }

        let handle = Rc::downgrade(&shared);
        self.context
            .with(|ctx| bind::install_object(&ctx, &self.reporter, &handle, name, &catalog))
            .map_err(|e| {
                self.hard_fail(
                    Severity::Critical,
                    ConversionError::Engine(e.to_string()).into(),
                )
            })?;

        let entry = RegisteredObject {
            exposed_name: name.to_string(),
            handle,
            catalog,
        };
        // Collision was checked above; insert cannot fail here.
        self.registry
            .borrow_mut()
            .insert(entry)
            .map_err(|e| self.hard_fail(Severity::Warning, e.into()))?;
        Ok(())
    }

    /// Publish a plain value as a global. Re-publishing overwrites.
    pub fn register_value(&self, name: &str, value: &GenericValue) -> Result<(), HostError> {
        self.reporter.clear();

        if name.is_empty() {
            return Err(self.hard_fail(Severity::Warning, RegistrationError::EmptyName.into()));
        }

        self.context
            .with(|ctx| -> rquickjs::Result<()> {
                let script_value = to_script(&ctx, value)?;
                ctx.globals().set(name, script_value)
            })
            .map_err(|e| {
                self.hard_fail(
                    Severity::Critical,
                    ConversionError::Engine(e.to_string()).into(),
                )
            })
    }

    /// Run a script and convert its completion value.
    ///
    /// `file_name` is diagnostic only; it prefixes exception messages and
    /// log events. A script exception is handled per the failure policy:
    /// under [`FailurePolicy::Latch`] the call yields `Undefined` and the
    /// error latches, under [`FailurePolicy::Raise`] it returns `Err`.
    pub fn evaluate(&self, source: &str, file_name: &str) -> Result<GenericValue, HostError> {
        self.reporter.clear();
        tracing::debug!(file = file_name, bytes = source.len(), "evaluating");

        let mut options = EvalOptions::default();
        options.strict = false;
        self.context
            .with(|ctx| match ctx.eval_with_options::<Value, _>(source, options) {
            Ok(value) => match to_native(&ctx, &value) {
                Ok(native) => Ok(native),
                Err(e) => self.soft_fail(Severity::Warning, e.into()),
            },
            Err(rquickjs::Error::Exception) => {
                let caught = ctx.catch();
                let message = format!(
                    "{file_name}: {}",
                    exception_message(&ctx, &self.reporter, &caught)
                );
                self.soft_fail(Severity::Warning, HostError::Exception { message })
            }
            Err(e) => self.soft_fail(
                Severity::Critical,
                ConversionError::Engine(e.to_string()).into(),
            ),
        })
    }

    /// Read a global by name. `None` when no such global exists; a global
    /// that exists but holds a value with no native counterpart reads as
    /// its sentinel. An engine fault while reading latches a Warning and
    /// yields `None`, with the latch distinguishing it from absence.
    pub fn value(&self, name: &str) -> Option<GenericValue> {
        self.reporter.clear();
        self.context.with(|ctx| {
            let globals = ctx.globals();
            let present = globals
                .keys::<String>()
                .filter_map(|k| k.ok())
                .any(|k| k == name);
            if !present {
                return None;
            }
            let value: Value = match globals.get(name) {
                Ok(v) => v,
                Err(e) => {
                    let _ = self.reporter.report(
                        Severity::Warning,
                        ConversionError::PropertyRead {
                            name: name.to_string(),
                            reason: e.to_string(),
                        }
                        .into(),
                    );
                    return None;
                }
            };
            match to_native(&ctx, &value) {
                Ok(native) => Some(native),
                Err(e) => {
                    let _ = self.reporter.report(Severity::Warning, e.into());
                    None
                }
            }
        })
    }

    pub fn error_encountered(&self) -> bool {
        self.reporter.error_encountered()
    }

    pub fn error_string(&self) -> Option<String> {
        self.reporter.error_string()
    }

    pub fn last_error(&self) -> Option<HostError> {
        self.reporter.last_error()
    }

    pub fn clear_error(&self) {
        self.reporter.clear();
    }

    pub fn registered_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Ask the engine for a collection pass. Unreferenced synthesized
    /// callables release their callback contexts here.
    pub fn collect_garbage(&self) {
        self.runtime.run_gc();
    }

    /// Latch and log, then hand the error back for the host API to return.
    /// Registration failures are returned regardless of the failure policy;
    /// the policy governs script-facing operations.
    fn hard_fail(&self, severity: Severity, error: HostError) -> HostError {
        match self.reporter.report(severity, error.clone()) {
            Err(e) => e,
            Ok(()) => error,
        }
    }

    /// Latch and log; under the latch policy the operation degrades to the
    /// `Undefined` sentinel.
    fn soft_fail(&self, severity: Severity, error: HostError) -> Result<GenericValue, HostError> {
        self.reporter.report(severity, error)?;
        Ok(GenericValue::Undefined)
    }
}

/// Extract a human-readable message from a caught script exception.
///
/// Reads the conventional `message` property first, then falls back to
/// converting the whole thrown value. Only when that conversion itself
/// fails is there no safe way to describe the error; that is a secondary
/// failure and terminates the process.
fn exception_message<'js>(ctx: &Ctx<'js>, reporter: &ErrorReporter, caught: &Value<'js>) -> String {
    if let Some(object) = caught.as_object() {
        if let Ok(message) = object.get::<_, String>("message") {
            return message;
        }
    }
    match to_native(ctx, caught) {
        Ok(GenericValue::String(s)) => s,
        Ok(GenericValue::Number(n)) => format_number(n),
        Ok(other) => format!("uncaught {} value", other.type_name()),
        Err(e) => {
            let _ = reporter.report(Severity::Fatal, HostError::Secondary(e.to_string()));
            unreachable!("fatal report terminates the process")
        }
    }
}
