//! jsbind — a dynamic marshalling and dispatch bridge between host Rust
//! objects and an embedded QuickJS runtime.
//!
//! Host types implement [`ScriptClass`], declaring their callable surface
//! as a [`ClassCatalog`]. Registering an instance with a [`ScriptHost`]
//! synthesizes a script-side object whose methods dispatch back into the
//! native implementation, with argument coercion and bidirectional value
//! conversion handled by the bridge. Undeclared properties resolve through
//! a get/set fallback trap.
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use jsbind::{
//!     ClassCatalog, DispatchError, GenericValue, ScriptClass, ScriptHost, SemanticType,
//! };
//!
//! struct Greeter;
//!
//! impl ScriptClass for Greeter {
//!     fn catalog(&self) -> ClassCatalog {
//!         ClassCatalog::new().with_method(
//!             "greet",
//!             vec![SemanticType::String],
//!             SemanticType::String,
//!         )
//!     }
//!
//!     fn invoke(
//!         &mut self,
//!         method: &str,
//!         args: &[GenericValue],
//!     ) -> Result<GenericValue, DispatchError> {
//!         match method {
//!             "greet" => {
//!                 let who = args[0].as_str().unwrap_or("world");
//!                 Ok(format!("hello, {who}").into())
//!             }
//!             other => Err(DispatchError::UnknownMethod {
//!                 method: other.to_string(),
//!             }),
//!         }
//!     }
//!
//!     fn get_property(&self, _name: &str) -> GenericValue {
//!         GenericValue::Undefined
//!     }
//!
//!     fn set_property(&mut self, _name: &str, _value: GenericValue) {}
//! }
//!
//! let host = ScriptHost::new().unwrap();
//! let greeter = Rc::new(RefCell::new(Greeter));
//! host.register(&greeter, "greeter").unwrap();
//! let result = host.evaluate("greeter.greet('script')", "demo.js").unwrap();
//! assert_eq!(result, GenericValue::String("hello, script".to_string()));
//! ```

pub mod bind;
pub mod convert;
pub mod engine;
pub mod thunk;
pub mod trap;

pub use engine::{HostConfig, ScriptHost};

pub use jsbind_core::{
    CallTarget, CallbackContext, ClassCatalog, ConversionError, DispatchError, ErrorReporter,
    FailurePolicy, GenericValue, HostError, MAX_CALL_ARGS, MethodDescriptor, ObjectHandle,
    ObjectRegistry, PropertyDescriptor, RegisteredObject, RegistrationError, ScriptClass,
    SemanticType, Severity, SharedObject, coerce_argument, format_number,
};
