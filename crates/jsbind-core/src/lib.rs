//! Engine-independent core of the jsbind bridge.
//!
//! This crate defines everything that does not touch the script engine:
//! the [`GenericValue`] value model, the capability descriptors registrable
//! types declare ([`ClassCatalog`]), the argument coercion rules, the error
//! taxonomy, the per-host object registry, and the error reporter.
//!
//! The engine-facing half lives in the `jsbind` crate, which marshals
//! between these types and QuickJS values.

pub mod class;
pub mod coerce;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod value;

pub use class::ScriptClass;
pub use coerce::{coerce_argument, format_number};
pub use descriptor::{
    ClassCatalog, MAX_CALL_ARGS, MethodDescriptor, PropertyDescriptor, SemanticType,
};
pub use error::{ConversionError, DispatchError, HostError, RegistrationError};
pub use registry::{
    CallTarget, CallbackContext, ObjectHandle, ObjectRegistry, RegisteredObject, SharedObject,
};
pub use reporter::{ErrorReporter, FailurePolicy, Severity};
pub use value::GenericValue;
