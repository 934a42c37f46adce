//! The fixed capability interface for registrable host types.

use crate::descriptor::ClassCatalog;
use crate::error::DispatchError;
use crate::value::GenericValue;

/// A host object the script side can call into.
///
/// Implementors declare their surface once via [`catalog`](Self::catalog)
/// and route all calls through the generic [`invoke`](Self::invoke); the
/// bridge never sees concrete method signatures. Arguments arriving at
/// `invoke` have already passed the arity check and the coercion chain for
/// the declared parameter types, so implementations may match on the
/// expected tags directly.
///
/// The accessor pair backs the property fallback: any script-side read or
/// write that does not hit a synthesized member lands on
/// [`get_property`](Self::get_property) / [`set_property`](Self::set_property).
/// A read of a name the object does not know yields `Undefined`.
pub trait ScriptClass {
    /// The members this type exposes. Built once per registration.
    fn catalog(&self) -> ClassCatalog;

    /// Dispatch a call to the named method.
    fn invoke(
        &mut self,
        method: &str,
        args: &[GenericValue],
    ) -> Result<GenericValue, DispatchError>;

    /// Property-fallback read.
    fn get_property(&self, name: &str) -> GenericValue;

    /// Property-fallback write.
    fn set_property(&mut self, name: &str, value: GenericValue);
}
