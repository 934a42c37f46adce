//! Per-host object registry and callback state.
//!
//! Each host instance carries its own [`ObjectRegistry`]; there is no
//! process-wide registration state. The registry stores weak handles only:
//! the embedding code exclusively owns registered instances, and a handle
//! whose owner dropped the instance simply fails to upgrade at call time.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::class::ScriptClass;
use crate::descriptor::{ClassCatalog, MethodDescriptor, PropertyDescriptor};
use crate::error::RegistrationError;

/// Strong handle the embedding code holds.
pub type SharedObject = Rc<RefCell<dyn ScriptClass>>;

/// Weak handle the bridge holds.
pub type ObjectHandle = Weak<RefCell<dyn ScriptClass>>;

/// What a synthesized engine callable dispatches to.
#[derive(Debug, Clone)]
pub enum CallTarget {
    /// One declared method.
    Method(MethodDescriptor),
    /// The shared get/set fallback pair. Carries the declared properties so
    /// the accessors can enforce read/write access; undeclared names pass
    /// through unrestricted.
    Accessor(Vec<PropertyDescriptor>),
}

/// State moved into each synthesized engine callable's closure.
///
/// Bridge-owned: the context lives exactly as long as the engine keeps the
/// function object alive, and is released when the engine reclaims it.
pub struct CallbackContext {
    pub object: ObjectHandle,
    pub exposed_name: String,
    pub target: CallTarget,
}

impl CallbackContext {
    pub fn new(object: ObjectHandle, exposed_name: impl Into<String>, target: CallTarget) -> Self {
        Self {
            object,
            exposed_name: exposed_name.into(),
            target,
        }
    }

    /// Upgrade the weak handle, if the owner still holds the instance.
    pub fn upgrade(&self) -> Option<SharedObject> {
        self.object.upgrade()
    }
}

/// Registry record for one registered object.
pub struct RegisteredObject {
    pub exposed_name: String,
    pub handle: ObjectHandle,
    pub catalog: ClassCatalog,
}

/// All objects registered with one host, keyed by exposed name.
#[derive(Default)]
pub struct ObjectRegistry {
    entries: FxHashMap<String, RegisteredObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registration. The exposed name must be unique within this
    /// registry; on collision the existing entry is left untouched.
    pub fn insert(&mut self, entry: RegisteredObject) -> Result<(), RegistrationError> {
        if self.entries.contains_key(&entry.exposed_name) {
            return Err(RegistrationError::DuplicateName(entry.exposed_name));
        }
        self.entries.insert(entry.exposed_name.clone(), entry);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredObject> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::SemanticType;
    use crate::error::DispatchError;
    use crate::value::GenericValue;

    struct Dummy;

    impl ScriptClass for Dummy {
        fn catalog(&self) -> ClassCatalog {
            ClassCatalog::new().with_method("ping", vec![], SemanticType::Void)
        }

        fn invoke(
            &mut self,
            method: &str,
            _args: &[GenericValue],
        ) -> Result<GenericValue, DispatchError> {
            Err(DispatchError::UnknownMethod {
                method: method.to_string(),
            })
        }

        fn get_property(&self, _name: &str) -> GenericValue {
            GenericValue::Undefined
        }

        fn set_property(&mut self, _name: &str, _value: GenericValue) {}
    }

    fn entry(name: &str, rc: &Rc<RefCell<Dummy>>) -> RegisteredObject {
        let shared: SharedObject = rc.clone();
        RegisteredObject {
            exposed_name: name.to_string(),
            handle: Rc::downgrade(&shared),
            catalog: rc.borrow().catalog(),
        }
    }

    #[test]
    fn duplicate_name_keeps_first_entry() {
        let first = Rc::new(RefCell::new(Dummy));
        let second = Rc::new(RefCell::new(Dummy));

        let mut registry = ObjectRegistry::new();
        registry.insert(entry("api", &first)).unwrap();
        let err = registry.insert(entry("api", &second)).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateName("api".to_string()));

        assert_eq!(registry.len(), 1);
        let kept = registry.get("api").unwrap();
        assert!(kept.handle.upgrade().is_some());
    }

    #[test]
    fn dead_handle_fails_to_upgrade() {
        let rc = Rc::new(RefCell::new(Dummy));
        let shared: SharedObject = rc.clone();
        let context =
            CallbackContext::new(Rc::downgrade(&shared), "api", CallTarget::Accessor(Vec::new()));
        drop(shared);
        drop(rc);
        assert!(context.upgrade().is_none());
    }
}
