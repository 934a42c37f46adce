//! Capability descriptors.
//!
//! Rust has no runtime reflection, so every registrable type declares what
//! it exposes up front: a [`ClassCatalog`] of [`MethodDescriptor`]s and
//! [`PropertyDescriptor`]s, built once at registration time. The catalog is
//! the single source of truth for what the script side can see; members not
//! listed here are only reachable through the property fallback.

use crate::error::RegistrationError;
use rustc_hash::FxHashSet;

/// Hard cap on argument slots for a single call.
pub const MAX_CALL_ARGS: usize = 10;

/// Declared parameter and return types for catalog methods.
///
/// These are the semantic types the coercion chain understands; they are
/// deliberately coarser than the value model (`Int` and `Double` both arrive
/// as numbers, the declaration decides how an argument is narrowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Return-type only; a `Void` method yields `undefined` to the script.
    Void,
    Bool,
    Int,
    Double,
    String,
    List,
    Map,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Void => "void",
            SemanticType::Bool => "bool",
            SemanticType::Int => "int",
            SemanticType::Double => "double",
            SemanticType::String => "string",
            SemanticType::List => "list",
            SemanticType::Map => "map",
        }
    }
}

/// One callable member of a registered object.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<SemanticType>,
    pub returns: SemanticType,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        params: Vec<SemanticType>,
        returns: SemanticType,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One declared property of a registered object.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub readable: bool,
    pub writable: bool,
}

impl PropertyDescriptor {
    pub fn read_write(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
            writable: true,
        }
    }

    pub fn read_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
            writable: false,
        }
    }
}

/// Everything one type exposes to the script side, in declaration order.
///
/// Declaration order is the tie-break wherever descriptors are iterated, so
/// installation order on the script object is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCatalog {
    methods: Vec<MethodDescriptor>,
    properties: Vec<PropertyDescriptor>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        params: Vec<SemanticType>,
        returns: SemanticType,
    ) -> Self {
        self.methods.push(MethodDescriptor::new(name, params, returns));
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Registration-time validation: member names must be non-empty and
    /// unique across methods and properties, and no method may declare more
    /// than [`MAX_CALL_ARGS`] parameters. Runs before anything is installed,
    /// so a rejected catalog leaves the engine untouched.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for method in &self.methods {
            if method.name.is_empty() {
                return Err(RegistrationError::EmptyMemberName);
            }
            if method.arity() > MAX_CALL_ARGS {
                return Err(RegistrationError::ArityBudget {
                    method: method.name.clone(),
                    arity: method.arity(),
                    limit: MAX_CALL_ARGS,
                });
            }
            if !seen.insert(&method.name) {
                return Err(RegistrationError::DuplicateMember {
                    member: method.name.clone(),
                });
            }
        }
        for property in &self.properties {
            if property.name.is_empty() {
                return Err(RegistrationError::EmptyMemberName);
            }
            if !seen.insert(&property.name) {
                return Err(RegistrationError::DuplicateMember {
                    member: property.name.clone(),
                });
            }
        }
        Ok(())
    }
}
