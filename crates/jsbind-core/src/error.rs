//! Error taxonomy for the bridge.
//!
//! Errors are grouped by the phase that produces them: value conversion,
//! call dispatch, and object registration. [`HostError`] is the top-level
//! wrapper the public API surfaces; phase errors convert into it via `From`.
//!
//! All error types are `Clone` so the reporter can latch the most recent
//! error while still returning it to the caller.

use thiserror::Error;

/// Failure while converting between engine values and [`GenericValue`]s.
///
/// [`GenericValue`]: crate::GenericValue
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// A value did not have the expected tag and no coercion applied.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Reading a property off an engine object failed.
    #[error("failed to read property '{name}': {reason}")]
    PropertyRead { name: String, reason: String },

    /// Reading an array element off an engine array failed.
    #[error("failed to read element {index}: {reason}")]
    ElementRead { index: u32, reason: String },

    /// The engine itself faulted while a value was being built or inspected.
    #[error("engine fault during conversion: {0}")]
    Engine(String),
}

/// Failure while dispatching a script call into a native method.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("'{method}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// More argument slots than the call budget allows.
    #[error("'{method}' called with {actual} arguments, limit is {limit}")]
    ArityOverflow {
        method: String,
        actual: usize,
        limit: usize,
    },

    /// An argument could not be coerced to the declared parameter type.
    #[error("argument {index} of '{method}': {source}")]
    Coercion {
        method: String,
        index: usize,
        source: ConversionError,
    },

    /// The registered native instance was dropped by its owner.
    #[error("target object '{name}' no longer exists")]
    ObjectGone { name: String },

    /// A declared property without read access was read.
    #[error("property '{property}' is not readable")]
    PropertyNotReadable { property: String },

    /// A declared property without write access was written.
    #[error("property '{property}' is write-protected")]
    PropertyNotWritable { property: String },

    /// The implementor's `invoke` did not recognize the member name.
    #[error("unknown member '{method}'")]
    UnknownMethod { method: String },

    /// The native method ran and reported a failure of its own.
    #[error("'{method}' failed: {reason}")]
    MethodFailed { method: String, reason: String },
}

/// Failure while registering an object or value with the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("an object named '{0}' is already registered")]
    DuplicateName(String),

    #[error("registration name must not be empty")]
    EmptyName,

    #[error("catalog member name must not be empty")]
    EmptyMemberName,

    #[error("duplicate catalog member '{member}'")]
    DuplicateMember { member: String },

    #[error("method '{method}' declares {arity} parameters, limit is {limit}")]
    ArityBudget {
        method: String,
        arity: usize,
        limit: usize,
    },
}

/// Top-level error surfaced by the host API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The script threw and the exception escaped to the host.
    #[error("script exception: {message}")]
    Exception { message: String },

    /// The engine could not be constructed. Unrecoverable for the host
    /// instance being built.
    #[error("engine initialization failed: {0}")]
    Init(String),

    /// A failure occurred while reading a prior error's own message. There
    /// is no safe fallback; reported at fatal severity.
    #[error("secondary failure while reading a prior error: {0}")]
    Secondary(String),
}

impl HostError {
    /// Short kind tag for logging and the error latch.
    pub fn kind(&self) -> &'static str {
        match self {
            HostError::Conversion(_) => "conversion",
            HostError::Dispatch(DispatchError::ArityMismatch { .. }) => "arity",
            HostError::Dispatch(DispatchError::ArityOverflow { .. }) => "arity-overflow",
            HostError::Dispatch(DispatchError::Coercion { .. }) => "coercion",
            HostError::Dispatch(_) => "dispatch",
            HostError::Registration(RegistrationError::DuplicateName(_)) => "duplicate-name",
            HostError::Registration(_) => "registration",
            HostError::Exception { .. } => "exception",
            HostError::Init(_) => "init",
            HostError::Secondary(_) => "secondary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = DispatchError::ArityMismatch {
            method: "echo".to_string(),
            expected: 1,
            actual: 2,
        };
        assert_eq!(err.to_string(), "'echo' expects 1 argument(s), got 2");

        let err = ConversionError::TypeMismatch {
            expected: "number",
            actual: "map",
        };
        assert_eq!(err.to_string(), "type mismatch: expected number, got map");
    }

    #[test]
    fn kind_tags() {
        let err: HostError = RegistrationError::DuplicateName("api".to_string()).into();
        assert_eq!(err.kind(), "duplicate-name");

        let err: HostError = DispatchError::ArityOverflow {
            method: "f".to_string(),
            actual: 11,
            limit: 10,
        }
        .into();
        assert_eq!(err.kind(), "arity-overflow");
    }

    #[test]
    fn transparent_wrapping_keeps_message() {
        let inner = ConversionError::Engine("oom".to_string());
        let outer: HostError = inner.clone().into();
        assert_eq!(outer.to_string(), inner.to_string());
    }
}
