//! Resource data capability
//!
//! The uniform state-access surface contract functions see, regardless of
//! which protocol generation is driving the call. Two implementations exist
//! ([`crate::LegacyResourceData`], [`crate::DeclarativeResourceData`]);
//! both expose identical observable behaviour, and calling code never
//! branches on which one it holds.

use std::time::Duration;

use groundplane_schema::AttrValue;

use crate::error::Result;

/// The lifecycle operation a call is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::Import => write!(f, "import"),
        }
    }
}

/// Per-operation timeouts declared on a contract.
///
/// A function exceeding its timeout fails the whole lifecycle call; remote
/// calls are responsible for their own retry policy within that budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for OperationTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

impl OperationTimeouts {
    /// The timeout governing one operation. Import runs under the read
    /// timeout since it is dispatched as a read.
    pub fn for_operation(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Create => self.create,
            Operation::Read | Operation::Import => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// Request-scoped state access handed to contract functions.
///
/// An instance is bound to exactly one in-flight lifecycle call and must
/// not be retained past it; its final attribute store becomes the new
/// persisted state when the call succeeds.
pub trait ResourceData: Send {
    /// Returns the current effective value for `key`.
    ///
    /// In Create and Update functions this reads from the configuration;
    /// in Read and Import functions it reads from state. It must not be
    /// called from Delete functions, where it returns `Null`.
    fn get(&self, key: &str) -> AttrValue;

    /// Returns the original and updated value for `key`. The two are equal
    /// when the field is unset or unchanged.
    fn get_change(&self, key: &str) -> (AttrValue, AttrValue);

    /// Returns the value for `key` alongside whether the field was set to
    /// a non-zero value. Use [`ResourceData::get_raw_value`] when a zero
    /// value (empty string, `false`, `0`) must still count as set.
    fn get_value(&self, key: &str) -> (AttrValue, bool);

    /// Returns the value for `key` alongside whether the field is present
    /// at all, zero-valued or not.
    fn get_raw_value(&self, key: &str) -> (AttrValue, bool);

    /// Whether the change-set shows a difference for `key`.
    fn has_change(&self, key: &str) -> bool;

    /// Whether any of `keys` changed.
    fn has_changes(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has_change(key))
    }

    /// The resource identity, or an empty string when the resource does
    /// not exist (not yet created, or removed from state).
    fn id(&self) -> String;

    /// True only during Create for a resource not yet persisted.
    fn is_new_resource(&self) -> bool;

    /// Writes a value into the pending state. Fails with
    /// [`crate::SdkError::StateWrite`] when the value does not type-check
    /// against the compiled schema for `key`.
    fn set(&mut self, key: &str, value: AttrValue) -> Result<()>;

    /// Persists the resource identity. An empty `id` means "remove this
    /// resource from state", not "identity is the empty string".
    fn set_id(&mut self, id: &str);

    /// The declared timeout for `operation`.
    fn timeout(&self, operation: Operation) -> Duration;
}
