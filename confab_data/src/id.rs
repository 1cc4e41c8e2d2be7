//! Bounded numeric identifiers for dialogs and pages.
//!
//! An [`Id`] doubles as the on-disk wire value (a little-endian `u16`) and
//! as a direct index into the registry's sparse slot table, so its valid
//! range is fixed for the life of the bank format.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from constructing or parsing an [`Id`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Value outside the representable id range.
    #[error("id value {0} is outside the valid range 0..=65535")]
    OutOfRange(i64),
    /// Text that does not parse as a numeric id.
    #[error("'{0}' is not a numeric id")]
    Parse(String),
}

/// Identifier for a dialog, or for a page within a dialog.
///
/// Valid values span the full `u16` range. [`Id::END`] (the maximum) is
/// reserved by convention as the end-of-conversation sentinel and never
/// names a real page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u16);

impl Id {
    /// Smallest valid id.
    pub const MIN: Id = Id(u16::MIN);
    /// Largest valid id.
    pub const MAX: Id = Id(u16::MAX);
    /// Reserved sentinel meaning "the conversation ends here".
    pub const END: Id = Id::MAX;

    /// Validating constructor from a wide integer.
    ///
    /// # Errors
    /// Returns [`IdError::OutOfRange`] when `raw` falls outside
    /// `[Id::MIN, Id::MAX]`.
    pub fn new(raw: i64) -> Result<Self, IdError> {
        u16::try_from(raw).map(Id).map_err(|_| IdError::OutOfRange(raw))
    }

    /// The underlying numeric value, as written to the wire.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Next id up, re-validated against the range.
    ///
    /// # Errors
    /// Fails at [`Id::MAX`].
    pub fn succ(self) -> Result<Self, IdError> {
        self.checked_add(1)
    }

    /// Next id down, re-validated against the range.
    ///
    /// # Errors
    /// Fails at [`Id::MIN`].
    pub fn pred(self) -> Result<Self, IdError> {
        self.checked_sub(1)
    }

    /// Addition with range re-validation.
    ///
    /// # Errors
    /// Returns [`IdError::OutOfRange`] when the sum exceeds [`Id::MAX`].
    pub fn checked_add(self, delta: u16) -> Result<Self, IdError> {
        Id::new(i64::from(self.0) + i64::from(delta))
    }

    /// Subtraction with range re-validation.
    ///
    /// # Errors
    /// Returns [`IdError::OutOfRange`] when the difference falls below
    /// [`Id::MIN`].
    pub fn checked_sub(self, delta: u16) -> Result<Self, IdError> {
        Id::new(i64::from(self.0) - i64::from(delta))
    }

    /// Fixed-width little-endian bytes, exactly as stored in dialog banks.
    /// This layout is stable across versions.
    pub fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Rebuild an id from its fixed-width wire bytes.
    pub fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Id(u16::from_le_bytes(bytes))
    }
}

impl From<u16> for Id {
    fn from(raw: u16) -> Self {
        Id(raw)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, IdError> {
        let raw: i64 = s.trim().parse().map_err(|_| IdError::Parse(s.to_string()))?;
        Id::new(raw)
    }
}
