//! Scripting descriptors: ordered key/value lists keyed by four-character
//! codes, plus a reader that accumulates the first error it meets.

use thiserror::Error;

use crate::host::{OsType, ResultCode};

/// Type code of boolean values.
pub const TYPE_BOOLEAN: OsType = OsType::new(*b"bool");
/// Type code of 32-bit integer values.
pub const TYPE_INTEGER: OsType = OsType::new(*b"long");

/// A single value stored in a [`Descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorValue {
    /// Enumerated value of the given enum type.
    Enum { type_id: OsType, value: OsType },
    Bool(bool),
    Integer(i32),
}

impl DescriptorValue {
    /// Type code reported alongside the key while iterating.
    #[must_use]
    pub const fn type_id(&self) -> OsType {
        match self {
            Self::Enum { type_id, .. } => *type_id,
            Self::Bool(_) => TYPE_BOOLEAN,
            Self::Integer(_) => TYPE_INTEGER,
        }
    }
}

/// Errors left behind by a [`DescriptorReader`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A key the reader required never appeared.
    #[error("missing parameter {0}")]
    MissingParameter(OsType),

    /// A value was read as the wrong kind.
    #[error("parameter {key} is not {expected}")]
    WrongType { key: OsType, expected: &'static str },
}

impl DescriptorError {
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::MissingParameter(_) => ResultCode::MissingParameter,
            Self::WrongType { .. } => ResultCode::WrongType,
        }
    }
}

/// Ordered list of scripted parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    items: Vec<(OsType, DescriptorValue)>,
}

impl Descriptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing an earlier entry in place.
    pub fn put(&mut self, key: OsType, value: DescriptorValue) {
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.items.push((key, value)),
        }
    }

    pub fn put_enum(&mut self, key: OsType, type_id: OsType, value: OsType) {
        self.put(key, DescriptorValue::Enum { type_id, value });
    }

    pub fn put_bool(&mut self, key: OsType, value: bool) {
        self.put(key, DescriptorValue::Bool(value));
    }

    pub fn put_integer(&mut self, key: OsType, value: i32) {
        self.put(key, DescriptorValue::Integer(value));
    }

    #[must_use]
    pub fn get(&self, key: OsType) -> Option<&DescriptorValue> {
        self.items.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, key: OsType) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = OsType> + '_ {
        self.items.iter().map(|(k, _)| *k)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start reading; every key in `required` must appear before
    /// [`DescriptorReader::close`] or a missing-parameter error is left.
    #[must_use]
    pub fn reader<'a>(&'a self, required: &[OsType]) -> DescriptorReader<'a> {
        DescriptorReader {
            items: &self.items,
            position: 0,
            current: None,
            required: required.to_vec(),
            sticky: None,
        }
    }
}

/// Sequential reader over a [`Descriptor`].
///
/// Getters never fail; a wrong-typed read yields `None` and records the
/// first such error, which [`close`](Self::close) hands back.
pub struct DescriptorReader<'a> {
    items: &'a [(OsType, DescriptorValue)],
    position: usize,
    current: Option<(OsType, DescriptorValue)>,
    required: Vec<OsType>,
    sticky: Option<DescriptorError>,
}

impl DescriptorReader<'_> {
    /// Advance to the next key, returning it with its type code.
    pub fn next_key(&mut self) -> Option<(OsType, OsType)> {
        let (key, value) = *self.items.get(self.position)?;
        self.position += 1;
        self.required.retain(|k| *k != key);
        self.current = Some((key, value));
        Some((key, value.type_id()))
    }

    /// Value of the current key as an enumeration.
    pub fn get_enum(&mut self) -> Option<OsType> {
        match self.current? {
            (_, DescriptorValue::Enum { value, .. }) => Some(value),
            (key, _) => self.fail(key, "an enumeration"),
        }
    }

    /// Value of the current key as a boolean.
    pub fn get_bool(&mut self) -> Option<bool> {
        match self.current? {
            (_, DescriptorValue::Bool(value)) => Some(value),
            (key, _) => self.fail(key, "a boolean"),
        }
    }

    fn fail<T>(&mut self, key: OsType, expected: &'static str) -> Option<T> {
        if self.sticky.is_none() {
            self.sticky = Some(DescriptorError::WrongType { key, expected });
        }
        None
    }

    /// Finish reading and return the sticky error, if any.
    pub fn close(self) -> Result<(), DescriptorError> {
        if let Some(err) = self.sticky {
            return Err(err);
        }
        match self.required.first() {
            Some(key) => Err(DescriptorError::MissingParameter(*key)),
            None => Ok(()),
        }
    }
}
