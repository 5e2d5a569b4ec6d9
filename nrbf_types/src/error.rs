use std::borrow::Cow;
use thiserror::Error;

/// The structured failure kinds of the record format.
///
/// Fallible functions throughout the workspace return [`anyhow::Result`].
/// When a failure corresponds to one of these kinds, the underlying error is an
/// `NrbfError`, recoverable with [`NrbfError::kind_of`] or
/// [`anyhow::Error::downcast_ref`].
#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[non_exhaustive]
pub enum NrbfError {
    /// Fewer bytes remain than a fixed-width or length-prefixed field requires.
    #[error("Unexpected end of stream while reading {0}")]
    UnexpectedEndOfStream(Cow<'static, str>),

    /// A declared length or count is outside its legal domain.
    #[error("Out of range: {0}")]
    OutOfRange(Cow<'static, str>),

    /// A primitive type tag that has no fixed-width primitive representation.
    #[error("Unsupported primitive type {0}")]
    UnsupportedPrimitive(u8),

    /// A record type tag outside the catalog.
    #[error("Unknown record type {0}")]
    UnknownRecordType(u8),

    /// A record type inside the catalog that this reader never accepts.
    #[error("Unsupported record {0}")]
    UnsupportedRecord(Cow<'static, str>),

    /// Duplicate ids, miscounted null runs, unknown discriminators,
    /// dangling references, and layouts that contradict a known shape.
    #[error("Corrupt graph: {0}")]
    CorruptGraph(Cow<'static, str>),

    /// A count does not fit the width of the chosen record variant.
    #[error("Overflow: {0}")]
    Overflow(Cow<'static, str>),

    /// Bytes that decode to no legal value, eg invalid UTF-8.
    #[error("Invalid data: {0}")]
    InvalidData(Cow<'static, str>),

    /// A lookup of an id that is not in the record map.
    #[error("No record with id {0}")]
    MissingId(i32),
}

impl NrbfError {
    pub fn unexpected_eos<S: Into<Cow<'static, str>>>(what: S) -> Self {
        Self::UnexpectedEndOfStream(what.into())
    }
    pub fn out_of_range<S: Into<Cow<'static, str>>>(msg: S) -> Self {
        Self::OutOfRange(msg.into())
    }
    pub fn corrupt<S: Into<Cow<'static, str>>>(msg: S) -> Self {
        Self::CorruptGraph(msg.into())
    }
    pub fn overflow<S: Into<Cow<'static, str>>>(msg: S) -> Self {
        Self::Overflow(msg.into())
    }
    pub fn invalid_data<S: Into<Cow<'static, str>>>(msg: S) -> Self {
        Self::InvalidData(msg.into())
    }
    pub fn unsupported_record<S: Into<Cow<'static, str>>>(msg: S) -> Self {
        Self::UnsupportedRecord(msg.into())
    }

    pub fn kind_of(err: &anyhow::Error) -> Option<&NrbfError> {
        err.downcast_ref::<NrbfError>()
    }

    pub fn is_unexpected_eos(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfStream(_))
    }
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptGraph(_))
    }
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow(_))
    }
}
