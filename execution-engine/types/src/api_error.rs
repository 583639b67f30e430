use std::fmt::{self, Debug, Formatter};

use crate::bytesrepr;

/// Offset added to the value of `ApiError::User` when it is turned into a code.
const USER_ERROR_OFFSET: u32 = u16::MAX as u32 + 1;

/// Reason an action against an account was aborted.
///
/// Platform variants map to small fixed codes. `ApiError::User(n)` maps to `65_536 + n`, which
/// leaves the whole `u16` range to the application, e.g.
/// ```
/// use keys_manager_types::ApiError;
///
/// #[repr(u16)]
/// enum Failure {
///     Locked = 1,
///     Expired,
/// }
///
/// impl From<Failure> for ApiError {
///     fn from(failure: Failure) -> Self {
///         ApiError::User(failure as u16)
///     }
/// }
///
/// assert_eq!(65_537, u32::from(ApiError::from(Failure::Locked)));
/// assert_eq!(65_538, u32::from(ApiError::from(Failure::Expired)));
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required argument was not supplied.
    MissingArgument,
    /// The supplied arguments are inconsistent with each other.
    InvalidArgument,
    /// An argument could not be decoded into the expected type.
    Deserialize,
    /// No account is stored under the requested hash.
    ValueNotFound,
    /// Stored bytes ended early.
    EarlyEndOfStream,
    /// Stored bytes are malformed.
    FormattingError,
    /// Stored bytes continue past the decoded value.
    LeftOverBytes,
    /// A stored length prefix is larger than can be allocated.
    OutOfMemoryError,
    /// Application-defined failure.
    User(u16),
}

impl ApiError {
    fn name(self) -> &'static str {
        match self {
            ApiError::MissingArgument => "MissingArgument",
            ApiError::InvalidArgument => "InvalidArgument",
            ApiError::Deserialize => "Deserialize",
            ApiError::ValueNotFound => "ValueNotFound",
            ApiError::EarlyEndOfStream => "EarlyEndOfStream",
            ApiError::FormattingError => "FormattingError",
            ApiError::LeftOverBytes => "LeftOverBytes",
            ApiError::OutOfMemoryError => "OutOfMemoryError",
            ApiError::User(_) => "User",
        }
    }
}

impl From<bytesrepr::Error> for ApiError {
    fn from(error: bytesrepr::Error) -> Self {
        match error {
            bytesrepr::Error::EarlyEndOfStream => ApiError::EarlyEndOfStream,
            bytesrepr::Error::FormattingError => ApiError::FormattingError,
            bytesrepr::Error::LeftOverBytes => ApiError::LeftOverBytes,
            bytesrepr::Error::OutOfMemoryError => ApiError::OutOfMemoryError,
        }
    }
}

impl From<ApiError> for u32 {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::MissingArgument => 2,
            ApiError::InvalidArgument => 3,
            ApiError::Deserialize => 4,
            ApiError::ValueNotFound => 6,
            ApiError::EarlyEndOfStream => 19,
            ApiError::FormattingError => 20,
            ApiError::LeftOverBytes => 21,
            ApiError::OutOfMemoryError => 22,
            ApiError::User(value) => USER_ERROR_OFFSET + u32::from(value),
        }
    }
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ApiError::User(value) => write!(f, "ApiError::User({})", value)?,
            other => write!(f, "ApiError::{}", other.name())?,
        }
        write!(f, " [{}]", u32::from(*self))
    }
}
