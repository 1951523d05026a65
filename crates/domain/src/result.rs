//! Tagged outcome type produced by response mapping
//!
//! Every mapped response is exactly one of: a value, an explicit
//! no-content success, or a classified error. There is no way to build a
//! "no value" state that is not one of the tagged variants, which keeps a
//! 204 distinguishable from both an empty value and a failure.

use crate::errors::{IamError, Result};

/// Outcome of one IAM API call.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ApiResult<T> {
    /// 200 with a body deserialized as the operation's success type.
    Ok(T),
    /// 204 No Content: the call succeeded but carried no value.
    NoContent,
    /// Classified failure; see [`IamError`] for the taxonomy.
    Err(IamError),
}

impl<T> ApiResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// The success value, if this outcome carries one.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            _ => None,
        }
    }

    /// The classified error, if this outcome is a failure.
    pub fn err(&self) -> Option<&IamError> {
        match self {
            Self::Err(err) => Some(err),
            _ => None,
        }
    }

    /// Map the success value, leaving the other variants untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Ok(value) => ApiResult::Ok(f(value)),
            Self::NoContent => ApiResult::NoContent,
            Self::Err(err) => ApiResult::Err(err),
        }
    }

    /// Collapse into a standard `Result`, with `Ok(None)` for no-content.
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Self::Ok(value) => Ok(Some(value)),
            Self::NoContent => Ok(None),
            Self::Err(err) => Err(err),
        }
    }
}

impl<T> From<IamError> for ApiResult<T> {
    fn from(err: IamError) -> Self {
        Self::Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_accessors() {
        let outcome = ApiResult::Ok(7);
        assert!(outcome.is_ok());
        assert!(!outcome.is_no_content());
        assert_eq!(outcome.value(), Some(&7));
        assert_eq!(outcome.err(), None);
        assert_eq!(outcome.into_result(), Ok(Some(7)));
    }

    #[test]
    fn test_no_content_is_distinct_from_empty_value() {
        let no_content: ApiResult<Vec<u8>> = ApiResult::NoContent;
        let empty = ApiResult::Ok(Vec::<u8>::new());
        assert_ne!(no_content, empty);
        assert_eq!(no_content.into_result(), Ok(None));
        assert_eq!(empty.into_result(), Ok(Some(vec![])));
    }

    #[test]
    fn test_err_carries_classified_error() {
        let outcome: ApiResult<()> = ApiResult::Err(IamError::Cancelled);
        assert!(outcome.is_err());
        assert_eq!(outcome.value(), None);
        assert_eq!(outcome.into_result(), Err(IamError::Cancelled));
    }

    #[test]
    fn test_map_preserves_tags() {
        assert_eq!(ApiResult::Ok(2).map(|v| v * 2), ApiResult::Ok(4));
        assert_eq!(ApiResult::<u32>::NoContent.map(|v| v * 2), ApiResult::NoContent);
        let err: ApiResult<u32> = ApiResult::Err(IamError::Cancelled);
        assert_eq!(err.map(|v| v * 2), ApiResult::Err(IamError::Cancelled));
    }
}
