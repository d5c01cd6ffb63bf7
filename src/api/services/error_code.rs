//! 统一 API 错误码定义

use crate::errors::GeoLookupError;

/// API 错误码
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 查询错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 查询错误 3000-3099
    InvalidIpAddress = 3000,
    UpstreamUnavailable = 3001,
    UpstreamDecodeError = 3002,
    CacheUnavailable = 3003,
    CacheOperationFailed = 3004,
}

impl From<&GeoLookupError> for ErrorCode {
    fn from(err: &GeoLookupError) -> Self {
        match err {
            GeoLookupError::InvalidKey(_) => ErrorCode::InvalidIpAddress,
            GeoLookupError::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            GeoLookupError::Decode(_) => ErrorCode::UpstreamDecodeError,
            GeoLookupError::CacheUnavailable(_) => ErrorCode::CacheUnavailable,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&GeoLookupError::invalid_key("x")),
            ErrorCode::InvalidIpAddress
        );
        assert_eq!(
            ErrorCode::from(&GeoLookupError::decode("x")),
            ErrorCode::UpstreamDecodeError
        );
        assert_eq!(
            ErrorCode::from(&GeoLookupError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(ErrorCode::UpstreamUnavailable as i32, 3001);
    }
}
