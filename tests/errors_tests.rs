use actix_web::http::StatusCode;
use geolookup::errors::{GeoLookupError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_invalid_key_error() {
        let error = GeoLookupError::invalid_key("'abc' is not a valid IPv4 or IPv6 address");

        assert!(matches!(error, GeoLookupError::InvalidKey(_)));
        assert_eq!(error.code(), "E001");
        assert!(error.to_string().contains("Invalid IP Address"));
        assert!(error.to_string().contains("'abc'"));
    }

    #[test]
    fn test_upstream_and_decode_are_distinct() {
        let upstream = GeoLookupError::upstream_unavailable("3 attempts failed");
        let decode = GeoLookupError::decode("malformed upstream response body");

        assert_ne!(upstream.code(), decode.code());
        assert_ne!(upstream.error_type(), decode.error_type());
        assert!(upstream.to_string().starts_with("Upstream Unavailable"));
        assert!(decode.to_string().starts_with("Upstream Decode Error"));
    }

    #[test]
    fn test_message_is_raw_detail() {
        let error = GeoLookupError::cache_unavailable("cache disabled");
        assert_eq!(error.message(), "cache disabled");
        assert_eq!(error.format_simple(), "Cache Unavailable: cache disabled");
    }

    #[test]
    fn test_format_colored_contains_code() {
        let error = GeoLookupError::database_connection("refused");
        let colored = error.format_colored();
        assert!(colored.contains("E006"));
        assert!(colored.contains("refused"));
    }
}

#[cfg(test)]
mod http_status_tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GeoLookupError::invalid_key("x"), StatusCode::BAD_REQUEST),
            (GeoLookupError::upstream_unavailable("x"), StatusCode::BAD_GATEWAY),
            (GeoLookupError::decode("x"), StatusCode::BAD_GATEWAY),
            (
                GeoLookupError::cache_unavailable("x"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                GeoLookupError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GeoLookupError::config("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.http_status(), status, "{:?}", error);
        }
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let error: GeoLookupError = io.into();
        assert!(matches!(error, GeoLookupError::FileOperation(_)));
        assert!(error.message().contains("missing.toml"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: GeoLookupError = json_err.into();
        assert!(matches!(error, GeoLookupError::Serialization(_)));
    }

    #[test]
    fn test_from_db_error() {
        let db_err = sea_orm::DbErr::Custom("constraint failed".to_string());
        let error: GeoLookupError = db_err.into();
        assert!(matches!(error, GeoLookupError::DatabaseOperation(_)));
        assert!(error.message().contains("constraint failed"));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.toml")?)
        }

        let error = read_missing().unwrap_err();
        assert!(matches!(error, GeoLookupError::FileOperation(_)));
    }

    #[test]
    fn test_is_std_error() {
        let error = GeoLookupError::decode("bad body");
        let dyn_error: &dyn Error = &error;
        assert!(dyn_error.source().is_none());
        assert!(dyn_error.to_string().contains("bad body"));
    }
}
