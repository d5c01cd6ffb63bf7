use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoLookupError {
    InvalidKey(String),
    UpstreamUnavailable(String),
    Decode(String),
    CacheUnavailable(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl GeoLookupError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoLookupError::InvalidKey(_) => "E001",
            GeoLookupError::UpstreamUnavailable(_) => "E002",
            GeoLookupError::Decode(_) => "E003",
            GeoLookupError::CacheUnavailable(_) => "E004",
            GeoLookupError::DatabaseConfig(_) => "E005",
            GeoLookupError::DatabaseConnection(_) => "E006",
            GeoLookupError::DatabaseOperation(_) => "E007",
            GeoLookupError::FileOperation(_) => "E008",
            GeoLookupError::Serialization(_) => "E009",
            GeoLookupError::Config(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoLookupError::InvalidKey(_) => "Invalid IP Address",
            GeoLookupError::UpstreamUnavailable(_) => "Upstream Unavailable",
            GeoLookupError::Decode(_) => "Upstream Decode Error",
            GeoLookupError::CacheUnavailable(_) => "Cache Unavailable",
            GeoLookupError::DatabaseConfig(_) => "Database Configuration Error",
            GeoLookupError::DatabaseConnection(_) => "Database Connection Error",
            GeoLookupError::DatabaseOperation(_) => "Database Operation Error",
            GeoLookupError::FileOperation(_) => "File Operation Error",
            GeoLookupError::Serialization(_) => "Serialization Error",
            GeoLookupError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoLookupError::InvalidKey(msg)
            | GeoLookupError::UpstreamUnavailable(msg)
            | GeoLookupError::Decode(msg)
            | GeoLookupError::CacheUnavailable(msg)
            | GeoLookupError::DatabaseConfig(msg)
            | GeoLookupError::DatabaseConnection(msg)
            | GeoLookupError::DatabaseOperation(msg)
            | GeoLookupError::FileOperation(msg)
            | GeoLookupError::Serialization(msg)
            | GeoLookupError::Config(msg) => msg,
        }
    }

    /// HTTP status used at the request boundary
    pub fn http_status(&self) -> StatusCode {
        match self {
            GeoLookupError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            GeoLookupError::UpstreamUnavailable(_) | GeoLookupError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            GeoLookupError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoLookupError {}

// 便捷的构造函数
impl GeoLookupError {
    pub fn invalid_key<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::InvalidKey(msg.into())
    }

    pub fn upstream_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::UpstreamUnavailable(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Decode(msg.into())
    }

    pub fn cache_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::CacheUnavailable(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GeoLookupError {
    fn from(err: sea_orm::DbErr) -> Self {
        GeoLookupError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for GeoLookupError {
    fn from(err: std::io::Error) -> Self {
        GeoLookupError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeoLookupError {
    fn from(err: serde_json::Error) -> Self {
        GeoLookupError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for GeoLookupError {
    fn from(err: config::ConfigError) -> Self {
        GeoLookupError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoLookupError>;
