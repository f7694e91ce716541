use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardError {
    DataAccess(String),
    Validation(String),
    NotFound(String),
    Computation(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Serialization(String),
    FileOperation(String),
}

impl DashboardError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::DataAccess(_) => "E001",
            DashboardError::Validation(_) => "E002",
            DashboardError::NotFound(_) => "E003",
            DashboardError::Computation(_) => "E004",
            DashboardError::DatabaseConfig(_) => "E005",
            DashboardError::DatabaseConnection(_) => "E006",
            DashboardError::Serialization(_) => "E007",
            DashboardError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            DashboardError::DataAccess(_) => "Data Access Error",
            DashboardError::Validation(_) => "Validation Error",
            DashboardError::NotFound(_) => "Resource Not Found",
            DashboardError::Computation(_) => "Computation Error",
            DashboardError::DatabaseConfig(_) => "Database Configuration Error",
            DashboardError::DatabaseConnection(_) => "Database Connection Error",
            DashboardError::Serialization(_) => "Serialization Error",
            DashboardError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            DashboardError::DataAccess(msg)
            | DashboardError::Validation(msg)
            | DashboardError::NotFound(msg)
            | DashboardError::Computation(msg)
            | DashboardError::DatabaseConfig(msg)
            | DashboardError::DatabaseConnection(msg)
            | DashboardError::Serialization(msg)
            | DashboardError::FileOperation(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::DataAccess(_) | DashboardError::DatabaseConnection(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            DashboardError::Computation(_)
            | DashboardError::DatabaseConfig(_)
            | DashboardError::Serialization(_)
            | DashboardError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DashboardError {}

// 便捷的构造函数
impl DashboardError {
    pub fn data_access<T: Into<String>>(msg: T) -> Self {
        DashboardError::DataAccess(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        DashboardError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        DashboardError::NotFound(msg.into())
    }

    pub fn computation<T: Into<String>>(msg: T) -> Self {
        DashboardError::Computation(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        DashboardError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        DashboardError::DatabaseConnection(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        DashboardError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        DashboardError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for DashboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        DashboardError::DataAccess(err.to_string())
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for DashboardError {
    fn from(err: chrono::ParseError) -> Self {
        DashboardError::Computation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            DashboardError::data_access("x"),
            DashboardError::validation("x"),
            DashboardError::not_found("x"),
            DashboardError::computation("x"),
            DashboardError::database_config("x"),
            DashboardError::database_connection("x"),
            DashboardError::serialization("x"),
            DashboardError::file_operation("x"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            DashboardError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DashboardError::not_found("gone").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DashboardError::data_access("down").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            DashboardError::computation("corrupt").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = DashboardError::not_found("record 42");
        assert_eq!(err.to_string(), "Resource Not Found: record 42");
    }

    #[test]
    fn test_from_db_err_is_data_access() {
        let err: DashboardError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DashboardError::DataAccess(_)));
    }
}
