//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::DashboardError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 记录错误
/// - 3000-3099: 看板计算错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 记录错误 2000-2099
    RecordNotFound = 2000,
    RecordValidationFailed = 2001,
    UnknownCollection = 2002,
    RecordDatabaseError = 2003,

    // 看板错误 3000-3099
    ComputationFailed = 3000,
    ForecastLocked = 3001,
}

impl From<&DashboardError> for ErrorCode {
    fn from(err: &DashboardError) -> Self {
        match err {
            DashboardError::Validation(_) => ErrorCode::RecordValidationFailed,
            DashboardError::NotFound(_) => ErrorCode::RecordNotFound,
            DashboardError::DataAccess(_) => ErrorCode::RecordDatabaseError,
            DashboardError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            DashboardError::Computation(_) => ErrorCode::ComputationFailed,
            DashboardError::DatabaseConfig(_)
            | DashboardError::Serialization(_)
            | DashboardError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::RecordNotFound).unwrap(),
            "2000"
        );
    }

    #[test]
    fn test_from_dashboard_error() {
        assert_eq!(
            ErrorCode::from(&DashboardError::not_found("x")),
            ErrorCode::RecordNotFound
        );
        assert_eq!(
            ErrorCode::from(&DashboardError::data_access("x")),
            ErrorCode::RecordDatabaseError
        );
        assert_eq!(
            ErrorCode::from(&DashboardError::computation("x")),
            ErrorCode::ComputationFailed
        );
    }
}
