//! Admin / Dashboard API 类型定义

use serde::{Deserialize, Serialize};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ListRecordsQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct DeleteRecordQuery {
    #[serde(default)]
    pub hard: bool,
}

/// 创建记录后返回的新 id
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreatedRecord {
    pub id: String,
}

/// 看板日期范围参数（`YYYY-MM-DD`，均可省略）
#[derive(Deserialize, Debug, Default)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ProjectionQuery {
    pub target_clients: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
    pub cache: HealthCacheCheck,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthCacheCheck {
    pub cache_type: String,
}
