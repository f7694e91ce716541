//! Admin API 服务模块
//!
//! 该模块包含记录管理端点：
//! - 广告花费 / 来电咨询记录的增删改查
//! - 软删除与恢复
//! - campaign 下拉列表

pub mod error_code;
mod helpers;
mod records;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{
    api_result, error_from_dashboard, error_response, json_response, parse_collection,
    parse_date_range, success_response,
};

pub use error_code::ErrorCode;

pub use records::{
    create_record, delete_record, get_campaigns, get_record, list_records, query_error_handler,
    restore_record, update_record,
};
