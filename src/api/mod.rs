//! HTTP 接口层：看板只读接口、记录管理接口与健康检查
pub mod middleware;
pub mod services;
