//! Admin API 路由配置

use actix_web::web;

use super::records::{
    create_record, delete_record, get_campaigns, get_record, list_records, restore_record,
    update_record,
};

/// 记录管理路由 `/records`
///
/// 包含：
/// - GET /records/{collection} - 列出记录
/// - POST /records/{collection} - 创建记录
/// - GET /records/{collection}/{id} - 获取单条记录
/// - PUT /records/{collection}/{id} - 部分更新
/// - DELETE /records/{collection}/{id} - 软删除（`?hard=true` 物理删除）
/// - POST /records/{collection}/{id}/restore - 恢复软删除
pub fn records_routes() -> actix_web::Scope {
    web::scope("/records")
        .route("/{collection}", web::get().to(list_records))
        .route("/{collection}", web::post().to(create_record))
        .route("/{collection}/{id}/restore", web::post().to(restore_record))
        .route("/{collection}/{id}", web::get().to(get_record))
        .route("/{collection}/{id}", web::put().to(update_record))
        .route("/{collection}/{id}", web::delete().to(delete_record))
}

/// Admin v1 全部路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .app_data(web::JsonConfig::default().error_handler(super::records::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(super::records::query_error_handler))
        .route("/campaigns", web::get().to(get_campaigns))
        .service(records_routes())
}
