//! SeaORM storage backend
//!
//! Supports SQLite, MySQL/MariaDB and PostgreSQL through the same entities.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{DashboardError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    ad_spend_to_active_model, call_inquiry_to_active_model, model_to_ad_spend,
    model_to_call_inquiry,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(DashboardError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based record storage
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_policy: retry::RetryPolicy,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移，重试策略取自全局配置
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        let config = crate::config::get_config();
        Self::connect(
            database_url,
            backend_name,
            config.database.pool_size,
            retry::RetryPolicy::from_config(&config.database),
        )
        .await
    }

    /// 不依赖全局配置的构造方式（测试、一次性命令）
    pub async fn connect(
        database_url: &str,
        backend_name: &str,
        pool_size: u32,
        retry_policy: retry::RetryPolicy,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(DashboardError::database_config("DATABASE_URL 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, pool_size).await?
        };

        run_migrations(&db).await?;

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_policy,
        };

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(
            infer_backend_from_url("sqlite://data.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(infer_backend_from_url("local.sqlite").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("mariadb://u:p@h/db").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://u@h/db").unwrap(),
            "postgres"
        );
        assert!(matches!(
            infer_backend_from_url("redis://localhost"),
            Err(DashboardError::DatabaseConfig(_))
        ));
    }
}
