//! SeaORM recorder backend
//!
//! Writes one `lookup_requests` row per upstream lookup. SQLite, MySQL/MariaDB
//! and PostgreSQL are supported; the backend is inferred from the URL.

mod connection;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryOrder, QuerySelect,
};
use tracing::{debug, info};

use super::models::LookupRecord;
use super::recorder::Recorder;
use crate::config::DatabaseConfig;
use crate::errors::{GeoLookupError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

use migration::entities::lookup_request;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
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
        Err(GeoLookupError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, *.db, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

#[derive(Clone)]
pub struct SeaOrmRecorder {
    db: DatabaseConnection,
}

impl SeaOrmRecorder {
    /// Connect, run migrations and return a ready recorder
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(GeoLookupError::database_config("database_url 未设置"));
        }

        let backend_name = infer_backend_from_url(database_url)?;
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config).await?
        } else {
            connect_generic(database_url, &backend_name, config).await?
        };

        run_migrations(&db).await?;

        info!("{} recorder initialized", backend_name.to_uppercase());
        Ok(Self { db })
    }

    /// 已记录的查询总数
    pub async fn count(&self) -> Result<u64> {
        Ok(lookup_request::Entity::find().count(&self.db).await?)
    }

    /// 最近的 `limit` 条记录，按写入顺序倒序
    pub async fn recent(&self, limit: u64) -> Result<Vec<LookupRecord>> {
        let rows = lookup_request::Entity::find()
            .order_by_desc(lookup_request::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LookupRecord {
                ip_address: row.ip_address,
                lookup_time: row.lookup_time,
                success: row.lookup_status,
            })
            .collect())
    }

    pub async fn close(&self) -> Result<()> {
        self.db.clone().close().await.map_err(|e| {
            GeoLookupError::database_connection(format!("关闭数据库连接失败: {}", e))
        })
    }
}

#[async_trait]
impl Recorder for SeaOrmRecorder {
    async fn record(&self, record: LookupRecord) -> Result<()> {
        let model = lookup_request::ActiveModel {
            id: NotSet,
            ip_address: Set(record.ip_address),
            lookup_time: Set(record.lookup_time),
            lookup_status: Set(record.success),
        };

        let inserted = model.insert(&self.db).await?;
        debug!(
            "Recorded lookup #{} for {} (success: {})",
            inserted.id, inserted.ip_address, inserted.lookup_status
        );
        Ok(())
    }

    async fn stored_count(&self) -> Result<Option<u64>> {
        Ok(Some(self.count().await?))
    }

    fn name(&self) -> &'static str {
        "sea-orm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("geolookup.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite://data/geo.db?mode=rwc").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgresql://u@h/db").unwrap(), "postgres");
        assert!(matches!(
            infer_backend_from_url("redis://localhost"),
            Err(GeoLookupError::DatabaseConfig(_))
        ));
    }
}
