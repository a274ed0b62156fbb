//! Postgres 告警存储实现
//!
//! find_recent 是去重门的查询入口，依赖
//! (device_id, alert_type, created_at_ms) 索引。

use crate::error::StorageError;
use crate::models::{AlertFilter, AlertRecord};
use crate::traits::AlertStore;
use domain::{AlertSeverity, AlertType};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const ALERT_COLUMNS: &str = "id, device_id, alert_type, severity, title, message, \
     is_read, is_resolved, resolved_at_ms, resolved_by, created_at_ms";

pub struct PgAlertStore {
    pub pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn map_alert_row(row: &PgRow) -> Result<AlertRecord, StorageError> {
    let alert_type: String = row.try_get("alert_type")?;
    let alert_type =
        AlertType::parse(&alert_type).ok_or_else(|| StorageError::new("invalid alert type"))?;
    let severity: String = row.try_get("severity")?;
    let severity = AlertSeverity::parse(&severity)
        .ok_or_else(|| StorageError::new("invalid alert severity"))?;
    Ok(AlertRecord {
        id: row.try_get("id")?,
        device_id: row.try_get("device_id")?,
        alert_type,
        severity,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        is_resolved: row.try_get("is_resolved")?,
        resolved_at_ms: row.try_get("resolved_at_ms")?,
        resolved_by: row.try_get("resolved_by")?,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

#[async_trait::async_trait]
impl AlertStore for PgAlertStore {
    async fn create_alert(&self, record: AlertRecord) -> Result<AlertRecord, StorageError> {
        sqlx::query(
            "insert into alerts (id, device_id, alert_type, severity, title, message, \
             is_read, is_resolved, resolved_at_ms, resolved_by, created_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&record.id)
        .bind(&record.device_id)
        .bind(record.alert_type.as_str())
        .bind(record.severity.as_str())
        .bind(&record.title)
        .bind(&record.message)
        .bind(record.is_read)
        .bind(record.is_resolved)
        .bind(record.resolved_at_ms)
        .bind(&record.resolved_by)
        .bind(record.created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_recent(
        &self,
        device_id: &str,
        alert_type: AlertType,
        since_ms: i64,
    ) -> Result<Option<AlertRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {ALERT_COLUMNS} from alerts \
             where device_id = $1 and alert_type = $2 and created_at_ms >= $3 \
             order by created_at_ms desc limit 1",
        ))
        .bind(device_id)
        .bind(alert_type.as_str())
        .bind(since_ms)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_alert_row(&row)?))
    }

    async fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<AlertRecord>, StorageError> {
        let limit = filter.limit.unwrap_or(1000) as i64;
        let rows = sqlx::query(&format!(
            "select {ALERT_COLUMNS} from alerts \
             where ($1::boolean = false or is_resolved = false) \
             order by created_at_ms desc \
             limit $2",
        ))
        .bind(filter.unresolved_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        let mut alerts = Vec::with_capacity(rows.len());
        for row in rows {
            alerts.push(map_alert_row(&row)?);
        }
        Ok(alerts)
    }

    async fn count_since(&self, since_ms: i64) -> Result<u64, StorageError> {
        let row = sqlx::query("select count(*) as count from alerts where created_at_ms >= $1")
            .bind(since_ms)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    async fn mark_read(&self, id: &str) -> Result<Option<AlertRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update alerts set is_read = true where id = $1 returning {ALERT_COLUMNS}",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_alert_row(&row)?))
    }

    async fn resolve(
        &self,
        id: &str,
        resolved_by: Option<&str>,
        resolved_at_ms: i64,
    ) -> Result<Option<AlertRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update alerts set is_resolved = true, resolved_at_ms = $1, resolved_by = $2 \
             where id = $3 returning {ALERT_COLUMNS}",
        ))
        .bind(resolved_at_ms)
        .bind(resolved_by)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_alert_row(&row)?))
    }
}
