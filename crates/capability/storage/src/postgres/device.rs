//! Postgres 设备存储实现
//!
//! 通过 SQL 查询实现设备 CRUD 与批量状态更新。
//!
//! 设计要点：
//! - 使用参数化 SQL 防止注入
//! - 部分更新使用 coalesce 保留原值
//! - 状态以规范字符串落库，读取时解析为枚举

use crate::error::StorageError;
use crate::models::{DeviceFilter, DeviceRecord, DeviceUpdate};
use crate::traits::DeviceStore;
use domain::DeviceStatus;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const DEVICE_COLUMNS: &str = "id, device_id, name, location, latitude, longitude, \
     min_temp, max_temp, battery, status, is_active, created_at_ms, updated_at_ms";

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    now.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn map_device_row(row: &PgRow) -> Result<DeviceRecord, StorageError> {
    let status: String = row.try_get("status")?;
    let status = DeviceStatus::parse(&status)
        .ok_or_else(|| StorageError::new("invalid device status"))?;
    Ok(DeviceRecord {
        id: row.try_get("id")?,
        device_id: row.try_get("device_id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        min_temp: row.try_get("min_temp")?,
        max_temp: row.try_get("max_temp")?,
        battery: row.try_get("battery")?,
        status,
        is_active: row.try_get("is_active")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<DeviceRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from devices \
             where ($1::text is null or status = $1) \
             and ($2::boolean is null or is_active = $2) \
             order by device_id",
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await?;
        let mut devices = Vec::with_capacity(rows.len());
        for row in rows {
            devices.push(map_device_row(&row)?);
        }
        Ok(devices)
    }

    async fn find_device(&self, id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from devices where id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_device_row(&row)?))
    }

    async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from devices where device_id = $1",
        ))
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_device_row(&row)?))
    }

    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        sqlx::query(
            "insert into devices (id, device_id, name, location, latitude, longitude, \
             min_temp, max_temp, battery, status, is_active, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&record.id)
        .bind(&record.device_id)
        .bind(&record.name)
        .bind(&record.location)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.min_temp)
        .bind(record.max_temp)
        .bind(record.battery)
        .bind(record.status.as_str())
        .bind(record.is_active)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_device(
        &self,
        id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update devices set \
             name = coalesce($1, name), \
             location = coalesce($2, location), \
             latitude = coalesce($3, latitude), \
             longitude = coalesce($4, longitude), \
             min_temp = coalesce($5, min_temp), \
             max_temp = coalesce($6, max_temp), \
             battery = coalesce($7, battery), \
             status = coalesce($8, status), \
             is_active = coalesce($9, is_active), \
             updated_at_ms = $10 \
             where id = $11 \
             returning {DEVICE_COLUMNS}",
        ))
        .bind(update.name)
        .bind(update.location)
        .bind(update.latitude)
        .bind(update.longitude)
        .bind(update.min_temp)
        .bind(update.max_temp)
        .bind(update.battery)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.is_active)
        .bind(now_epoch_ms())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_device_row(&row)?))
    }

    async fn update_status_many(
        &self,
        ids: &[String],
        status: DeviceStatus,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "update devices set status = $1, updated_at_ms = $2 \
             where id = any($3) \
             returning {DEVICE_COLUMNS}",
        ))
        .bind(status.as_str())
        .bind(now_epoch_ms())
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        let mut devices = Vec::with_capacity(rows.len());
        for row in rows {
            devices.push(map_device_row(&row)?);
        }
        Ok(devices)
    }

    async fn count_devices(&self, filter: &DeviceFilter) -> Result<u64, StorageError> {
        let row = sqlx::query(
            "select count(*) as count from devices \
             where ($1::text is null or status = $1) \
             and ($2::boolean is null or is_active = $2)",
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.is_active)
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }
}
