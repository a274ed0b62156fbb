//! Postgres 读数存储实现
//!
//! 读数只增不改；时间窗口查询依赖 (device_id, ts_ms) 索引。

use crate::error::StorageError;
use crate::models::{ReadingFilter, ReadingRecord};
use crate::traits::ReadingStore;
use domain::ReadingStatus;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const READING_COLUMNS: &str = "id, device_id, temperature, battery, status, ts_ms";

pub struct PgReadingStore {
    pub pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn map_reading_row(row: &PgRow) -> Result<ReadingRecord, StorageError> {
    let status: String = row.try_get("status")?;
    let status = ReadingStatus::parse(&status)
        .ok_or_else(|| StorageError::new("invalid reading status"))?;
    Ok(ReadingRecord {
        id: row.try_get("id")?,
        device_id: row.try_get("device_id")?,
        temperature: row.try_get("temperature")?,
        battery: row.try_get("battery")?,
        status,
        ts_ms: row.try_get("ts_ms")?,
    })
}

#[async_trait::async_trait]
impl ReadingStore for PgReadingStore {
    async fn create_reading(&self, record: ReadingRecord) -> Result<ReadingRecord, StorageError> {
        sqlx::query(
            "insert into readings (id, device_id, temperature, battery, status, ts_ms) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.id)
        .bind(&record.device_id)
        .bind(record.temperature)
        .bind(record.battery)
        .bind(record.status.as_str())
        .bind(record.ts_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn create_readings(&self, records: &[ReadingRecord]) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(
                "insert into readings (id, device_id, temperature, battery, status, ts_ms) \
                 values ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&record.id)
            .bind(&record.device_id)
            .bind(record.temperature)
            .bind(record.battery)
            .bind(record.status.as_str())
            .bind(record.ts_ms)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(records.len())
    }

    async fn list_readings(
        &self,
        filter: &ReadingFilter,
    ) -> Result<Vec<ReadingRecord>, StorageError> {
        let limit = filter.limit.unwrap_or(1000) as i64;
        let rows = sqlx::query(&format!(
            "select {READING_COLUMNS} from readings \
             where ($1::text is null or device_id = $1) \
             and ($2::text is null or status = $2) \
             and ($3::bigint is null or ts_ms >= $3) \
             order by ts_ms desc \
             limit $4",
        ))
        .bind(filter.device_id.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.since_ms)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        let mut readings = Vec::with_capacity(rows.len());
        for row in rows {
            readings.push(map_reading_row(&row)?);
        }
        Ok(readings)
    }

    async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> Result<Option<ReadingRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {READING_COLUMNS} from readings \
             where device_id = $1 order by ts_ms desc limit 1",
        ))
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(map_reading_row(&row)?))
    }

    async fn latest_per_device(&self) -> Result<Vec<ReadingRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select distinct on (device_id) {READING_COLUMNS} from readings \
             order by device_id, ts_ms desc",
        ))
        .fetch_all(&self.pool)
        .await?;
        let mut readings = Vec::with_capacity(rows.len());
        for row in rows {
            readings.push(map_reading_row(&row)?);
        }
        Ok(readings)
    }

    async fn count_since(&self, since_ms: i64) -> Result<u64, StorageError> {
        let row = sqlx::query("select count(*) as count from readings where ts_ms >= $1")
            .bind(since_ms)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }
}
