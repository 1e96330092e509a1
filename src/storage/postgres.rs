//! PostgreSQL implementation of the storage seam.
//!
//! Queries use the runtime `query_as` API over the shared pool. Dynamic
//! filters are assembled with `QueryBuilder`; every user-supplied value goes
//! through a bind parameter.

use crate::error::Result;
use crate::models::{Machine, NewPrediction, NewSensorReading, Prediction, SensorReading};
use crate::pagination::{paginate, CursorPage, PageRequest};
use crate::storage::{PredictionFilter, ReadingFilter, Storage};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn machine(&self, machine_id: Uuid) -> Result<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            SELECT machine_id, code, name, machine_type, location, status, metadata, created_at
            FROM machines
            WHERE machine_id = $1
            "#,
        )
        .bind(machine_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(machine)
    }

    async fn active_machines(&self) -> Result<Vec<Machine>> {
        let machines = sqlx::query_as::<_, Machine>(
            r#"
            SELECT machine_id, code, name, machine_type, location, status, metadata, created_at
            FROM machines
            WHERE status = 'ACTIVE'
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(machines)
    }

    async fn insert_reading(&self, reading: NewSensorReading) -> Result<SensorReading> {
        let inserted = sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensor_readings (
                reading_id, machine_id, air_temperature_k, process_temperature_k,
                rotational_speed_rpm, torque_nm, tool_wear_min, is_processed, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, false, NOW())
            RETURNING reading_id, machine_id, air_temperature_k, process_temperature_k,
                      rotational_speed_rpm, torque_nm, tool_wear_min, is_processed,
                      processed_at, recorded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reading.machine_id)
        .bind(reading.air_temperature_k)
        .bind(reading.process_temperature_k)
        .bind(reading.rotational_speed_rpm)
        .bind(reading.torque_nm)
        .bind(reading.tool_wear_min)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn unprocessed_readings(&self) -> Result<Vec<SensorReading>> {
        let readings = sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT reading_id, machine_id, air_temperature_k, process_temperature_k,
                   rotational_speed_rpm, torque_nm, tool_wear_min, is_processed,
                   processed_at, recorded_at
            FROM sensor_readings
            WHERE is_processed = false
            ORDER BY recorded_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn readings_page(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> Result<CursorPage<SensorReading>> {
        let limit = page.effective_limit();

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT reading_id, machine_id, air_temperature_k, process_temperature_k, \
             rotational_speed_rpm, torque_nm, tool_wear_min, is_processed, \
             processed_at, recorded_at FROM sensor_readings WHERE 1 = 1",
        );

        if let Some(machine_id) = filter.machine_id {
            builder.push(" AND machine_id = ").push_bind(machine_id);
        }
        if filter.unprocessed_only {
            builder.push(" AND is_processed = false");
        }
        if let Some(cursor) = page.cursor {
            builder.push(" AND recorded_at < ").push_bind(cursor);
        }

        builder
            .push(" ORDER BY recorded_at DESC LIMIT ")
            .push_bind((limit + 1) as i64);

        let rows = builder
            .build_query_as::<SensorReading>()
            .fetch_all(&self.pool)
            .await?;

        Ok(paginate(rows, limit, |r| r.recorded_at))
    }

    async fn record_prediction(&self, prediction: NewPrediction) -> Result<Prediction> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Prediction>(
            r#"
            INSERT INTO ai_predictions (
                prediction_id, reading_id, machine_id, is_failure, failure_type,
                confidence_score, explanation_data, natural_language_reason, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (reading_id) DO UPDATE SET
                is_failure = EXCLUDED.is_failure,
                failure_type = EXCLUDED.failure_type,
                confidence_score = EXCLUDED.confidence_score,
                explanation_data = EXCLUDED.explanation_data,
                natural_language_reason = EXCLUDED.natural_language_reason
            RETURNING prediction_id, reading_id, machine_id, is_failure, failure_type,
                      confidence_score, explanation_data, natural_language_reason, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(prediction.reading_id)
        .bind(prediction.machine_id)
        .bind(prediction.is_failure)
        .bind(&prediction.failure_type)
        .bind(prediction.confidence_score)
        .bind(&prediction.explanation_data)
        .bind(&prediction.natural_language_reason)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE sensor_readings SET is_processed = true, processed_at = NOW() \
             WHERE reading_id = $1",
        )
        .bind(prediction.reading_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn prediction_for_reading(&self, reading_id: Uuid) -> Result<Option<Prediction>> {
        let prediction = sqlx::query_as::<_, Prediction>(
            r#"
            SELECT prediction_id, reading_id, machine_id, is_failure, failure_type,
                   confidence_score, explanation_data, natural_language_reason, created_at
            FROM ai_predictions
            WHERE reading_id = $1
            "#,
        )
        .bind(reading_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prediction)
    }

    async fn predictions_page(
        &self,
        filter: PredictionFilter,
        page: PageRequest,
    ) -> Result<CursorPage<Prediction>> {
        let limit = page.effective_limit();

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT prediction_id, reading_id, machine_id, is_failure, failure_type, \
             confidence_score, explanation_data, natural_language_reason, created_at \
             FROM ai_predictions WHERE 1 = 1",
        );

        if let Some(machine_id) = filter.machine_id {
            builder.push(" AND machine_id = ").push_bind(machine_id);
        }
        if filter.failures_only {
            builder.push(" AND is_failure = true");
        }
        if let Some(cursor) = page.cursor {
            builder.push(" AND created_at < ").push_bind(cursor);
        }

        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind((limit + 1) as i64);

        let rows = builder
            .build_query_as::<Prediction>()
            .fetch_all(&self.pool)
            .await?;

        Ok(paginate(rows, limit, |p| p.created_at))
    }
}
