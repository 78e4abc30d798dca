use crate::domain::{models::tourist::Tourist, ports::TouristRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::error;

const COLUMNS: &str = "id, provider_subject, name, national_id, date_of_birth, gender, mobile, username, password_hash, email, tourist_id, qr_code_path, latitude, longitude, safety_score, created_at, updated_at";

pub struct PostgresTouristRepo {
    pool: PgPool,
}

impl PostgresTouristRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TouristRepository for PostgresTouristRepo {
    async fn create(&self, tourist: &Tourist) -> Result<Tourist, AppError> {
        let sql = format!(
            "INSERT INTO tourists ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tourist>(&sql)
            .bind(&tourist.id)
            .bind(&tourist.provider_subject)
            .bind(&tourist.name)
            .bind(&tourist.national_id)
            .bind(&tourist.date_of_birth)
            .bind(&tourist.gender)
            .bind(&tourist.mobile)
            .bind(&tourist.username)
            .bind(&tourist.password_hash)
            .bind(&tourist.email)
            .bind(&tourist.tourist_id)
            .bind(&tourist.qr_code_path)
            .bind(tourist.latitude)
            .bind(tourist.longitude)
            .bind(tourist.safety_score)
            .bind(tourist.created_at)
            .bind(tourist.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres tourist insert failed: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_provider_subject(&self, subject: &str) -> Result<Option<Tourist>, AppError> {
        sqlx::query_as::<_, Tourist>(&format!("SELECT {COLUMNS} FROM tourists WHERE provider_subject = $1"))
            .bind(subject)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_tourist_id(&self, tourist_id: &str) -> Result<Option<Tourist>, AppError> {
        sqlx::query_as::<_, Tourist>(&format!("SELECT {COLUMNS} FROM tourists WHERE tourist_id = $1"))
            .bind(tourist_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_location(&self, id: &str, latitude: f64, longitude: f64, safety_score: i32) -> Result<Tourist, AppError> {
        sqlx::query_as::<_, Tourist>(&format!(
            "UPDATE tourists SET latitude = $1, longitude = $2, safety_score = $3, updated_at = $4 WHERE id = $5 RETURNING {COLUMNS}"
        ))
            .bind(latitude)
            .bind(longitude)
            .bind(safety_score)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
