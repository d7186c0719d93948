//! Read access to service categories.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::pool_error;
use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::Layanan;

#[derive(Clone)]
pub struct LayananRepository {
    pool: AsyncDbPool,
}

impl LayananRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, layanan_id: i32) -> Result<Option<Layanan>, AppError> {
        use crate::schema::layanan::dsl::*;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        layanan
            .filter(id.eq(layanan_id))
            .select(Layanan::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// All categories in the order they were created.
    pub async fn list(&self) -> Result<Vec<Layanan>, AppError> {
        use crate::schema::layanan::dsl::*;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        layanan
            .select(Layanan::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
