//! Service request repository for async database operations.
//!
//! Reads always join the referenced `layanan` so callers get the service name
//! without a second round trip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use super::pool_error;
use super::traits::PermohonanStore;
use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{
    Layanan, NewPermohonan, Permohonan, PermohonanWithLayanan, RequestStatus, StatusTransition,
    UpdatePermohonanStatus,
};
use crate::schema::{layanan, permohonan};

/// Service request repository holding an async connection pool.
#[derive(Clone)]
pub struct PermohonanRepository {
    pool: AsyncDbPool,
}

impl PermohonanRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

async fn load_layanan(
    conn: &mut AsyncPgConnection,
    layanan_id: Option<i32>,
) -> Result<Option<Layanan>, diesel::result::Error> {
    match layanan_id {
        Some(layanan_id) => {
            layanan::table
                .find(layanan_id)
                .select(Layanan::as_select())
                .first(conn)
                .await
                .optional()
        }
        None => Ok(None),
    }
}

#[async_trait]
impl PermohonanStore for PermohonanRepository {
    async fn find_by_id(&self, request_id: i32) -> Result<Option<PermohonanWithLayanan>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        permohonan::table
            .left_join(layanan::table)
            .filter(permohonan::id.eq(request_id))
            .select((Permohonan::as_select(), Option::<Layanan>::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Finds a request by the registration code printed on the citizen's receipt.
    async fn find_by_registration(
        &self,
        code: &str,
    ) -> Result<Option<PermohonanWithLayanan>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        permohonan::table
            .left_join(layanan::table)
            .filter(permohonan::nomor_registrasi.eq(code))
            .select((Permohonan::as_select(), Option::<Layanan>::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_paginated(
        &self,
        status_filter: Option<RequestStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PermohonanWithLayanan>, i64), AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut count_query = permohonan::table.into_boxed();
        if let Some(status) = status_filter {
            count_query = count_query.filter(permohonan::status.eq(status));
        }
        let total: i64 = count_query.count().get_result(&mut conn).await?;

        let mut query = permohonan::table
            .left_join(layanan::table)
            .select((Permohonan::as_select(), Option::<Layanan>::as_select()))
            .order((permohonan::created_at.desc(), permohonan::id.desc()))
            .into_boxed();
        if let Some(status) = status_filter {
            query = query.filter(permohonan::status.eq(status));
        }

        let rows = query
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await?;

        Ok((rows, total))
    }

    async fn create(&self, request: &NewPermohonan) -> Result<PermohonanWithLayanan, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = diesel::insert_into(permohonan::table)
            .values(request)
            .returning(Permohonan::as_returning())
            .get_result(&mut conn)
            .await?;
        let layanan = load_layanan(&mut conn, row.layanan_id).await?;

        Ok((row, layanan))
    }

    async fn transition_status(
        &self,
        request_id: i32,
        changes: &UpdatePermohonanStatus,
    ) -> Result<Option<StatusTransition>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = changes.clone();

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                // Locks the row until commit; a concurrent change waits here
                // and then reads the status this one wrote.
                let previous: Option<RequestStatus> = permohonan::table
                    .find(request_id)
                    .select(permohonan::status)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(previous) = previous else {
                    return Ok(None);
                };

                let updated = diesel::update(permohonan::table.find(request_id))
                    .set((&changes, permohonan::updated_at.eq(diesel::dsl::now)))
                    .returning(Permohonan::as_returning())
                    .get_result(conn)
                    .await?;
                let layanan = load_layanan(conn, updated.layanan_id).await?;

                Ok(Some(StatusTransition {
                    previous,
                    permohonan: updated,
                    layanan,
                }))
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_many(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::delete(permohonan::table.filter(permohonan::id.eq_any(ids)))
            .returning(permohonan::id)
            .get_results(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
