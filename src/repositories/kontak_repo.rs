//! Contact message repository.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::pool_error;
use super::traits::{KontakFilter, KontakStore};
use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{ContactStatus, Kontak, NewKontak};
use crate::schema::kontak;

#[derive(Clone)]
pub struct KontakRepository {
    pool: AsyncDbPool,
}

impl KontakRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Escapes `%`, `_` and `\` so user input only ever matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn filtered(filter: &KontakFilter) -> kontak::BoxedQuery<'static, Pg> {
    let mut query = kontak::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(kontak::status.eq(status));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        query = query.filter(
            kontak::nama
                .ilike(pattern.clone())
                .or(kontak::email.ilike(pattern.clone()))
                .or(kontak::subjek.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl KontakStore for KontakRepository {
    async fn create(&self, message: &NewKontak) -> Result<Kontak, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(kontak::table)
            .values(message)
            .returning(Kontak::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, kontak_id: i32) -> Result<Option<Kontak>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        kontak::table
            .find(kontak_id)
            .select(Kontak::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_paginated(
        &self,
        filter: &KontakFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Kontak>, i64), AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let total: i64 = filtered(filter).count().get_result(&mut conn).await?;

        let rows = filtered(filter)
            .select(Kontak::as_select())
            .order((kontak::created_at.desc(), kontak::id.desc()))
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await?;

        Ok((rows, total))
    }

    async fn set_status(
        &self,
        kontak_id: i32,
        status: ContactStatus,
    ) -> Result<Option<Kontak>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(kontak::table.find(kontak_id))
            .set((
                kontak::status.eq(status),
                kontak::updated_at.eq(diesel::dsl::now),
            ))
            .returning(Kontak::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn mark_read(&self, kontak_id: i32) -> Result<Option<Kontak>, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated = diesel::update(
            kontak::table
                .find(kontak_id)
                .filter(kontak::status.eq(ContactStatus::New)),
        )
        .set((
            kontak::status.eq(ContactStatus::Read),
            kontak::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Kontak::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;

        match updated {
            Some(row) => Ok(Some(row)),
            None => kontak::table
                .find(kontak_id)
                .select(Kontak::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(AppError::from),
        }
    }

    async fn delete(&self, kontak_id: i32) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(kontak::table.find(kontak_id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("budi"), "%budi%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
