//! Public catalogue of service categories.

use crate::error::{AppError, AppResult};
use crate::models::Layanan;
use crate::repositories::LayananRepository;

#[derive(Clone)]
pub struct LayananService {
    repo: LayananRepository,
}

impl LayananService {
    pub fn new(repo: LayananRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> AppResult<Vec<Layanan>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Layanan> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("layanan", "id", id))
    }
}
