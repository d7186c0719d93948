//! Repository layer for data access operations.

mod kontak_repo;
mod layanan_repo;
mod permohonan_repo;
mod traits;

pub use kontak_repo::KontakRepository;
pub use layanan_repo::LayananRepository;
pub use permohonan_repo::PermohonanRepository;
pub use traits::{KontakFilter, KontakStore, PermohonanStore};

use crate::db::AsyncDbPool;
use crate::error::AppError;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub permohonan: PermohonanRepository,
    pub layanan: LayananRepository,
    pub kontak: KontakRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            permohonan: PermohonanRepository::new(pool.clone()),
            layanan: LayananRepository::new(pool.clone()),
            kontak: KontakRepository::new(pool),
        }
    }
}

pub(crate) fn pool_error<E>(error: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::ConnectionPool {
        source: anyhow::Error::from(error),
    }
}
