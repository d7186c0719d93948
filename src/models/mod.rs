mod kontak;
mod layanan;
mod permohonan;

pub use kontak::{ContactStatus, Kontak, NewKontak, ParseContactStatusError};
pub use layanan::Layanan;
pub use permohonan::{
    MISSING_SERVICE_NAME, NewPermohonan, ParseStatusError, Permohonan, PermohonanWithLayanan,
    RequestStatus, ServiceRequest, StatusTransition, UpdatePermohonanStatus,
};
