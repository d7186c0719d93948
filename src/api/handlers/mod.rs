//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod health;
pub mod kontak;
pub mod layanan;
pub mod notifications;
pub mod permohonan;
pub mod status;
