//! Citizen notifications over WhatsApp.
//!
//! The pathway is split into a phone normalizer, a message templater, a
//! gateway (`NotificationProvider`, implemented for Fonnte) and the
//! `NotificationService` orchestrator that ties them together.

mod fonnte_provider;
mod phone;
mod provider;

pub mod notification_service;
pub mod templates;

pub use fonnte_provider::FonnteProvider;
pub use notification_service::NotificationService;
pub use phone::{COUNTRY_PREFIX, NormalizedAddress, normalize_phone};
pub use provider::{DeliveryResult, NotificationProvider, TransportError};
pub use templates::{MessageTemplates, OutboundMessage};
