//! Outbound HTTP plumbing shared by third-party integrations.

pub mod client;
