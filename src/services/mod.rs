//! Business logic services.

pub mod latest_service;
pub mod publish_service;
