//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the transaction boundaries for multi-step writes.

pub mod directory_service;
