//! Core use-case services.
//!
//! # Responsibility
//! - Combine the session store with the persistence gateway.
//! - Keep FFI/CLI hosts decoupled from storage details.

pub mod board_service;
