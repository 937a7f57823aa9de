//! Infrastructure layer
//!
//! Adapters between the domain seams and the outside world: frame transports
//! and wire DTOs.

pub mod dto;
pub mod transport;
