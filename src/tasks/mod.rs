//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Removes expired quotes from the store at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
