//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache instance.
//!
//! # Tasks
//! - Expiry Sweep: removes expired entries once per TTL interval

mod sweeper;

pub use sweeper::spawn_sweep_task;
