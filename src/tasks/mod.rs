//! Background Tasks Module
//!
//! Contains cache work that runs outside the caller's request path.
//!
//! # Tasks
//! - Preload: warms the cache with high-priority sections immediately and
//!   low-priority sections after a short delay

mod preload;

pub use preload::{PreloadScheduler, PreloadSection, Priority, PRELOAD_OPERATION_KEY};
