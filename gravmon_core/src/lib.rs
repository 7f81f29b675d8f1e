#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Motion sampling and denoising pipeline (source-agnostic).
//!
//! This crate turns a stream of device-motion readings into a single smoothed
//! scalar per sample: the component of user acceleration along the gravity
//! vector. All sensor interaction goes through the
//! `gravmon_traits::MotionSource` seam.
//!
//! ## Architecture
//!
//! - **Filtering**: bounded-window moving average (`filter` module)
//! - **Orchestration**: `MotionMonitor` owns the source subscription, the
//!   serialized delivery worker, the deadband, and observer fan-out
//!   (`monitor` module)
//! - **Observers**: non-owning, insertion-ordered listener registry
//!   (`observer` module)
//!
//! ## Delivery model
//!
//! The source pushes readings into a depth-1 bounded channel; one worker
//! thread drains it. A single producer context plus a single consumer gives
//! arrival-order, one-at-a-time processing, and a reading that arrives while
//! the worker is still busy is dropped rather than queued.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod mocks;
pub mod monitor;
pub mod observer;
pub mod util;

pub use builder::{Missing, MotionMonitorBuilder};
pub use config::{FilterCfg, SamplerCfg};
pub use error::{BuildError, MonitorError, Result};
pub use filter::MovingAverage;
pub use monitor::MotionMonitor;
pub use observer::MotionObserver;
