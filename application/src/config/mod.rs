//! Application-level configuration.
//!
//! - [`SessionParams`]: where and how a stream session sends its request
//! - [`TrackerParams`]: poll cadence and stall reporting for the job tracker

pub mod session_params;
pub mod tracker_params;

pub use session_params::SessionParams;
pub use tracker_params::TrackerParams;
