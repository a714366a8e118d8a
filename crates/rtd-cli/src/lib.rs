//! CLI library components for the real-time dataset builder.

pub mod logging;
pub mod pipeline;
