//! Job implementations.

pub mod share_sweep;

pub use share_sweep::ShareSweepJob;
