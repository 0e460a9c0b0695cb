//! Scheduled background tasks for NoteNest.
//!
//! Lazy deletion on read is the primary cleanup path for share links; the
//! cron sweep here catches links nobody reads again.

pub mod jobs;
pub mod scheduler;

pub use jobs::ShareSweepJob;
pub use scheduler::CronScheduler;
