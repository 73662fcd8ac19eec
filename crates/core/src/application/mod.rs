// Application Layer - Use Cases and Business Logic

pub mod sweeper;
pub mod waitlist;

// Re-exports
pub use sweeper::{shutdown_channel, sweep_expired, ShutdownSender, ShutdownToken, Sweeper};
pub use waitlist::{SubmitRequest, WaitlistConfig, WaitlistService};
