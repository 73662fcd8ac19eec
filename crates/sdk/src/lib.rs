//! Waitlist SDK - Rust Client Library
//!
//! Typed async client for the Waitlist Engine HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use waitlist_sdk::{SubmitRequest, WaitlistClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WaitlistClient::connect("http://127.0.0.1:8787")?;
//!
//!     let entry = client
//!         .submit(&SubmitRequest {
//!             name: "Grace".to_string(),
//!             activities: vec!["shower".to_string()],
//!             urgency: false,
//!             timestamp: None,
//!         })
//!         .await?;
//!
//!     println!("Joined as {}", entry.id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::WaitlistClient;
pub use error::{Result, SdkError};
pub use types::{
    Activity, CleanupResponse, Entry, EntryStatus, HealthResponse, QueuePosition, RemoveResponse,
    SubmitRequest,
};
