//! Motivation text generation
//!
//! Thin client for the external text-completion service. The analytics
//! core only supplies structured facts ([`crate::types::InsightFacts`]);
//! prompt wording and model choice live on the other side of this
//! boundary.
//!
//! Motivation text is always best-effort enrichment: callers must treat
//! a failure here as "no text", never as a failed request.

pub mod client;

pub use client::{MotivationClient, MotivationResponse};
