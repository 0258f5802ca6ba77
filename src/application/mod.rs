//! Application layer (the review use-case).
//!
//! Orchestrates the infrastructure pieces into the sequential per-file
//! review flow without owning any IO of its own.

pub mod review;

pub use review::{run_review, run_review_in};
