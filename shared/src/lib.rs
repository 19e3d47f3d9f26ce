//! Re-exports the shared building blocks consumed by the backend services:
//! configuration handling, error types, the text-matching core (normalizer,
//! variation generator, similarity scorer, match classifier), the retry
//! combinator and Kafka helpers.

pub mod classify;
pub mod config;
pub mod dto;
pub mod error;
pub mod kafka;
pub mod normalize;
pub mod retry;
pub mod similarity;
