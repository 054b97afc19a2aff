//! Application layer containing the game orchestration.
//!
//! This module defines the `RevolverEngine`, the entry point every tool call
//! goes through. It drives the domain `Game` and calls out to the moderation
//! and timeout ports.

pub mod engine;
