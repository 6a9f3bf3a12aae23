//! Integration tests for Grandeur.
//!
//! Tests live in `tests/` and exercise the pipeline's logic across crate
//! boundaries without requiring a live database: totals and snapshots,
//! line-item state transitions, gateway payload handling, and the
//! idempotency contract of verification as seen through the gateway seam.

#![cfg_attr(not(test), forbid(unsafe_code))]
