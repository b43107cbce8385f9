//! Smoke benchmarks for the `design-review` encode path.
//!
//! All checks live in `tests/`; this library target only anchors the crate.
