//! Contract validation harness for `design-review` wire schemas.
//!
//! All checks live in `tests/`; this library target only anchors the crate.
