//! Pipeline stages for turning a voice memo into rendered sections.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different transport) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ upload ──▶ render
//! (local)      (HTTP)     (pure)
//! ```
//!
//! 1. [`validate`]: resolve the local file, infer its media type, enforce
//!    the size ceiling and premium gating; nothing touches the network until
//!    this passes
//! 2. [`upload`]:   multipart POST to the format's endpoint with bounded
//!    retry on server errors; the only stage with I/O
//! 3. [`render`]:   map the decoded payload to display sections; pure
//!    functions over the data, no I/O

pub mod render;
pub mod upload;
pub mod validate;
