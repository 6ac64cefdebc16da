//! # veritas-runtime
//!
//! [`VeritasRuntime`] constructs every service once at process start and is
//! handed by reference to whatever serves requests (an HTTP layer, a CLI).

mod runtime;

pub use runtime::{RuntimeOptions, RuntimeParts, VeritasRuntime};
