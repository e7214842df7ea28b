// Test helpers shared by the integration and contract suites.
//
// Every helper builds services over freshly seeded in-memory stores with the
// simulated latency disabled, so tests are isolated and fast.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;

#![allow(dead_code)]

pub mod assertions;
pub mod test_app;
pub mod test_data;

pub use assertions::*;
pub use test_app::*;
pub use test_data::*;
