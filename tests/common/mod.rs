//! Common test utilities for feed-aggregator integration tests


#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use server::*;
