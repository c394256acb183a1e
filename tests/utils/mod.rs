pub mod assertions;
pub mod mocks;
pub mod server;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{assert_no_duplicates, assert_received, assert_received_nothing};
#[allow(unused_imports)]
pub use mocks::MockConnection;
#[allow(unused_imports)]
pub use server::{ClientSocket, TestServer};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder, TestSubscriber};
