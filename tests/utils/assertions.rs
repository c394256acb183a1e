//! Test assertion helpers
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;
use std::collections::HashSet;

use super::mocks::MockConnection;

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a connection received exactly these payloads, in order
pub fn assert_received(connection: &MockConnection, expected: &[Value]) {
    let received = connection.received();
    assert_eq!(
        received.as_slice(),
        expected,
        "connection received unexpected payloads"
    );
}

pub fn assert_received_nothing(connection: &MockConnection) {
    let received = connection.received();
    assert!(
        received.is_empty(),
        "connection should not have received anything, got {:?}",
        received
    );
}

/// Assert that no message id was delivered twice to the same connection
pub fn assert_no_duplicates(connection: &MockConnection) {
    let mut seen = HashSet::new();
    for payload in connection.received() {
        let id = payload["value"]["id"]
            .as_str()
            .expect("payload without id")
            .to_string();
        assert!(seen.insert(id.clone()), "event {} delivered twice", id);
    }
}
