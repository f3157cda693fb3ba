//! Custom assertion macros and utilities

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that no persisted auth artifact is left in a store
#[macro_export]
macro_rules! assert_logged_out {
    ($store:expr) => {
        for key in trashdrop::shared::AUTH_ARTIFACT_KEYS {
            assert!(
                !trashdrop::shared::KeyValueStore::contains($store, key),
                "auth artifact '{}' survived logout",
                key
            );
        }
    };
}
