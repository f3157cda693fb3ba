//! Property-based tests
//!
//! Uses proptest to generate random inputs and verify properties

mod compat_proptest;
mod mock_auth_proptest;
