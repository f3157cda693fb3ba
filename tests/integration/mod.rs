//! Integration tests
//!
//! Cross-module flows: the health router, the hosted auth client against a
//! mock HTTP server, and logout against real storage.

#[cfg(feature = "server")]
mod health_api_test;
mod logout_flow_test;
mod remote_auth_test;
