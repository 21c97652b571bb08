//! HTTP API tests

mod session_tests;
