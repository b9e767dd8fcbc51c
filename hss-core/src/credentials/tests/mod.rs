//! Credential test suite
//!
//! Unit tests per operation, plus edge cases that cross module lines


// Test helpers and fixtures
pub mod helpers;
