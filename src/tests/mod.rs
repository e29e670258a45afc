//! Test suite for the block engine
//!
//! Tests are grouped by concern: classification and extraction, the editor
//! session, the template store, end-to-end flows, and property tests.

#[cfg(test)]
mod integration;
