//! Integration tests for Layer 1: Storage
//!
//! Tests for the rule store snapshot and rule table loading.

mod store;
