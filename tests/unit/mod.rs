//! Integration test entry point.

mod concurrency_tests;
mod feed_tests;
mod ordering_prop_tests;
mod snapshot_tests;
