//! Sample test binary: two runnable fixtures and one that cannot be constructed.
//!
//! Running it prints `Tests Run: 5`, `Passed: 3`, `Failed: 2` and exits with a failure code.

mod given_a_quantity_parser;
mod given_a_remote_service;
mod given_a_sample_sut;
mod sut;

testcraft::main!();
