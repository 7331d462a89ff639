//! Integration tests for fmv-engine

mod cli_test;
mod common;
mod e2e_test;
mod properties_test;
