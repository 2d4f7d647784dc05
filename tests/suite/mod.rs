//! Integration test suite modules

mod relay;
mod settings;
