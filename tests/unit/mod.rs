//! Unit tests for individual components

mod builders_test;
mod config_test;
mod error_test;
mod gate_test;
mod mapping_test;
mod post_processor_test;
mod value_test;
