//! Transaction runners.

pub mod retrying;

pub use retrying::RetryingTransaction;
