//! Component-level tests exercising the public API of each module.

mod unit;
