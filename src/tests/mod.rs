//! Scenario suites exercising the public lifecycle end to end.

mod helpers;
mod property;
