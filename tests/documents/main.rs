//! Document service integration tests.

mod support;
mod pagination;
mod delete;
mod timestamps;

#[cfg(feature = "http")]
mod http;
