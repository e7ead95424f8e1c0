//! Route handlers for the HTTP API.

pub mod cut;
pub mod desktop;
pub mod health;
pub mod stream;
pub mod tools;
