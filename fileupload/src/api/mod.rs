//! HTTP surface: handlers, request shapes and alert headers.

pub mod extract;
pub mod handlers;
pub mod headers;
pub mod models;
