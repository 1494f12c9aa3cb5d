//! The HTTP surface: a single upload form and the analyze endpoint.

mod pages;
mod server;

pub use server::{serve, AppState};
