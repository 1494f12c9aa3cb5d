//! Prompt construction and the remote analysis client.

pub mod client;
pub mod template;
