//! Cready backend client.
//!
//! - `client`: the request engine (network vs cache decision, token handling)
//! - `endpoints`: one typed method per backend capability, each with its cache policy
//! - `envelope`: request options and the response envelope every call returns
//! - `types`: payload types

mod client;
mod endpoints;
mod envelope;
mod types;

pub use client::ApiClient;
pub use envelope::ApiResponse;
pub use types::ProfileUpdate;
