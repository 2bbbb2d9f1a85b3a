//! A bare-bones HTTP/1.0 client.
//!
//! See the `url` module for turning a url into the host, port and path to request.
//! See the `client` module for sending the request and reading the response.
//! See the `cli` module for the command-line entry point.

pub mod cli;
pub mod client;
pub mod error;
pub mod protocol;
pub mod url;
