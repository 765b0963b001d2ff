//! HTTP transport shared by the IP resolver and the NS1 record store.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`])
//! - The production client ([`ReqwestClient`])

mod client;
mod error;
mod request;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
