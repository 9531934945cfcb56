//! Sheetsift API Server module
//!
//! HTTP boundary for the column filter: upload a workbook plus a JSON list
//! of header names, download the filtered workbook.
//! Run with `sheetsift serve` or `sheetsift-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig};
