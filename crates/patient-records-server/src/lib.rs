//! HTTP API for the patient records registry.
//!
//! # Routes
//!
//! | Method | Path                  | Success |
//! |--------|-----------------------|---------|
//! | GET    | `/`                   | 200     |
//! | GET    | `/about`              | 200     |
//! | GET    | `/view`               | 200     |
//! | GET    | `/patient/{id}`       | 200     |
//! | GET    | `/sort`               | 200     |
//! | POST   | `/create`             | 201     |
//! | PUT    | `/edit/{id}`          | 200     |
//! | DELETE | `/delete/{id}`        | 200     |

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::{router, AppState, Server};
