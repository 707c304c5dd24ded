//! Typed JSON request/response adapters.
//!
//! The adapters in this crate turn a plain function into a validated
//! POST+JSON [`Handler`](talaria_middleware::Handler). Four constructors
//! cover every combination of input and output:
//!
//! | Constructor | Function shape |
//! |---|---|
//! | [`json`] | `Fn(&Env) -> TalariaResult<()>` |
//! | [`json_out`] | `Fn(&Env) -> TalariaResult<Out>` |
//! | [`json_in`] | `Fn(&Env, In) -> TalariaResult<()>` |
//! | [`json_in_out`] | `Fn(&Env, In) -> TalariaResult<Out>` |
//!
//! Input-taking adapters require `POST` with Content-Type
//! `application/json`; output-producing adapters reply with
//! `application/json; charset=utf-8`. Functions with nothing to report
//! return `Ok(())` and the response finalizes as 204.
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use talaria_json::{json_in_out, Env};
//! use talaria_core::TalariaResult;
//!
//! #[derive(Deserialize)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Reply {
//!     message: String,
//! }
//!
//! let handler = json_in_out(|_env: &Env, input: Greeting| -> TalariaResult<Reply> {
//!     Ok(Reply {
//!         message: format!("hello, {}", input.name),
//!     })
//! });
//! # let _ = handler;
//! ```

pub mod adapter;
pub mod env;
pub mod reply;

pub use adapter::{json, json_in, json_in_out, json_out};
pub use env::Env;
pub use reply::reply_json;
