//! Request wrapper for the HMRC REST APIs.
//!
//! [`Client::execute`] sends one authenticated request with the versioned
//! `Accept` header HMRC expects, the caller's [`AccessToken`] and its fraud
//! prevention headers, and maps failure responses onto [`DomainError`].
//!
//! ```no_run
//! use hmrc_api::{Client, Environment, RequestOptions};
//!
//! # async fn run(token: hmrc_api::AccessToken) -> Result<(), hmrc_api::Error> {
//! let client = Client::new(Environment::Test)?;
//! let options = RequestOptions::default().with_version("1.0");
//! let obligations: serde_json::Value = client
//!     .execute(
//!         Some(&token),
//!         "/organisations/vat/123456789/obligations",
//!         Some(&serde_json::json!({ "status": "O" })),
//!         Some(&options),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
mod client;
mod environment;
mod errors;
mod headers;
mod options;
mod query;
mod token;
pub use self::client::{Client, PROVIDER};
pub use self::environment::{Environment, ENVIRONMENT_VAR, PRODUCTION_BASE_URL, TEST_BASE_URL};
pub use self::errors::{DomainError, Error};
pub use self::options::{ArgumentType, RequestOptions};
pub use self::token::AccessToken;
