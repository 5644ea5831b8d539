//! Minimal GitHub REST caller: swappable transports, credential-safe redirects, and token
//! resolution behind one small façade.
//!
//! The crate exposes a single "issue one HTTP call" primitive ([`client::Client::call`]) plus
//! token-scope introspection ([`client::Client::token_scopes`]). Transports implement
//! [`caller::Caller`]; the production [`caller::NativeCaller`] signs requests for the configured
//! host only and follows `302 Found` redirects itself so credentials never leave that origin.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod caller;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod obs;
pub mod options;
pub mod repo;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use bytes::Bytes;
	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, Method, StatusCode, header::HeaderMap,
	};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use bytes;
pub use reqwest;
pub use tokio_util;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
