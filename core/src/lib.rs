// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A client library for OneLogin's v2 REST API, covering applications,
//! users, roles, and app connectors. Authentication uses the OAuth2 client
//! credentials grant; a fresh bearer token is fetched for every outbound
//! request.

use chrono::DateTime;
use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

mod app;
mod client;
mod connector;
mod error;
mod role;
mod set_ops;
mod user;

pub use app::*;
pub use client::*;
pub use connector::*;
pub use error::*;
pub use role::*;
pub use user::*;
