//! A small Rust client for the Helioviewer solar imagery API.
//!
//! Every endpoint call goes through the same steps: validate the request
//! fields against the endpoint schema, normalize them to their wire form, GET
//! `<api url><endpoint>/`, and decode the body as bytes, text or JSON
//! depending on which flags were set.
//!
//! ## Quick start
//! - The base URL defaults to `https://api.helioviewer.org/v2/`. Override it
//!   with `HELIOVIEWER_API_URL` or [`Client::set_api_url`].
//! - Build parameters with [`params!`] or [`Parameters::new`] and pass them to
//!   [`Client::execute`].
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use helioviewer::{params, Client, DataSource, Endpoint};
//!
//! fn main() -> helioviewer::Result<()> {
//!     let client = Client::from_env()?;
//!     let date = NaiveDate::from_ymd_opt(2014, 1, 1)
//!         .unwrap()
//!         .and_hms_opt(23, 59, 59)
//!         .unwrap();
//!     let request = params!(
//!         Endpoint::GetJP2Image,
//!         date = date,
//!         sourceId = DataSource::Aia335,
//!         jpip = true,
//!         json = true,
//!     )?;
//!     let reply = client.execute(&request)?;
//!     println!("{:?}", reply.as_json());
//!     Ok(())
//! }
//! ```
//!
//! [`Client::create_movie`] and [`Client::create_screenshot`] wrap the
//! queue/poll/download cycle and write the result to disk.

#![forbid(unsafe_code)]

mod client;
mod config;
mod datasource;
mod encode;
mod endpoint;
mod error;
mod event;
mod helpers;
mod jobs;
mod params;
mod transport;
mod util;

pub use client::{Client, Response};
pub use config::{API_URL_ENV, ClientConfig, DEFAULT_API_URL};
pub use datasource::{DataSource, SourceRef};
pub use encode::{
    EventSpec, create_events, create_layers, event_string, isoformat_z, layer_string, unix_csv,
};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use event::EventType;
pub use helpers::{MovieOptions, ScreenshotOptions, save_file};
pub use params::{
    DefaultValue, FieldKind, FieldSpec, OutputType, Parameters, Presence, Value, WireValue,
};
pub use transport::{HttpTransport, RawResponse, Transport};

/// Build [`Parameters`] for an endpoint using a kwargs-like syntax.
///
/// Field names are the API's own (camelCase) names. Evaluates to
/// `Result<Parameters>`.
///
/// ```
/// use helioviewer::{params, Endpoint, OutputType};
///
/// let p = params!(Endpoint::GetJP2Header, id = 7654321, callback = "cb")?;
/// assert_eq!(p.output_type(), OutputType::String);
/// # Ok::<(), helioviewer::Error>(())
/// ```
#[macro_export]
macro_rules! params {
    ($endpoint:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let input: ::std::vec::Vec<(&str, $crate::Value)> =
            ::std::vec![$((stringify!($key), $crate::Value::from($value))),*];
        $crate::Parameters::new($endpoint, input)
    }};
}
