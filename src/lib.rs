//! Typed client for the ReportPortal launch API.
//!
//! [`ReportPortalApi`] lists launches of one project, either unfiltered, with
//! ad-hoc query params, or through a filter saved on the server by name.
//! Timestamps accept epoch milliseconds as well as the
//! `YYYY-MM-DDTHH:mm:ss.fff±HHMM` layout and are written back as epoch milliseconds.

pub mod cli_app;
pub mod command_logic;
pub mod config;
pub mod constants;
pub mod external_api;

pub use config::Config;
pub use external_api::report_portal_api::models::filter::{Filter, FilterEntity, FilterOrder, SelectionParams};
pub use external_api::report_portal_api::models::launch::{Launch, LaunchMode};
pub use external_api::report_portal_api::models::page::{Page, PageMetadata};
pub use external_api::report_portal_api::models::statistics::{Defects, Executions, Statistics};
pub use external_api::report_portal_api::models::timestamp::{Timestamp, TimestampFormatError};
pub use external_api::report_portal_api::ReportPortalApi;
pub use external_api::{ApiError, BaseApiClient, QueryParams};
