//! REST API access for the property and alarm-management backend.
//!
//! This module wraps `reqwest` behind the [`PageGateway`] trait, defines the
//! page envelope and record types served by list endpoints, and maps every
//! failure into [`ApiError`] so callers never see transport internals.

pub mod envelope;
pub mod error;
pub mod gateway;
pub mod models;
pub mod token;

pub use envelope::PageEnvelope;
pub use error::ApiError;
pub use gateway::{HttpPageGateway, PageGateway, QueryParams};
pub use models::{Agency, AgencyRef, AlarmJob, BeepingAlarm, Property, Tenant};
pub use token::{AccessToken, StaticTokenProvider, TokenProvider};

#[cfg(test)]
pub use gateway::MockPageGateway;
