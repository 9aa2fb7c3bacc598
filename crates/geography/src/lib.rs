//! Typed client for the IBGE `localidades` API.
//!
//! Two lookups are exposed:
//! - the list of federative units (UFs), identified by their `sigla`
//! - the municipalities of one UF, identified by their `nome`
//!
//! Both are plain request/response calls. There is no caching and no retry:
//! selecting the same UF twice issues two requests, and a failed request is
//! returned to the caller as a [`GeographyError`].
//!
//! Consumers that need to swap the transport (the checkout executor, tests)
//! depend on the [`GeographySource`] trait instead of the concrete client.

pub mod client;
pub mod error;
pub mod fixture;
pub mod types;

pub use client::{DEFAULT_BASE_URL, GeographyClient, GeographyConfig};
pub use error::GeographyError;
pub use fixture::StaticGeography;
pub use types::{DivisionName, RegionCode};

use async_trait::async_trait;

/// Anything able to answer the two geography lookups.
#[async_trait]
pub trait GeographySource: Send + Sync {
    /// All first-level regions, in the order the source returns them.
    async fn list_regions(&self) -> Result<Vec<RegionCode>, GeographyError>;

    /// Second-level divisions of `region`, in source order.
    ///
    /// The "none selected" sentinel is passed through unchanged.
    async fn list_divisions(
        &self,
        region: &RegionCode,
    ) -> Result<Vec<DivisionName>, GeographyError>;
}
