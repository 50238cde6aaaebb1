//! AppVeyor CI integration.
//!
//! - [`AppveyorClient`] - Shared REST client (`reqwest`)
//! - [`AppveyorSource`] - [`crate::domain::repositories::ArtifactSource`] for one project

mod client;
mod models;
mod source;

pub use client::{AppveyorClient, AppveyorConfig, DEFAULT_API_URL};
pub use source::AppveyorSource;
