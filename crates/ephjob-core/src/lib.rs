//! # ephjob-core
//!
//! Core types for the ephjob ephemeral-job controller.
//!
//! This crate provides the foundational types shared across ephjob
//! components:
//!
//! - **Identity**: [`key::JobKey`], the namespaced identity the trigger
//!   queue deduplicates on
//! - **Snapshots**: read-only views of watched pods and jobs as delivered
//!   by the watch mechanism
//! - **Selectors**: equality-based label matching between jobs and pods
//! - **Error Types**: shared error definitions and result types
//! - **Observability**: logging bootstrap and span constructors
//!
//! ## Example
//!
//! ```rust
//! use ephjob_core::prelude::*;
//!
//! let job = EphemeralJobSnapshot::new("debug", "inject-profiler", "1")
//!     .with_spec(EphemeralJobSpec::new(
//!         LabelSelector::new().with_label("app", "web"),
//!     ));
//!
//! assert_eq!(job.key().to_string(), "debug/inject-profiler");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod key;
pub mod object;
pub mod observability;
pub mod selector;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::key::JobKey;
    pub use crate::object::{
        ContainerPhase, EphemeralContainerStatus, EphemeralJobSnapshot, EphemeralJobSpec,
        PodSnapshot, ResourceVersion,
    };
    pub use crate::selector::LabelSelector;
}

pub use error::{Error, Result};
pub use key::JobKey;
pub use object::{
    ContainerPhase, EphemeralContainerStatus, EphemeralJobSnapshot, EphemeralJobSpec, PodSnapshot,
    ResourceVersion,
};
pub use selector::LabelSelector;
