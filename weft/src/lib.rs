//! Weft, a declarative component resolution and caching runtime.
//!
//! Weft turns declaratively linked document fragments (an import link, a
//! template, a script, and zero or more stylesheets) into fully resolved,
//! renderable components, while guaranteeing that any given network resource
//! is fetched at most once no matter how many components reference it
//! concurrently.
//!
//! The moving parts, leaves first:
//! - [`path`]: canonical path computation under the production (flattened)
//!   and development (nested) deployment topologies.
//! - [`cache`]: the single-flight fetch cache shared by all in-flight
//!   component loads.
//! - [`state`]: the per-component resolution state machine.
//! - [`component`]: descriptor derivation, default properties, and the
//!   orchestrator composing the pieces above.
//! - [`registry`]: discovery of import and template fragments, including
//!   fragments inserted into the tree at runtime.
//!
//! Host integrations plug in through the trait objects in [`capabilities`];
//! the source markup is presented through the abstract tree in [`document`].

pub mod cache;
pub mod capabilities;
pub mod component;
pub mod config;
pub mod document;
pub mod error;
pub mod path;
pub mod registry;
pub mod state;

pub use cache::FetchCache;
pub use capabilities::Host;
pub use component::{ComponentDescriptor, ComponentOrchestrator};
pub use config::{DeploymentMode, WeftConfig};
pub use error::{ResolveError, ResolveResult};
pub use registry::{InitContext, Module, ModuleRegistry};
pub use state::ResolutionState;
