//! Capability contracts for the external collaborators.
//!
//! Every collaborator the pipeline depends on (network retrieval, style
//! compilation, import loading, element registration, rendering, event
//! delegation) is an injected trait object. Absence of an optional
//! capability (the style compiler) is a configuration state the pipeline
//! handles, not an undefined global.

pub mod fetchers;

pub use fetchers::{HttpFetcher, StaticFetcher};

use std::sync::Arc;

use async_trait::async_trait;

use crate::component::descriptor::ComponentDescriptor;
use crate::component::props::DefaultProperties;
use crate::document::ImportedDocument;
use crate::error::{CompileError, FetchError, RegistrationError, ResolveResult};

/// Network retrieval: `(url) -> Content | FetchError`.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn retrieve(&self, url: &str) -> Result<String, FetchError>;
}

/// Asynchronous style compilation: `(sourceText) -> CompiledText | CompileError`.
#[async_trait]
pub trait StyleCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<String, CompileError>;
}

/// Loads the document behind an import fragment. An already-loaded import
/// resolves immediately.
#[async_trait]
pub trait ImportLoader: Send + Sync {
    async fn load_import(&self, href: &str) -> Result<ImportedDocument, FetchError>;
}

/// Host registration of a component's element name and behavior.
pub trait ElementRegistrar: Send + Sync {
    fn register(&self, descriptor: &ComponentDescriptor) -> Result<(), RegistrationError>;
}

/// A component instance mounted by the rendering capability.
pub trait MountedComponent: Send + Sync {
    fn element_name(&self) -> &str;

    /// Inject one resolved style body into the instance's style boundary.
    fn inject_style(&self, css: &str);

    /// Flip the instance from unresolved to resolved presentation.
    fn mark_resolved(&self);
}

/// Mounts a component's visual tree.
pub trait Renderer: Send + Sync {
    fn mount(
        &self,
        descriptor: &ComponentDescriptor,
        properties: &DefaultProperties,
    ) -> ResolveResult<Arc<dyn MountedComponent>>;
}

/// Event delegation, notified once per successfully mounted component.
pub trait EventDelegate: Send + Sync {
    fn component_mounted(&self, component: &Arc<dyn MountedComponent>);
}

/// The bundle of host-side capabilities injected into orchestrators.
pub struct Host {
    pub registrar: Arc<dyn ElementRegistrar>,
    pub renderer: Arc<dyn Renderer>,
    pub events: Arc<dyn EventDelegate>,
    /// Optional; a `Scss` style reference fails with
    /// `CompileError::CompilerUnavailable` when this is `None`.
    pub compiler: Option<Arc<dyn StyleCompiler>>,
}
