//! Shared harness: in-memory capability implementations that record what
//! the pipeline does to them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use url::Url;

use weft::capabilities::{
    ElementRegistrar, EventDelegate, Host, ImportLoader, MountedComponent, Renderer,
    ResourceFetcher, StaticFetcher, StyleCompiler,
};
use weft::component::{ComponentDescriptor, DefaultProperties};
use weft::document::ImportedDocument;
use weft::error::{
    CompileError, FetchError, RegistrationError, RegistrationErrorReason, ResolveError,
    ResolveResult,
};

/// A mounted instance that records injected styles and the resolved flag.
#[derive(Default)]
pub struct RecordingComponent {
    pub name: String,
    styles: Mutex<Vec<String>>,
    resolved: AtomicBool,
}

impl RecordingComponent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            styles: Mutex::new(Vec::new()),
            resolved: AtomicBool::new(false),
        }
    }

    pub fn styles(&self) -> Vec<String> {
        self.styles.lock().unwrap().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }
}

impl MountedComponent for RecordingComponent {
    fn element_name(&self) -> &str {
        &self.name
    }

    fn inject_style(&self, css: &str) {
        self.styles.lock().unwrap().push(css.to_string());
    }

    fn mark_resolved(&self) {
        self.resolved.store(true, Ordering::SeqCst);
    }
}

/// Renderer keeping every mounted instance and its properties.
#[derive(Default)]
pub struct RecordingRenderer {
    mounted: Mutex<Vec<(Arc<RecordingComponent>, DefaultProperties)>>,
}

impl RecordingRenderer {
    pub fn mounted(&self) -> Vec<(Arc<RecordingComponent>, DefaultProperties)> {
        self.mounted.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn mount(
        &self,
        descriptor: &ComponentDescriptor,
        properties: &DefaultProperties,
    ) -> ResolveResult<Arc<dyn MountedComponent>> {
        let instance = Arc::new(RecordingComponent::new(&descriptor.element_name));
        self.mounted
            .lock()
            .unwrap()
            .push((Arc::clone(&instance), properties.clone()));
        Ok(instance)
    }
}

/// Renderer that refuses every mount.
pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn mount(
        &self,
        _descriptor: &ComponentDescriptor,
        _properties: &DefaultProperties,
    ) -> ResolveResult<Arc<dyn MountedComponent>> {
        Err(ResolveError::Internal("mount refused".to_string()))
    }
}

/// Event delegation that counts notifications.
#[derive(Default)]
pub struct CountingDelegate {
    notified: AtomicUsize,
}

impl CountingDelegate {
    pub fn count(&self) -> usize {
        self.notified.load(Ordering::SeqCst)
    }
}

impl EventDelegate for CountingDelegate {
    fn component_mounted(&self, _component: &Arc<dyn MountedComponent>) {
        self.notified.fetch_add(1, Ordering::SeqCst);
    }
}

/// Registrar that always succeeds.
pub struct OkRegistrar;

impl ElementRegistrar for OkRegistrar {
    fn register(&self, _descriptor: &ComponentDescriptor) -> Result<(), RegistrationError> {
        Ok(())
    }
}

/// Registrar failing every registration with a fixed reason.
pub struct FailingRegistrar {
    pub reason: RegistrationErrorReason,
}

impl ElementRegistrar for FailingRegistrar {
    fn register(&self, descriptor: &ComponentDescriptor) -> Result<(), RegistrationError> {
        Err(RegistrationError {
            element_name: descriptor.element_name.clone(),
            reason: self.reason.clone(),
        })
    }
}

/// Fetcher that counts retrievals and waits for an explicit release before
/// answering.
pub struct GatedFetcher {
    pub gate: Arc<Notify>,
    pub retrievals: AtomicUsize,
    body: String,
}

impl GatedFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            retrievals: AtomicUsize::new(0),
            body: body.to_string(),
        }
    }

    pub fn retrieval_count(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher for GatedFetcher {
    async fn retrieve(&self, _url: &str) -> Result<String, FetchError> {
        self.retrievals.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.body.clone())
    }
}

/// Fetcher whose first retrieval fails and whose later ones succeed.
pub struct FlakyFetcher {
    pub retrievals: AtomicUsize,
    body: String,
}

impl FlakyFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            retrievals: AtomicUsize::new(0),
            body: body.to_string(),
        }
    }

    pub fn retrieval_count(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher for FlakyFetcher {
    async fn retrieve(&self, url: &str) -> Result<String, FetchError> {
        let attempt = self.retrievals.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self.body.clone())
    }
}

/// Fetcher that never answers.
pub struct PendingFetcher;

#[async_trait]
impl ResourceFetcher for PendingFetcher {
    async fn retrieve(&self, _url: &str) -> Result<String, FetchError> {
        futures::future::pending().await
    }
}

/// Compiler that uppercases its input, so compiled output is recognizable.
pub struct UppercasingCompiler;

#[async_trait]
impl StyleCompiler for UppercasingCompiler {
    async fn compile(&self, source: &str) -> Result<String, CompileError> {
        Ok(source.to_uppercase())
    }
}

/// Import loader serving canned documents.
#[derive(Default)]
pub struct StaticImportLoader {
    documents: HashMap<String, ImportedDocument>,
}

impl StaticImportLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, href: &str, document: ImportedDocument) -> Self {
        self.documents.insert(href.to_string(), document);
        self
    }
}

#[async_trait]
impl ImportLoader for StaticImportLoader {
    async fn load_import(&self, href: &str) -> Result<ImportedDocument, FetchError> {
        self.documents
            .get(href)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: href.to_string(),
                status: 404,
            })
    }
}

/// Host bundle around recording capabilities.
pub struct TestHost {
    pub renderer: Arc<RecordingRenderer>,
    pub events: Arc<CountingDelegate>,
    pub host: Arc<Host>,
}

pub fn recording_host(
    registrar: Arc<dyn ElementRegistrar>,
    compiler: Option<Arc<dyn StyleCompiler>>,
) -> TestHost {
    let renderer = Arc::new(RecordingRenderer::default());
    let events = Arc::new(CountingDelegate::default());
    let host = Arc::new(Host {
        registrar,
        renderer: Arc::clone(&renderer) as Arc<dyn Renderer>,
        events: Arc::clone(&events) as Arc<dyn EventDelegate>,
        compiler,
    });
    TestHost {
        renderer,
        events,
        host,
    }
}

pub fn base_url() -> Url {
    Url::parse("https://example.com/").unwrap()
}

pub fn static_fetcher(resources: &[(&str, &str)]) -> Arc<StaticFetcher> {
    let mut fetcher = StaticFetcher::new();
    for (url, body) in resources {
        fetcher = fetcher.with_resource(*url, *body);
    }
    Arc::new(fetcher)
}
