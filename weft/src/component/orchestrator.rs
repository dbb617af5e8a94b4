//! End-to-end assembly of one component.
//!
//! The orchestrator owns the component's descriptor and resolution state
//! machine, issues cache-backed fetches for its stylesheets, and hands the
//! finished component to the registration, rendering, and event-delegation
//! capabilities.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::FetchCache;
use crate::capabilities::{Host, MountedComponent};
use crate::component::descriptor::ComponentDescriptor;
use crate::component::props::default_properties;
use crate::config::WeftConfig;
use crate::document::{StyleKind, StyleSource};
use crate::error::{
    CompileError, FetchError, RegistrationErrorReason, ResolveError, ResolveResult,
};
use crate::path::{PathStrategy, StrategySet};
use crate::state::{ResolutionEvent, ResolutionState, ResolutionStateMachine};

pub struct ComponentOrchestrator {
    descriptor: ComponentDescriptor,
    paths: StrategySet,
    state: ResolutionStateMachine,
    cache: Arc<FetchCache>,
    host: Arc<Host>,
    config: Arc<WeftConfig>,
}

impl ComponentOrchestrator {
    pub fn new(
        descriptor: ComponentDescriptor,
        paths: StrategySet,
        cache: Arc<FetchCache>,
        host: Arc<Host>,
        config: Arc<WeftConfig>,
    ) -> Self {
        Self {
            descriptor,
            paths,
            state: ResolutionStateMachine::new(),
            cache,
            host,
            config,
        }
    }

    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// Current resolution state, delegated from the owned machine.
    pub fn state(&self) -> ResolutionState {
        self.state.state()
    }

    /// Register the component's element name with the host.
    ///
    /// Known non-fatal registration failures are logged and suppressed;
    /// anything else propagates as fatal to this component's setup.
    pub fn register(&self) -> ResolveResult<()> {
        let name = &self.descriptor.element_name;
        match self.host.registrar.register(&self.descriptor) {
            Ok(()) => Ok(()),
            Err(err) => match &err.reason {
                RegistrationErrorReason::DuplicateName => {
                    log::error!("custom element \"{}\" has already been registered", name);
                    Ok(())
                }
                RegistrationErrorReason::InvalidName => {
                    log::error!(
                        "element name \"{}\" is invalid and must consist of at least one hyphen",
                        name
                    );
                    Ok(())
                }
                RegistrationErrorReason::Other(_) => Err(err.into()),
            },
        }
    }

    /// Activate one instance: derive its default properties, mount it,
    /// notify the event delegation capability, then resolve its styles.
    ///
    /// A refused mount is unrecoverable for the component and faults the
    /// state machine directly.
    pub async fn activate(
        &self,
        attributes: &HashMap<String, String>,
    ) -> ResolveResult<Arc<dyn MountedComponent>> {
        let properties = default_properties(attributes);
        let instance = match self.host.renderer.mount(&self.descriptor, &properties) {
            Ok(instance) => instance,
            Err(err) => {
                self.state.advance(ResolutionEvent::Fault);
                return Err(err);
            }
        };
        self.host.events.component_mounted(&instance);

        self.resolve_styles(instance.as_ref()).await?;
        instance.mark_resolved();
        Ok(instance)
    }

    /// Resolve every style source of the component, injecting each resolved
    /// body into `sink` as it arrives.
    ///
    /// Each reference resolves independently, so a failed stylesheet does
    /// not abort its siblings. Readiness is all-or-nothing: the state
    /// machine reaches `Resolved` only when every operation settled
    /// successfully.
    pub async fn resolve_styles(&self, sink: &dyn MountedComponent) -> ResolveResult<()> {
        self.state.advance(ResolutionEvent::Begin);

        let strategy = self.paths.select(self.config.mode);
        let operations = self
            .descriptor
            .style_refs
            .iter()
            .map(|source| self.resolve_style(source, strategy, sink));
        let outcomes = futures::future::join_all(operations).await;

        let total = outcomes.len();
        let failures = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        self.state.advance(ResolutionEvent::AllSettled { failures });

        if failures > 0 {
            for err in outcomes.into_iter().filter_map(Result::err) {
                log::error!(
                    "component '{}': style resolution failed: {}",
                    self.descriptor.element_name,
                    err
                );
            }
            return Err(ResolveError::StylesFailed {
                element_name: self.descriptor.element_name.clone(),
                failed: failures,
                total,
            });
        }
        Ok(())
    }

    async fn resolve_style(
        &self,
        source: &StyleSource,
        strategy: &dyn PathStrategy,
        sink: &dyn MountedComponent,
    ) -> ResolveResult<()> {
        match source {
            StyleSource::Inline(text) => {
                sink.inject_style(text);
                Ok(())
            }
            StyleSource::External { href, kind } => {
                let canonical = strategy.get_path(href)?;
                let body = self.fetch_bounded(&canonical).await?;
                let css = match kind {
                    StyleKind::Css => body.to_string(),
                    StyleKind::Scss => self.compile(&body, href).await?,
                };
                sink.inject_style(&css);
                Ok(())
            }
        }
    }

    /// Fetch through the shared cache under the configured bounded wait.
    /// Expiry fails this waiter only; the retrieval itself keeps going.
    async fn fetch_bounded(&self, canonical: &str) -> Result<Arc<str>, FetchError> {
        let pending = self.cache.fetch(canonical);
        match tokio::time::timeout(self.config.resolve_timeout(), pending).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Timeout {
                url: canonical.to_string(),
                timeout_ms: self.config.resolve_timeout_ms,
            }),
        }
    }

    async fn compile(&self, body: &str, href: &str) -> Result<String, CompileError> {
        let compiler = match &self.host.compiler {
            Some(compiler) => compiler,
            None => {
                log::error!(
                    "a style compiler capability is required to resolve '{}'",
                    href
                );
                return Err(CompileError::CompilerUnavailable);
            }
        };
        log::warn!(
            "preprocessed style '{}' should be compiled ahead of time by the build process",
            href
        );
        compiler.compile(body).await
    }
}
