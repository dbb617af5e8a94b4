//! Discovery of import and template fragments, and the modules built from
//! them.
//!
//! The registry scans the declarative source tree once at bootstrap, waits
//! for each import fragment to load, and instantiates one orchestrator per
//! discovered component. Import fragments inserted later arrive through the
//! mutation stream and go through the identical path, so dynamically
//! injected components participate in caching and resolution the same way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

use crate::cache::FetchCache;
use crate::capabilities::{Host, ImportLoader, ResourceFetcher};
use crate::component::descriptor::{script_identifier, ComponentDescriptor};
use crate::component::orchestrator::ComponentOrchestrator;
use crate::config::WeftConfig;
use crate::document::{
    is_html_import, is_template, script_references, style_sources, FragmentNode, FragmentVisitor,
    SourceTree, TreeMutation,
};
use crate::error::{PathResolutionError, ResolveResult};
use crate::path::{resolver, PathStrategy};

/// Explicit initialization context; bootstrap runs at most once per context.
#[derive(Debug, Default)]
pub struct InitContext {
    initiated: AtomicBool,
}

impl InitContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initiated(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }

    /// Claim the one bootstrap run; `true` only for the first caller.
    fn claim(&self) -> bool {
        self.initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// One loaded import fragment and the components found beneath it.
///
/// Modules live for the document's lifetime; an import fragment inserted
/// again later produces a new, independent module.
pub struct Module {
    href: String,
    components: Vec<Arc<ComponentOrchestrator>>,
}

impl Module {
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn components(&self) -> &[Arc<ComponentOrchestrator>] {
        &self.components
    }
}

/// Collects import and template fragments from one tree walk.
#[derive(Default)]
struct DiscoveryVisitor {
    imports: Vec<FragmentNode>,
    templates: Vec<FragmentNode>,
}

impl FragmentVisitor for DiscoveryVisitor {
    fn visit_node(&mut self, node: &FragmentNode) {
        if is_html_import(node) {
            self.imports.push(node.clone());
        } else if is_template(node) && node.attribute("ref").is_some() {
            self.templates.push(node.clone());
        }
    }
}

pub struct ModuleRegistry {
    config: Arc<WeftConfig>,
    cache: Arc<FetchCache>,
    host: Arc<Host>,
    loader: Arc<dyn ImportLoader>,
    document_base: Url,
    modules: RwLock<Vec<Arc<Module>>>,
    components: RwLock<Vec<Arc<ComponentOrchestrator>>>,
}

impl ModuleRegistry {
    pub fn new(
        config: WeftConfig,
        fetcher: Arc<dyn ResourceFetcher>,
        loader: Arc<dyn ImportLoader>,
        host: Arc<Host>,
    ) -> ResolveResult<Self> {
        let document_base =
            Url::parse(&config.document_base).map_err(|e| PathResolutionError::Malformed {
                reference: config.document_base.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            config: Arc::new(config),
            cache: Arc::new(FetchCache::new(fetcher)),
            host,
            loader,
            document_base,
            modules: RwLock::new(Vec::new()),
            components: RwLock::new(Vec::new()),
        })
    }

    /// The process-wide fetch cache shared by every component load.
    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    /// Discover every import and template fragment in `tree` and set up the
    /// components they define. Idempotent per `ctx`.
    pub async fn bootstrap(&self, tree: &dyn SourceTree, ctx: &InitContext) -> ResolveResult<()> {
        if !ctx.claim() {
            log::debug!("bootstrap already ran for this context; skipping");
            return Ok(());
        }

        let mut discovered = DiscoveryVisitor::default();
        tree.visit(&mut discovered);
        log::info!(
            "discovered {} import fragment(s) and {} template fragment(s)",
            discovered.imports.len(),
            discovered.templates.len()
        );

        for import in &discovered.imports {
            self.attach_import(import).await;
        }
        for template in &discovered.templates {
            self.attach_template(template);
        }
        Ok(())
    }

    /// Feed structural-change notifications through the same instantiation
    /// path used at startup. Runs until the sending side closes.
    pub async fn watch_mutations(&self, mut mutations: UnboundedReceiver<TreeMutation>) {
        while let Some(mutation) = mutations.recv().await {
            match mutation {
                TreeMutation::Inserted(node) => {
                    if is_html_import(&node) {
                        self.attach_import(&node).await;
                    }
                }
            }
        }
    }

    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.modules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Orchestrators for components defined by top-level template fragments.
    pub fn components(&self) -> Vec<Arc<ComponentOrchestrator>> {
        self.components
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Every live orchestrator, module-owned ones included.
    pub fn all_components(&self) -> Vec<Arc<ComponentOrchestrator>> {
        let mut all = self.components();
        for module in self.modules() {
            all.extend(module.components().iter().cloned());
        }
        all
    }

    /// Wait for an import fragment to load (immediate when already loaded)
    /// and wrap it in a module. Load failures are logged, never fatal to
    /// the bootstrap.
    async fn attach_import(&self, node: &FragmentNode) {
        let Some(href) = node.attribute("href") else {
            return;
        };

        match self.loader.load_import(href).await {
            Ok(document) => {
                let mut components = Vec::new();
                document.root.walk(&mut |n| {
                    if is_template(n) && n.attribute("ref").is_some() {
                        components.extend(self.instantiate_components(n, Some(&document.base_url)));
                    }
                });
                log::info!(
                    "module '{}' attached with {} component(s)",
                    href,
                    components.len()
                );
                let module = Arc::new(Module {
                    href: href.to_string(),
                    components,
                });
                self.modules
                    .write()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(module);
            }
            Err(err) => {
                log::error!("import '{}' failed to load: {}", href, err);
            }
        }
    }

    fn attach_template(&self, template: &FragmentNode) {
        let components = self.instantiate_components(template, None);
        self.components
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .extend(components);
    }

    /// One orchestrator per locally-scoped script reference beneath the
    /// template fragment.
    fn instantiate_components(
        &self,
        template: &FragmentNode,
        owner: Option<&Url>,
    ) -> Vec<Arc<ComponentOrchestrator>> {
        let Some(template_ref) = template.attribute("ref") else {
            return Vec::new();
        };

        let paths = match resolver(template_ref, owner, &self.document_base) {
            Ok(paths) => paths,
            Err(err) => {
                log::error!("template '{}' has an unusable ref: {}", template_ref, err);
                return Vec::new();
            }
        };

        let styles = style_sources(template);
        let mut components = Vec::new();

        for script in script_references(template) {
            let Some(src) = script.attribute("src") else {
                continue;
            };
            if !paths.production.is_local_path(src) {
                log::debug!("skipping foreign script reference '{}'", src);
                continue;
            }
            let Some(identifier) = script_identifier(script) else {
                continue;
            };

            let descriptor = ComponentDescriptor::new(
                &identifier,
                paths.select(self.config.mode).resource_path(),
                template_ref,
                src,
                styles.clone(),
            );
            let element_name = descriptor.element_name.clone();
            let orchestrator = Arc::new(ComponentOrchestrator::new(
                descriptor,
                paths.clone(),
                Arc::clone(&self.cache),
                Arc::clone(&self.host),
                Arc::clone(&self.config),
            ));

            match orchestrator.register() {
                Ok(()) => components.push(orchestrator),
                Err(err) => {
                    log::error!("component '{}' setup failed: {}", element_name, err);
                }
            }
        }
        components
    }
}
