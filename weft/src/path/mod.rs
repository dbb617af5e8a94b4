//! Canonical path computation for component resources.
//!
//! Two strategies cover the two deployment topologies:
//! - `Production`: assets are aggregated next to one shared root, so local
//!   references flatten to `root + basename`.
//! - `Development`: the original nested hierarchy is preserved, so local
//!   references keep their full relative path under the component directory.
//!
//! Both strategies are pure over `(path, strategy-fixed state)`: safe to call
//! repeatedly and concurrently, and idempotent over their own output.

use url::Url;

use crate::config::DeploymentMode;
use crate::error::PathResolutionError;

/// Immutable canonical form of a component's resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    /// The reference exactly as it appeared in the source tree.
    pub raw: String,
    /// Fully-qualified URL of the component root, regardless of mode.
    pub canonical_absolute: String,
    /// Fully-qualified URL of the owning document.
    pub root_url: String,
    pub mode: DeploymentMode,
}

/// One deployment topology's view of a component's paths.
pub trait PathStrategy: Send + Sync {
    fn mode(&self) -> DeploymentMode;

    /// Canonical URL for a style or script reference found in the component.
    fn get_path(&self, path: &str) -> Result<String, PathResolutionError>;

    /// The form of a script source reference under this topology.
    fn get_src(&self, src: &str) -> String;

    /// Fully-qualified URL of the component root.
    fn absolute_path(&self) -> &str;

    /// The root reference relative to the owning document.
    fn relative_path(&self) -> &str;

    /// Whether `path` belongs to this component rather than to a foreign
    /// origin or an unrelated part of the site.
    fn is_local_path(&self, path: &str) -> bool;

    fn resource_path(&self) -> ResourcePath;
}

/// Resolve `path` against `context`, yielding a fully-qualified URL.
fn resolve(path: &str, context: &Url) -> Result<String, PathResolutionError> {
    context
        .join(path)
        .map(|u| u.as_str().trim_end_matches('/').to_string())
        .map_err(|e| PathResolutionError::Malformed {
            reference: path.to_string(),
            message: e.to_string(),
        })
}

fn directory_base(absolute: &str) -> Result<Url, PathResolutionError> {
    Url::parse(&format!("{}/", absolute)).map_err(|e| PathResolutionError::Malformed {
        reference: absolute.to_string(),
        message: e.to_string(),
    })
}

/// Flattened-deployment strategy.
#[derive(Debug, Clone)]
pub struct ProductionPaths {
    raw: String,
    absolute: String,
    root_base: Url,
    document_base: Url,
}

impl PathStrategy for ProductionPaths {
    fn mode(&self) -> DeploymentMode {
        DeploymentMode::Production
    }

    fn get_path(&self, path: &str) -> Result<String, PathResolutionError> {
        if self.is_local_path(path) {
            // Intermediate directory structure is deliberately discarded:
            // the aggregated deployment places every asset beside the root.
            return Ok(format!("{}/{}", self.absolute, basename(path)));
        }
        resolve(path, &self.document_base)
    }

    fn get_src(&self, src: &str) -> String {
        basename(src).to_string()
    }

    fn absolute_path(&self) -> &str {
        &self.absolute
    }

    fn relative_path(&self) -> &str {
        &self.raw
    }

    fn is_local_path(&self, path: &str) -> bool {
        // Locality is judged on the canonical form of the reference so that
        // plain relative references under the root count as local.
        match self.root_base.join(path) {
            Ok(resolved) => resolved.as_str().contains(self.raw.as_str()),
            Err(_) => false,
        }
    }

    fn resource_path(&self) -> ResourcePath {
        ResourcePath {
            raw: self.raw.clone(),
            canonical_absolute: self.absolute.clone(),
            root_url: self.document_base.as_str().to_string(),
            mode: DeploymentMode::Production,
        }
    }
}

/// Nested-hierarchy strategy.
#[derive(Debug, Clone)]
pub struct DevelopmentPaths {
    raw: String,
    component_dir: String,
    absolute: String,
    dir_base: Url,
    document_base: Url,
    owner: Option<Url>,
}

impl PathStrategy for DevelopmentPaths {
    fn mode(&self) -> DeploymentMode {
        DeploymentMode::Development
    }

    fn get_path(&self, path: &str) -> Result<String, PathResolutionError> {
        if self.is_local_path(path) {
            // Full relative path preserved under the component directory.
            return resolve(path, &self.dir_base);
        }
        resolve(path, &self.document_base)
    }

    fn get_src(&self, src: &str) -> String {
        src.to_string()
    }

    fn absolute_path(&self) -> &str {
        &self.absolute
    }

    fn relative_path(&self) -> &str {
        &self.component_dir
    }

    fn is_local_path(&self, path: &str) -> bool {
        // Resolve against the owner context first, then judge locality by
        // ancestry: the resolved directory must sit beneath the component's
        // own absolute directory. Without an explicit owner the component
        // directory itself is the context, as for an import's own document.
        let context = self.owner.as_ref().unwrap_or(&self.dir_base);
        match context.join(path) {
            Ok(resolved) => {
                let dir = dirname(resolved.as_str());
                dir == self.absolute || dir.starts_with(self.dir_base.as_str())
            }
            Err(_) => false,
        }
    }

    fn resource_path(&self) -> ResourcePath {
        ResourcePath {
            raw: self.raw.clone(),
            canonical_absolute: self.absolute.clone(),
            root_url: self.document_base.as_str().to_string(),
            mode: DeploymentMode::Development,
        }
    }
}

/// Both strategies for one `(url, owner)` pair.
#[derive(Debug, Clone)]
pub struct StrategySet {
    pub production: ProductionPaths,
    pub development: DevelopmentPaths,
}

impl StrategySet {
    pub fn select(&self, mode: DeploymentMode) -> &dyn PathStrategy {
        match mode {
            DeploymentMode::Production => &self.production,
            DeploymentMode::Development => &self.development,
        }
    }
}

/// Build the production and development strategies for a component root.
///
/// `url` is the component's root reference as discovered in the source tree;
/// `owner` is the base of the document the reference appeared in, when that
/// differs from the host document.
pub fn resolver(
    url: &str,
    owner: Option<&Url>,
    document_base: &Url,
) -> Result<StrategySet, PathResolutionError> {
    let absolute = resolve(url, document_base)?;
    let component_dir = dirname(url).to_string();
    let dev_absolute = if component_dir.is_empty() {
        document_base.as_str().trim_end_matches('/').to_string()
    } else {
        resolve(&component_dir, document_base)?
    };

    Ok(StrategySet {
        production: ProductionPaths {
            raw: url.to_string(),
            root_base: directory_base(&absolute)?,
            absolute,
            document_base: document_base.clone(),
        },
        development: DevelopmentPaths {
            raw: url.to_string(),
            component_dir,
            dir_base: directory_base(&dev_absolute)?,
            absolute: dev_absolute,
            document_base: document_base.clone(),
            owner: owner.cloned(),
        },
    })
}

/// Final segment of a slash-separated reference.
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// Everything up to the last `/` of a slash-separated reference.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Drop the extension from a file reference, when one is present.
pub fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) if idx > path.rfind('/').map_or(0, |s| s + 1) => &path[..idx],
        _ => path,
    }
}

/// Convert a `CamelCase` identifier into its lowercase hyphenated form.
pub fn to_kebab_case(identifier: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    for ch in identifier.chars() {
        if ch.is_ascii_uppercase() || segments.is_empty() {
            segments.push(String::new());
        }
        if let Some(last) = segments.last_mut() {
            last.extend(ch.to_lowercase());
        }
    }
    segments.retain(|s| !s.is_empty());
    segments.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn strategies(root: &str) -> StrategySet {
        resolver(root, None, &base()).unwrap()
    }

    #[test]
    fn production_flattens_local_references() {
        let set = strategies("/app/widgets/");
        let path = set.production.get_path("sub/button.html").unwrap();
        assert_eq!(path, "https://example.com/app/widgets/button.html");
    }

    #[test]
    fn development_preserves_local_references() {
        let set = strategies("/app/widgets/");
        let path = set.development.get_path("sub/button.html").unwrap();
        assert_eq!(path, "https://example.com/app/widgets/sub/button.html");
    }

    #[test]
    fn both_strategies_are_idempotent_over_their_own_output() {
        let set = strategies("/app/widgets/");
        let flat = set.production.get_path("sub/button.html").unwrap();
        assert_eq!(set.production.get_path(&flat).unwrap(), flat);

        let nested = set.development.get_path("sub/button.html").unwrap();
        assert_eq!(set.development.get_path(&nested).unwrap(), nested);
    }

    #[test]
    fn foreign_references_resolve_against_the_document() {
        let set = strategies("/app/widgets/");
        let path = set
            .production
            .get_path("https://cdn.example.net/reset.css")
            .unwrap();
        assert_eq!(path, "https://cdn.example.net/reset.css");
        assert!(!set.production.is_local_path("https://cdn.example.net/reset.css"));
        assert!(!set.development.is_local_path("/elsewhere/reset.css"));
    }

    #[test]
    fn development_locality_is_judged_by_ancestry() {
        let owner = Url::parse("https://example.com/app/widgets/index.html").unwrap();
        let set = resolver("/app/widgets/panel.html", Some(&owner), &base()).unwrap();
        assert!(set.development.is_local_path("sub/button.html"));
        assert!(!set.development.is_local_path("/app/other/button.html"));
    }

    #[test]
    fn src_forms_follow_the_topology() {
        let set = strategies("/app/widgets/");
        assert_eq!(set.production.get_src("sub/button.js"), "button.js");
        assert_eq!(set.development.get_src("sub/button.js"), "sub/button.js");
    }

    #[test]
    fn resource_path_is_fully_qualified_in_both_modes() {
        let set = strategies("/app/widgets/");
        for strategy in [
            &set.production as &dyn PathStrategy,
            &set.development as &dyn PathStrategy,
        ] {
            let rp = strategy.resource_path();
            assert!(rp.canonical_absolute.starts_with("https://"));
            assert_eq!(rp.raw, "/app/widgets/");
        }
    }

    #[test]
    fn name_helpers() {
        assert_eq!(basename("a/b/c.html"), "c.html");
        assert_eq!(dirname("a/b/c.html"), "a/b");
        assert_eq!(dirname("/app/widgets/"), "/app/widgets");
        assert_eq!(dirname("c.html"), "");
        assert_eq!(strip_extension("a/b/Widget.js"), "a/b/Widget");
        assert_eq!(strip_extension("a.b/file"), "a.b/file");
    }

    #[test]
    fn kebab_case_conversion() {
        assert_eq!(to_kebab_case("Widget"), "widget");
        assert_eq!(to_kebab_case("DatePicker"), "date-picker");
        assert_eq!(to_kebab_case("myDatePicker"), "my-date-picker");
    }
}
