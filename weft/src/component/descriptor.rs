//! Component descriptor derivation.
//!
//! The element name and the optional native element to extend are pure
//! functions of the component's script identifier. The identifier-string
//! dependency is the weakest link of the whole system, which is why the
//! derivation lives here on its own and is tested to the letter.

use crate::document::{FragmentNode, StyleSource};
use crate::path::{basename, strip_extension, to_kebab_case, ResourcePath};

/// Separator between the element name and the element it extends, as in
/// `Widget_Span`.
const EXTEND_SEPARATOR: char = '_';

/// Everything the rendering and registration capabilities need to know
/// about one component. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    /// Lowercase hyphenated element name, e.g. `date-picker`.
    pub element_name: String,
    /// Native element this component extends, when the identifier names one.
    pub extends: Option<String>,
    /// Canonical location of the component's resources.
    pub path: ResourcePath,
    /// The template fragment's originating path (`ref` attribute).
    pub template_ref: String,
    /// The script reference the component was derived from.
    pub script_ref: String,
    /// Style sources in document order.
    pub style_refs: Vec<StyleSource>,
}

impl ComponentDescriptor {
    /// Derive a descriptor from the component's script identifier.
    ///
    /// `"Widget_Span"` yields element name `widget` extending `span`;
    /// `"Panel"` yields `panel` extending nothing.
    pub fn new(
        identifier: &str,
        path: ResourcePath,
        template_ref: impl Into<String>,
        script_ref: impl Into<String>,
        style_refs: Vec<StyleSource>,
    ) -> Self {
        let (base, extends) = match identifier.split_once(EXTEND_SEPARATOR) {
            Some((base, target)) => (base, Some(target.to_lowercase())),
            None => (identifier, None),
        };

        Self {
            element_name: to_kebab_case(base),
            extends,
            path,
            template_ref: template_ref.into(),
            script_ref: script_ref.into(),
            style_refs,
        }
    }
}

/// The identifier string a script reference contributes to descriptor
/// derivation: an explicit `id` attribute when present, otherwise the
/// source's basename with its extension stripped.
pub fn script_identifier(script: &FragmentNode) -> Option<String> {
    if let Some(id) = script.attribute("id") {
        return Some(id.to_string());
    }
    script
        .attribute("src")
        .map(|src| strip_extension(basename(src)).to_string())
}
