//! Attribute-to-property mapping for component instances.
//!
//! Every attribute except the reserved bookkeeping attribute is copied into
//! the component's default properties, with the `data-` prefix stripped and
//! the value typecast: integers, floats, and booleans are recognized,
//! anything else passes through as a string.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

/// Bookkeeping attribute managed by the rendering capability; never copied
/// into default properties.
pub const RESERVED_BOOKKEEPING_ATTRIBUTE: &str = "data-reactid";

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid pattern"));
static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+").expect("valid pattern"));
static DATA_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^data-").expect("valid pattern"));

/// A typecast attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

/// The attribute-derived initial property set handed to the rendering
/// capability. Ordered so mounts are deterministic.
pub type DefaultProperties = BTreeMap<String, PropertyValue>;

/// Cast a primitive attribute value into its respective type. Complex
/// values pass through unchanged.
pub fn typecast_property(value: &str) -> PropertyValue {
    if INTEGER_PATTERN.is_match(value) {
        if let Ok(n) = value.parse::<i64>() {
            return PropertyValue::Integer(n);
        }
    }
    if let Some(decimal) = FLOAT_PATTERN.find(value) {
        // Trailing non-numeric text is discarded, keeping the decimal prefix.
        if let Ok(f) = decimal.as_str().parse::<f64>() {
            return PropertyValue::Float(f);
        }
    }
    match value {
        "true" => PropertyValue::Boolean(true),
        "false" => PropertyValue::Boolean(false),
        _ => PropertyValue::Text(value.to_string()),
    }
}

/// Derive the default properties for one component instance from its
/// declared attributes.
pub fn default_properties(attributes: &HashMap<String, String>) -> DefaultProperties {
    let mut properties = DefaultProperties::new();
    for (name, value) in attributes {
        if name == RESERVED_BOOKKEEPING_ATTRIBUTE {
            continue;
        }
        let name = DATA_PREFIX.replace(name, "").to_string();
        properties.insert(name, typecast_property(value));
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typecasts_primitives() {
        assert_eq!(typecast_property("42"), PropertyValue::Integer(42));
        assert_eq!(typecast_property("3.14"), PropertyValue::Float(3.14));
        assert_eq!(typecast_property("true"), PropertyValue::Boolean(true));
        assert_eq!(typecast_property("false"), PropertyValue::Boolean(false));
        assert_eq!(
            typecast_property("hello"),
            PropertyValue::Text("hello".to_string())
        );
    }

    #[test]
    fn negative_and_mixed_values_stay_strings() {
        assert_eq!(
            typecast_property("-7"),
            PropertyValue::Text("-7".to_string())
        );
        assert_eq!(
            typecast_property("42px"),
            PropertyValue::Text("42px".to_string())
        );
    }

    #[test]
    fn decimal_prefix_is_kept_when_trailing_text_follows() {
        assert_eq!(typecast_property("3.14abc"), PropertyValue::Float(3.14));
        assert_eq!(typecast_property("1.5em"), PropertyValue::Float(1.5));
    }

    #[test]
    fn reserved_attribute_is_skipped_and_data_prefix_stripped() {
        let mut attributes = HashMap::new();
        attributes.insert("data-reactid".to_string(), ".0.1".to_string());
        attributes.insert("data-count".to_string(), "3".to_string());
        attributes.insert("label".to_string(), "Hello".to_string());

        let properties = default_properties(&attributes);
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("count"), Some(&PropertyValue::Integer(3)));
        assert_eq!(
            properties.get("label"),
            Some(&PropertyValue::Text("Hello".to_string()))
        );
        assert!(!properties.contains_key("reactid"));
    }
}
