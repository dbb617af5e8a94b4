//! Component assembly: descriptor derivation, default properties, and the
//! orchestrator that drives one component from discovery to resolution.

pub mod descriptor;
pub mod orchestrator;
pub mod props;

pub use descriptor::{script_identifier, ComponentDescriptor};
pub use orchestrator::ComponentOrchestrator;
pub use props::{default_properties, typecast_property, DefaultProperties, PropertyValue};
