//! Service catalog shared with the contact form.

/// Identifier → display name, in the order the form lists them.
const SERVICES: &[(&str, &str)] = &[
    ("custom-residential", "Custom Residential"),
    ("commercial", "Commercial Construction"),
    ("renovation", "Renovation & Remodeling"),
    ("additions", "Home Additions"),
    ("outdoor-living", "Outdoor Living Spaces"),
    ("emergency", "Emergency Services"),
    ("consulting", "Design Consulting"),
    ("permits", "Permits & Planning"),
];

/// Look up the display name for a known service identifier.
pub fn display_name(id: &str) -> Option<&'static str> {
    SERVICES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, name)| *name)
}

/// Resolve a service identifier to its display name.
///
/// Unknown identifiers are passed through verbatim so that a form deployed ahead of the
/// server catalog still reaches the operator.
pub fn resolve(id: &str) -> String {
    match display_name(id) {
        Some(name) => name.to_string(),
        None => {
            tracing::debug!(service = %id, "Unrecognized service identifier passed through");
            id.to_string()
        }
    }
}
