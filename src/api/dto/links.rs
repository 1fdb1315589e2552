use serde::Serialize;

/// HATEOAS link object, rendered under `_links` in response bodies.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}
