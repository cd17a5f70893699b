//! Options shared by the collection listing operations.

use saisei_core::query::QueryParams;

/// Query parameters for listing a collection.
///
/// Parameters are emitted in a fixed order: `select`, `with`, `order`,
/// `limit`, then any extra pairs in the order they were added.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Fields to return, sent comma-joined.
    pub select: Vec<String>,
    /// Filter expression, e.g. `name=eth0`.
    pub with: Option<String>,
    /// Sort expression, e.g. `<name`.
    pub order: Option<String>,
    /// Maximum number of entries.
    pub limit: Option<u32>,
    /// Additional raw parameters.
    pub extra: Vec<(String, String)>,
}

impl ListOptions {
    /// Empty options: list everything with the server's defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the returned fields.
    #[must_use]
    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Filter entries.
    #[must_use]
    pub fn with_filter(mut self, expression: impl Into<String>) -> Self {
        self.with = Some(expression.into());
        self
    }

    /// Sort entries.
    #[must_use]
    pub fn with_order(mut self, expression: impl Into<String>) -> Self {
        self.order = Some(expression.into());
        self
    }

    /// Cap the number of entries.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add a parameter the typed fields do not cover.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut params = QueryParams::new();
        params.push_opt_with(
            "select",
            (!self.select.is_empty()).then_some(&self.select),
            |fields| fields.join(","),
        );
        params.push_opt("with", self.with.as_ref());
        params.push_opt("order", self.order.as_ref());
        params.push_opt("limit", self.limit);
        for (name, value) in &self.extra {
            params.push(name.as_str(), value);
        }
        params.into_pairs()
    }
}
