use query_engine::{DEFAULT_LIMIT, Populate};

use crate::presentation::Presentation;

/// Everything the generic handlers need to know about one resource.
///
/// ```
/// use crud_handlers::{Presentation, ResourceDef};
///
/// let def = ResourceDef::new("Category")
///     .plural("Categories")
///     .search(&["name"])
///     .slug_from("name")
///     .presentation(Presentation::new("http://localhost:8080").image("image", "categories"));
///
/// assert_eq!(def.plural_name(), "Categories");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDef {
    name: String,
    plural: String,
    search_fields: Vec<String>,
    default_limit: i64,
    populate: Vec<Populate>,
    slug_source: Option<String>,
    presentation: Presentation,
}

impl ResourceDef {
    /// `name` is the singular display name used in messages.
    /// The plural defaults to `{name}s`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            plural: format!("{name}s"),
            search_fields: Vec::new(),
            default_limit: DEFAULT_LIMIT,
            populate: Vec::new(),
            slug_source: None,
            presentation: Presentation::default(),
        }
    }

    pub fn plural(mut self, plural: &str) -> Self {
        self.plural = plural.to_string();
        self
    }

    /// Text fields matched by `?keyword=`.
    pub fn search(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn default_limit(mut self, limit: i64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Resolved on single-document reads.
    pub fn populate(mut self, populate: Populate) -> Self {
        self.populate.push(populate);
        self
    }

    /// Derive `slug` from this field on create and update.
    pub fn slug_from(mut self, field: &str) -> Self {
        self.slug_source = Some(field.to_string());
        self
    }

    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plural_name(&self) -> &str {
        &self.plural
    }

    pub fn search_fields(&self) -> Vec<&str> {
        self.search_fields.iter().map(String::as_str).collect()
    }

    pub fn limit(&self) -> i64 {
        self.default_limit
    }

    pub fn populates(&self) -> &[Populate] {
        &self.populate
    }

    pub fn slug_source(&self) -> Option<&str> {
        self.slug_source.as_deref()
    }

    pub fn presenter(&self) -> &Presentation {
        &self.presentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let def = ResourceDef::new("Brand");
        assert_eq!(def.name(), "Brand");
        assert_eq!(def.plural_name(), "Brands");
        assert_eq!(def.limit(), 10);
        assert!(def.search_fields().is_empty());
        assert!(def.slug_source().is_none());
        assert!(def.populates().is_empty());
    }

    #[test]
    fn test_builder() {
        let def = ResourceDef::new("SubCategory")
            .plural("SubCategories")
            .search(&["name"])
            .default_limit(25)
            .slug_from("name")
            .populate(Populate::new("category", "categories", &["name"]));

        assert_eq!(def.plural_name(), "SubCategories");
        assert_eq!(def.search_fields(), vec!["name"]);
        assert_eq!(def.limit(), 25);
        assert_eq!(def.slug_source(), Some("name"));
        assert_eq!(def.populates()[0].collection, "categories");
    }
}
