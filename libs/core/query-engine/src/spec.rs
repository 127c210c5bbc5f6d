use crate::{
    error::QueryError,
    filter::{Condition, FilterSet},
    pagination::Pagination,
    projection::Projection,
    search::SearchClause,
    sort::{SortSpec, covers},
};

/// Which documents match: filters AND (optionally) keyword search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub filter: FilterSet,
    pub search: Option<SearchClause>,
}

impl Criteria {
    pub fn new(filter: FilterSet) -> Self {
        Self {
            filter,
            search: None,
        }
    }

    /// Equality on a single field.
    pub fn field_eq(field: &str, value: impl Into<serde_json::Value>) -> Self {
        let mut filter = FilterSet::new();
        filter.insert(field, Condition::Eq(value.into()));
        Self::new(filter)
    }
}

/// Everything one list request asks for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub criteria: Criteria,
    pub sort: SortSpec,
    pub projection: Projection,
    pub pagination: Pagination,
}

impl QuerySpec {
    /// Assemble from raw query pairs. `keyword` searches `search_fields`.
    /// For repeated control parameters the last one counts.
    pub fn from_params(
        params: &[(String, String)],
        pagination: Pagination,
        search_fields: &[&str],
    ) -> Result<Self, QueryError> {
        let last = |key: &str| {
            params
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        Ok(Self {
            criteria: Criteria {
                filter: FilterSet::from_params(params),
                search: last("keyword").and_then(|k| SearchClause::new(k, search_fields)),
            },
            sort: SortSpec::parse(last("sort")),
            projection: Projection::parse(last("fields"))?,
            pagination,
        })
    }

    /// Ignore filters and sort keys on `fields`, so values that are never
    /// returned cannot be probed through the listing either.
    pub fn without_fields(mut self, fields: &[&str]) -> Self {
        if fields.is_empty() {
            return self;
        }
        let probed: Vec<String> = self
            .criteria
            .filter
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| fields.iter().any(|f| covers(f, name)))
            .collect();
        for name in probed {
            self.criteria.filter.remove(&name);
        }
        self.sort = self.sort.without(fields);
        self
    }

    /// Merge `base` into the filters; its fields override whatever the
    /// caller asked for on them.
    pub fn with_base_filter(mut self, base: &FilterSet) -> Self {
        for (field, condition) in base.iter() {
            self.criteria.filter.insert(field.clone(), condition.clone());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use serde_json::json;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_assembles_every_part() {
        let params = pairs(&[
            ("price[gte]", "10"),
            ("keyword", "phone"),
            ("sort", "-price"),
            ("fields", "title,price"),
            ("page", "2"),
        ]);
        let spec = QuerySpec::from_params(
            &params,
            Pagination::from_query(&params, 10).unwrap(),
            &["title", "description"],
        )
        .unwrap();

        assert_eq!(spec.criteria.filter.len(), 1);
        assert_eq!(spec.criteria.search.as_ref().unwrap().keyword(), "phone");
        assert_eq!(spec.sort.fields()[0].direction, SortDirection::Descending);
        assert!(matches!(spec.projection, Projection::Include { .. }));
        assert_eq!(spec.pagination.page(), 2);
    }

    #[test]
    fn test_keyword_ignored_without_search_fields() {
        let params = pairs(&[("keyword", "phone")]);
        let spec = QuerySpec::from_params(&params, Pagination::default(), &[]).unwrap();
        assert!(spec.criteria.search.is_none());
        assert!(spec.criteria.filter.is_empty());
    }

    #[test]
    fn test_excluded_fields_cannot_filter_or_sort() {
        let params = pairs(&[
            ("password[gte]", "$argon2id"),
            ("password.salt", "x"),
            ("passwordHint", "kept"),
            ("sort", "password,-name"),
        ]);
        let spec = QuerySpec::from_params(&params, Pagination::default(), &[])
            .unwrap()
            .without_fields(&["password"]);

        assert!(spec.criteria.filter.get("password").is_none());
        assert!(spec.criteria.filter.get("password.salt").is_none());
        assert!(spec.criteria.filter.get("passwordHint").is_some());
        assert_eq!(spec.sort.fields().len(), 1);
        assert_eq!(spec.sort.fields()[0].field, "name");

        let only_hidden = pairs(&[("sort", "password")]);
        let spec = QuerySpec::from_params(&only_hidden, Pagination::default(), &[])
            .unwrap()
            .without_fields(&["password"]);
        assert_eq!(spec.sort, SortSpec::default());
    }

    #[test]
    fn test_base_filter_overrides_user_value() {
        let params = pairs(&[("category", "other"), ("name", "x")]);
        let mut base = FilterSet::new();
        base.insert("category", Condition::Eq(json!("parent")));

        let spec = QuerySpec::from_params(&params, Pagination::default(), &["name"])
            .unwrap()
            .with_base_filter(&base);

        assert_eq!(
            spec.criteria.filter.get("category"),
            Some(&Condition::Eq(json!("parent")))
        );
        assert_eq!(spec.criteria.filter.len(), 2);
    }
}
