//! Sort expressions: `sort=-price,name` style.

pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec(Vec<SortField>);

impl SortSpec {
    /// Parse a comma (or space) separated list. A leading `-` sorts
    /// descending, `+` or nothing ascending. Repeated fields keep their first
    /// occurrence. Absent or blank input sorts by newest first.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut fields: Vec<SortField> = Vec::new();

        for token in raw
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
        {
            let (direction, field) = match token.strip_prefix('-') {
                Some(rest) => (SortDirection::Descending, rest),
                None => (
                    SortDirection::Ascending,
                    token.strip_prefix('+').unwrap_or(token),
                ),
            };
            if field.is_empty() || fields.iter().any(|f| f.field == field) {
                continue;
            }
            fields.push(SortField {
                field: field.to_string(),
                direction,
            });
        }

        if fields.is_empty() {
            return Self::default();
        }
        Self(fields)
    }

    pub fn fields(&self) -> &[SortField] {
        &self.0
    }

    /// Drop keys on `excluded` fields, falling back to the default order
    /// when nothing is left.
    pub fn without(self, excluded: &[&str]) -> Self {
        let fields: Vec<SortField> = self
            .0
            .into_iter()
            .filter(|f| !excluded.iter().any(|e| covers(e, &f.field)))
            .collect();
        if fields.is_empty() {
            return Self::default();
        }
        Self(fields)
    }
}

/// `password` covers `password` and `password.salt`.
pub(crate) fn covers(field: &str, path: &str) -> bool {
    path.strip_prefix(field)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

impl Default for SortSpec {
    fn default() -> Self {
        Self(vec![SortField {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Descending,
        }])
    }
}
