/// Case-insensitive keyword match across a resource's text fields.
///
/// The keyword is matched literally: regex metacharacters in user input
/// carry no special meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    keyword: String,
    fields: Vec<String>,
}

impl SearchClause {
    /// `None` when there is nothing to search for or nowhere to search.
    pub fn new(keyword: &str, fields: &[&str]) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() || fields.is_empty() {
            return None;
        }
        Some(Self {
            keyword: keyword.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Regex pattern for backends that match with regular expressions.
    pub fn pattern(&self) -> String {
        regex::escape(&self.keyword)
    }

    /// Whether `text` contains the keyword, ignoring case.
    pub fn matches_text(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.keyword.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keyword_or_fields_yield_none() {
        assert!(SearchClause::new("", &["name"]).is_none());
        assert!(SearchClause::new("   ", &["name"]).is_none());
        assert!(SearchClause::new("phone", &[]).is_none());
    }

    #[test]
    fn test_pattern_escapes_metacharacters() {
        let clause = SearchClause::new("c++ (pro)", &["title"]).unwrap();
        assert_eq!(clause.pattern(), r"c\+\+ \(pro\)");
    }

    #[test]
    fn test_matches_text_ignores_case() {
        let clause = SearchClause::new("PhOnE", &["title", "description"]).unwrap();
        assert!(clause.matches_text("Smartphone X"));
        assert!(!clause.matches_text("Tablet"));
        assert_eq!(clause.fields(), ["title", "description"]);
    }
}
