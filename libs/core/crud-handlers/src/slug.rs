//! URL slugs derived from names and titles.

/// Lowercase, hyphen-separated slug.
///
/// Common Latin accents fold to their base letter, hyphens and whitespace
/// act as separators and every other non-alphanumeric character is dropped.
///
/// ```
/// use crud_handlers::slugify;
///
/// assert_eq!(slugify("  Home & Garden "), "home-garden");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for ch in input.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = !slug.is_empty();
            continue;
        }

        let folded = fold(ch);
        if folded.is_empty() {
            continue;
        }

        if pending_separator {
            slug.push('-');
            pending_separator = false;
        }
        slug.push_str(&folded);
    }

    slug
}

fn fold(ch: char) -> String {
    if ch.is_ascii_alphanumeric() {
        return ch.to_ascii_lowercase().to_string();
    }

    let base = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ß' => "ss",
        _ => "",
    };
    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_joins_words() {
        assert_eq!(slugify("Smart Phones"), "smart-phones");
    }

    #[test]
    fn test_collapses_separator_runs_and_trims() {
        assert_eq!(slugify("  Men -  Shoes  "), "men-shoes");
        assert_eq!(slugify("--a--"), "a");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(slugify("Dell's XPS 13 (2024)!"), "dells-xps-13-2024");
        assert_eq!(slugify("under_score.dot"), "underscoredot");
    }

    #[test]
    fn test_folds_accents() {
        assert_eq!(slugify("Café Élan"), "cafe-elan");
    }

    #[test]
    fn test_nothing_left() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }
}
