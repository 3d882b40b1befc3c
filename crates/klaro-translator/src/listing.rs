//! Parser for the tool's language listing.
//!
//! Each line reads `code  English name  native name`, columns separated by
//! two or more whitespace characters so single spaces inside a name survive.

use klaro_types::Language;

/// Parse the listing, skipping every line that does not have exactly three columns
pub fn parse_listing(output: &str) -> Vec<Language> {
    output.lines().filter_map(parse_line).collect()
}

pub fn parse_line(line: &str) -> Option<Language> {
    let fields = split_columns(line);
    match fields.as_slice() {
        [code, english, native] => Some(Language::new(*code, *english, *native)),
        _ => None,
    }
}

/// Split on runs of at least two whitespace characters
fn split_columns(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = None;
    let mut chars = line.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !ch.is_whitespace() {
            if start.is_none() {
                start = Some(idx);
            }
            continue;
        }

        let next_is_space = chars.peek().is_some_and(|(_, c)| c.is_whitespace());
        if !next_is_space {
            continue;
        }

        if let Some(s) = start.take() {
            fields.push(line[s..idx].trim_end());
        }
        while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            chars.next();
        }
    }

    if let Some(s) = start {
        let field = line[s..].trim_end();
        if !field.is_empty() {
            fields.push(field);
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_columns() {
        let lang = parse_line("fr      French              Français").unwrap();
        assert_eq!(lang.code, "fr");
        assert_eq!(lang.english_name, "French");
        assert_eq!(lang.native_name, "Français");
    }

    #[test]
    fn test_single_spaces_stay_inside_names() {
        let lang = parse_line("zh-CN   Chinese Simplified  简体中文").unwrap();
        assert_eq!(lang.code, "zh-CN");
        assert_eq!(lang.english_name, "Chinese Simplified");
        assert_eq!(lang.native_name, "简体中文");
    }

    #[test]
    fn test_tabs_count_as_whitespace() {
        let lang = parse_line("de\t\tGerman\t\tDeutsch").unwrap();
        assert_eq!(lang, Language::new("de", "German", "Deutsch"));
    }

    #[test]
    fn test_leading_and_trailing_whitespace() {
        let lang = parse_line("   en   English   English   ").unwrap();
        assert_eq!(lang, Language::new("en", "English", "English"));
    }

    #[test]
    fn test_wrong_column_count_rejected() {
        assert!(parse_line("").is_none());
        assert!(parse_line("en  English").is_none());
        assert!(parse_line("en  English  English  extra").is_none());
        // One space is not a separator
        assert!(parse_line("en English English").is_none());
    }

    #[test]
    fn test_malformed_lines_do_not_affect_others() {
        let output = "\
en    English    English
garbage
fr    French    Français
x  y  z  w

ja    Japanese    日本語
";
        let langs = parse_listing(output);
        let codes: Vec<_> = langs.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["en", "fr", "ja"]);
    }
}
