//! Placeholder substitution for email template bodies.
//!
//! Placeholders are literal substrings, not regexes. Each recognized
//! token is replaced in a single left-to-right pass; substituted values
//! are never re-scanned, so a name containing a placeholder-like
//! substring is not treated specially.

/// Full author display name.
pub const FULL_NAME: &str = "{{name}}";

/// First space-delimited token of the author name.
pub const FIRST_NAME: &str = "{{first_name}}";

/// First name of an author: everything before the first space, or the
/// whole name when there is none.
pub fn first_name(author_name: &str) -> &str {
    author_name.split(' ').next().unwrap_or(author_name)
}

/// Placeholder bindings for one author.
pub fn variables_for(author_name: &str) -> Vec<(&'static str, String)> {
    vec![
        (FULL_NAME, author_name.to_string()),
        (FIRST_NAME, first_name(author_name).to_string()),
    ]
}

/// Replace every occurrence of each bound placeholder in `template`.
///
/// Unrecognized placeholders are left verbatim. Iteration order does
/// not matter: the tokens are disjoint literals.
pub fn render(template: &str, variables: &[(&str, String)]) -> String {
    variables
        .iter()
        .fold(template.to_string(), |message, (token, value)| {
            message.replace(token, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_full_name_everywhere() {
        let vars = variables_for("Ada Lovelace");
        let rendered = render("Dear {{name}}, I love your work {{name}}!", &vars);
        assert_eq!(rendered, "Dear Ada Lovelace, I love your work Ada Lovelace!");
    }

    #[test]
    fn replaces_first_name() {
        let vars = variables_for("Ada Lovelace");
        assert_eq!(render("Hi {{first_name}}", &vars), "Hi Ada");
    }

    #[test]
    fn name_without_space_is_its_own_first_name() {
        let vars = variables_for("Madonna");
        assert_eq!(render("Hi {{first_name}}", &vars), "Hi Madonna");
    }

    #[test]
    fn unrecognized_placeholders_stay_verbatim() {
        let vars = variables_for("Ada Lovelace");
        assert_eq!(render("Hi {{nickname}}", &vars), "Hi {{nickname}}");
    }

    #[test]
    fn values_are_not_rescanned_for_placeholders() {
        let vars = vec![(FULL_NAME, "{{first_name}}".to_string())];
        assert_eq!(render("{{name}}", &vars), "{{first_name}}");
    }

    #[test]
    fn empty_author_renders_empty_values() {
        let vars = variables_for("");
        assert_eq!(render("Hi {{first_name}}{{name}}", &vars), "Hi ");
    }
}
