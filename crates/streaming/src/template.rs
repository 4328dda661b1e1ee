/// Substitutes `{key}` placeholders (optionally padded with spaces) using `lookup`.
///
/// Unknown keys become the empty string; text that does not form a placeholder
/// is copied through untouched.
pub fn fill_template<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_key(after[..close].trim_matches(' ')) => {
                let key = after[..close].trim_matches(' ');
                if let Some(value) = lookup(key) {
                    out.push_str(&value);
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::fill_template;

    fn lookup(key: &str) -> Option<String> {
        match key {
            "w" => Some("13.3".to_string()),
            "z" => Some("15".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_keys() {
        assert_eq!(
            fill_template("/b?w={w}&z={ z }", lookup),
            "/b?w=13.3&z=15"
        );
    }

    #[test]
    fn unknown_keys_become_empty() {
        assert_eq!(fill_template("/b?n={n}&w={w}", lookup), "/b?n=&w=13.3");
    }

    #[test]
    fn leaves_non_placeholders_alone() {
        assert_eq!(fill_template("{a-b}{w}{", lookup), "{a-b}13.3{");
    }
}
