/// Convert a font name into a lower snake_case C identifier.
///
/// Words split at case transitions and at any character that is not an ASCII
/// letter or digit; runs of separators collapse into one underscore.
pub fn snake_case_identifier(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut identifier = String::with_capacity(name.len() + 4);
    let mut separate = false;

    for (index, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            separate = !identifier.is_empty();
            continue;
        }

        if ch.is_ascii_uppercase() && index > 0 {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(char::is_ascii_lowercase);
            if previous.is_ascii_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_ascii_uppercase() && next_is_lower)
            {
                separate = !identifier.is_empty();
            }
        }

        if separate {
            identifier.push('_');
            separate = false;
        }
        identifier.push(ch.to_ascii_lowercase());
    }

    if identifier.is_empty() {
        identifier.push_str("font");
    } else if identifier.starts_with(|ch: char| ch.is_ascii_digit()) {
        identifier.insert_str(0, "font_");
    }

    identifier
}

/// Upper-case include guard macro for a header.
pub fn include_guard(identifier: &str) -> String {
    format!("{}_H", identifier.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_c_identifier(value: &str) -> bool {
        let mut chars = value.chars();
        chars.next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_')
            && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    #[test]
    fn dashed_names() {
        assert_eq!(snake_case_identifier("Noto-Sans-Mono-Regular"), "noto_sans_mono_regular");
        assert!(is_c_identifier(&snake_case_identifier("Noto-Sans-Mono-Regular")));
    }

    #[test]
    fn case_transitions() {
        assert_eq!(snake_case_identifier("DejaVuSansMono"), "deja_vu_sans_mono");
        assert_eq!(snake_case_identifier("HTMLFont"), "html_font");
        assert_eq!(snake_case_identifier("Terminus12x24"), "terminus12x24");
        assert_eq!(snake_case_identifier("Font2Bold"), "font2_bold");
        assert_eq!(snake_case_identifier("monogram"), "monogram");
    }

    #[test]
    fn separators_collapse() {
        assert_eq!(snake_case_identifier("Foo__Bar.v2"), "foo_bar_v2");
        assert_eq!(snake_case_identifier("My Font-Bold"), "my_font_bold");
        assert_eq!(snake_case_identifier("-Lead-_Trail-"), "lead_trail");
        assert_eq!(snake_case_identifier("Crème"), "cr_me");
    }

    #[test]
    fn always_a_valid_identifier() {
        for name in ["3x5", "", "---", "Ünï", "9Bold"] {
            let identifier = snake_case_identifier(name);
            assert!(is_c_identifier(&identifier), "{name:?} -> {identifier:?}");
        }
        assert_eq!(snake_case_identifier("3x5"), "font_3x5");
        assert_eq!(snake_case_identifier(""), "font");
    }

    #[test]
    fn guard_is_upper_case() {
        assert_eq!(include_guard("noto_sans"), "NOTO_SANS_H");
    }
}
