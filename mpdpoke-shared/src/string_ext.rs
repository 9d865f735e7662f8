pub trait StringExt {
    /// Escapes text for the HTML-ish markup subset understood by
    /// freedesktop notification bodies.
    fn escape_markup(&self) -> String;
}

impl StringExt for str {
    fn escape_markup(&self) -> String {
        let mut buf = String::with_capacity(self.len());
        for c in self.chars() {
            match c {
                '&' => buf.push_str("&amp;"),
                '<' => buf.push_str("&lt;"),
                '>' => buf.push_str("&gt;"),
                '"' => buf.push_str("&#34;"),
                '\'' => buf.push_str("&#39;"),
                _ => buf.push(c),
            }
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::StringExt;

    #[test_case("A & B", "A &amp; B")]
    #[test_case("<i>not markup</i>", "&lt;i&gt;not markup&lt;/i&gt;")]
    #[test_case("Guns N' Roses", "Guns N&#39; Roses")]
    #[test_case("say \"hi\"", "say &#34;hi&#34;")]
    #[test_case("plain", "plain")]
    #[test_case("", "")]
    fn escapes_markup(input: &str, expected: &str) {
        assert_eq!(input.escape_markup(), expected);
    }
}
