use std::fmt::Display;

const INDENT: &str = "    ";

/// Line oriented builder for C source text.
#[derive(Debug, Default)]
pub struct CodeWriter {
    code: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.code.push_str(INDENT);
            }
            self.code.push_str(text);
        }
        self.code.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn comment(&mut self, lines: &[String]) -> &mut Self {
        self.line("/*");
        for text in lines {
            if text.is_empty() {
                self.line(" *");
            } else {
                self.line(format!(" * {text}"));
            }
        }
        self.line(" */")
    }

    pub fn include_system(&mut self, header: &str) -> &mut Self {
        self.line(format!("#include <{header}>"))
    }

    pub fn include_local(&mut self, header: &str) -> &mut Self {
        self.line(format!("#include \"{header}\""))
    }

    pub fn define(&mut self, name: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        if value.is_empty() {
            self.line(format!("#define {name}"))
        } else {
            self.line(format!("#define {name} {value}"))
        }
    }

    /// Open a brace initializer; `opening` is the text before `{`.
    pub fn open(&mut self, opening: impl AsRef<str>) -> &mut Self {
        let opening = opening.as_ref();
        if opening.is_empty() {
            self.line("{");
        } else {
            self.line(format!("{opening} {{"));
        }
        self.depth += 1;
        self
    }

    /// Close the innermost initializer with `}` followed by `closing`.
    pub fn close(&mut self, closing: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(format!("}}{closing}"))
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

/// Comma separated hexadecimal literals.
pub fn hex_list<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::LowerHex,
{
    values.into_iter().map(|value| format!("{value:#x}")).collect::<Vec<_>>().join(", ")
}
