// Code writer for generating Lingo and JavaScript source text

pub const DEFAULT_INDENT: &str = "    ";

pub struct CodeWriter {
    output: String,
    indent_level: u32,
    indent_unit: String,
    at_line_start: bool,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::with_indent_unit(DEFAULT_INDENT)
    }

    pub fn with_indent_unit(unit: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_unit: unit.into(),
            at_line_start: true,
        }
    }

    pub fn with_indent_width(width: usize) -> Self {
        Self::with_indent_unit(" ".repeat(width))
    }

    /// An empty writer at the same depth whose first line is not indented.
    /// Used to render one statement as text before it is post-processed.
    pub fn nested(&self) -> Self {
        Self {
            output: String::new(),
            indent_level: self.indent_level,
            indent_unit: self.indent_unit.clone(),
            at_line_start: false,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn unindent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn write(&mut self, text: &str) {
        if self.at_line_start && !text.is_empty() {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn writeln(&mut self, text: &str) {
        self.write(text);
        self.end_line();
    }

    pub fn end_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn into_string(self) -> String {
        self.output
    }

    pub fn current_indent(&self) -> u32 {
        self.indent_level
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
