//! Formatter configuration.

/// Options controlling the rendered output.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}
