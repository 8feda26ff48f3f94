/// Formatting for numbers shown on axes and value labels.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormat {
    pub decimals: usize,
    pub decimal_separator: char,
    pub suffix: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self { decimals: 1, decimal_separator: '.', suffix: String::new() }
    }
}

impl NumberFormat {
    pub fn new(decimals: usize) -> Self {
        Self { decimals, ..Default::default() }
    }

    pub fn decimal_comma(mut self) -> Self {
        self.decimal_separator = ',';
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_decimals(&self, decimals: usize) -> Self {
        Self { decimals, ..self.clone() }
    }

    pub fn format(&self, value: f64) -> String {
        // Avoid printing "-0.0" for tiny negative values.
        let value = if value.abs() < 0.5 * 10f64.powi(-(self.decimals as i32)) { 0.0 } else { value };
        let mut text = format!("{:.*}", self.decimals, value);
        if self.decimal_separator != '.' {
            text = text.replace('.', &self.decimal_separator.to_string());
        }
        text.push_str(&self.suffix);
        text
    }
}
