//! Output format selection
//!
//! Text goes through the `display` formatters; JSON and YAML serialize the
//! service results directly.

use clap::ValueEnum;
use serde::Serialize;

use crate::error::FintrackResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Render `value` in `format`; `text` is only called for text output
pub fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> FintrackResult<String> {
    match format {
        OutputFormat::Text => Ok(text()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

pub fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> FintrackResult<()> {
    let rendered = render(format, value, text)?;
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[derive(Serialize)]
    struct Sample {
        amount: Money,
        label: &'static str,
    }

    #[test]
    fn test_render_each_format() {
        let sample = Sample {
            amount: Money::from_cents(1250),
            label: "lunch",
        };

        let text = render(OutputFormat::Text, &sample, || "lunch $12.50".into()).unwrap();
        assert_eq!(text, "lunch $12.50");

        let json = render(OutputFormat::Json, &sample, || unreachable!()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["amount"], 1250);
        assert_eq!(parsed["label"], "lunch");

        let yaml = render(OutputFormat::Yaml, &sample, || unreachable!()).unwrap();
        assert!(yaml.contains("amount: 1250"));
    }
}
