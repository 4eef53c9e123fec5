//! Output formatting for resolved configuration.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render any serializable value in this format.
    pub fn render<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        let text = match self {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_json_and_yaml() {
        let value = json!({"HTTPPort": 8080, "RunMode": "dev"});

        let text = OutputFormat::Json.render(&value).unwrap();
        assert!(text.contains("\"HTTPPort\": 8080"));

        let text = OutputFormat::Yaml.render(&value).unwrap();
        assert!(text.contains("HTTPPort: 8080"));
        assert!(text.contains("RunMode: dev"));
    }
}
