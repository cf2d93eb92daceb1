use std::collections::HashMap;
use std::fs;

// Dotenv-style key/value config. Lookups fall back to process env in main.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "calendar_assistant_config_{}_{:?}.env",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_exports_comments_and_quotes() {
        let path = write_config(
            "# comment\nexport OPENAI_MODEL=\"gpt-4o-mini\"\nPORT=3000\nTIMEZONE='America/New_York'\n",
        );
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get("OPENAI_MODEL").as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.get("PORT").as_deref(), Some("3000"));
        assert_eq!(config.get("TIMEZONE").as_deref(), Some("America/New_York"));
        assert_eq!(config.get_or("RUN_MODE", "cli"), "cli");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_lines_without_equals() {
        let path = write_config("JUSTAKEY\n");
        let err = AppConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.contains("line 1"));
        let _ = fs::remove_file(path);
    }
}
