use crate::tab::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(rename = "inputPattern")]
    pub input_pattern: Option<String>,
    #[serde(rename = "inputFiles")]
    pub input_files: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSettings {
    #[serde(rename = "chunkSize")]
    pub chunk_size: Option<usize>,
    #[serde(rename = "denyWords")]
    pub deny_words: Option<Vec<String>>,
    #[serde(rename = "accumulateSections")]
    pub accumulate_sections: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSettings", default)]
    pub input_settings: InputSettings,
    #[serde(rename = "extractionSettings", default)]
    pub extraction_settings: ExtractionSettings,
}

/// A configuration, with the directory its relative paths refer to.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LoadedConfig {
    pub config: TabConfig,
    pub root: PathBuf,
}

impl LoadedConfig {
    /// Reads the configuration file if one is given, or returns an empty
    /// configuration rooted in the current directory.
    pub fn load(config_path: Option<&str>) -> TabResult<LoadedConfig> {
        match config_path {
            Some(p) => {
                let config = read_config(p)?;
                let root = Path::new(p)
                    .parent()
                    .map(|x| x.to_path_buf())
                    .unwrap_or_default();
                Ok(LoadedConfig { config, root })
            }
            None => Ok(LoadedConfig {
                config: TabConfig::default(),
                root: PathBuf::new(),
            }),
        }
    }

    /// Resolves a path of the configuration file against its directory.
    pub fn resolve(&self, p: &str) -> PathBuf {
        resolve_path(&self.root, p)
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| self.resolve(p))
    }

    pub fn input_pattern(&self) -> Option<String> {
        self.config
            .input_settings
            .input_pattern
            .as_ref()
            .map(|p| self.resolve(p).display().to_string())
    }

    pub fn input_files(&self) -> Vec<PathBuf> {
        self.config
            .input_settings
            .input_files
            .iter()
            .flatten()
            .map(|p| self.resolve(p))
            .collect()
    }

    pub fn chunk_size(&self) -> usize {
        self.config
            .extraction_settings
            .chunk_size
            .unwrap_or(transcript::DEFAULT_CHUNK_SIZE)
    }

    pub fn merge_settings(&self) -> extraction::MergeSettings {
        let s = &self.config.extraction_settings;
        extraction::MergeSettings {
            deny_words: s.deny_words.iter().flatten().cloned().collect(),
            accumulate_sections: s.accumulate_sections.iter().flatten().cloned().collect(),
        }
    }
}

pub fn read_config(path: &str) -> TabResult<TabConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: TabConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_is_accepted() {
        let config: TabConfig =
            serde_json::from_str(r#"{"inputSettings": {"inputPattern": "json/*.json"}}"#)
                .unwrap();
        assert_eq!(
            config.input_settings.input_pattern,
            Some("json/*.json".to_string())
        );
        assert_eq!(config.output_settings, OutputSettings::default());
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{
                "outputSettings": {"outputPath": "temp/out.json"},
                "inputSettings": {"inputFiles": ["a.json", "/abs/b.json"]},
                "extractionSettings": {"chunkSize": 50, "denyWords": ["无"]}
            }"#,
        )
        .unwrap();
        let loaded = LoadedConfig::load(Some(config_path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.output_path(), Some(dir.path().join("temp/out.json")));
        assert_eq!(
            loaded.input_files(),
            vec![dir.path().join("a.json"), PathBuf::from("/abs/b.json")]
        );
        assert_eq!(loaded.chunk_size(), 50);
        assert!(loaded.merge_settings().deny_words.contains("无"));
        assert!(loaded.merge_settings().accumulate_sections.is_empty());
    }

    #[test]
    fn missing_config_is_reported() {
        let res = LoadedConfig::load(Some("/nonexistent/interviewtab/config.json"));
        assert!(matches!(res, Err(TabError::OpeningJson { .. })));
    }
}
