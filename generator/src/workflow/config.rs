use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "SigmaDSP_parameters.h";

/// File-name patterns for the four export documents. A leading `*` matches any prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePatterns {
    pub parameter: String,
    pub program: String,
    pub eeprom_program: String,
    pub eeprom_hex: String,
}

impl Default for FilePatterns {
    fn default() -> Self {
        Self {
            parameter: "*_IC_1_PARAM.h".to_string(),
            program: "*_IC_1.h".to_string(),
            eeprom_program: "*_IC_2.h".to_string(),
            eeprom_hex: "*rom.hex".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub input_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub output_file: String,
    pub export_dir_name: String,
    pub excluded_dir_name: String,
    pub patterns: FilePatterns,
    pub project_name: Option<String>,
    pub timestamp: Option<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            export_dir_name: "export".to_string(),
            excluded_dir_name: "examples".to_string(),
            patterns: FilePatterns::default(),
            project_name: None,
            timestamp: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(input_dir: PathBuf, output_dir: Option<PathBuf>) -> Self {
        Self {
            input_dir,
            output_dir,
            ..Default::default()
        }
    }

    /// Output lands next to the inputs unless an output directory is set.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .as_deref()
            .unwrap_or(self.input_dir.as_path())
            .join(&self.output_file)
    }
}
