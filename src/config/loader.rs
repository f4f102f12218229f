use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Configuration for a deadsweep run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which files make up the corpus
    pub sources: SourceConfig,

    /// Class candidate selection
    pub classes: ClassConfig,

    /// Function candidate selection
    pub functions: FunctionConfig,

    /// Layout resource location
    pub layouts: LayoutConfig,

    /// Localized string resources
    pub strings: StringConfig,

    /// Report output
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source code extensions (without the dot)
    pub extensions: Vec<String>,

    /// Markup/resource extension
    pub markup_extension: String,

    /// File name that is never part of the corpus
    pub manifest_name: String,

    /// Directory names treated as test sources (case-insensitive)
    pub test_dirs: Vec<String>,

    /// Directory names treated as build output
    pub build_dirs: Vec<String>,

    /// Glob patterns excluded from every corpus
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    /// File-name suffixes that mark a class candidate
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    /// Function names that are never removed
    pub excluded_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Layout directory, relative to the project root
    pub layout_dir: PathBuf,

    /// Also count generated view-binding class names as references
    pub view_binding: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StringConfig {
    /// Resources root, relative to the project root
    pub res_dir: PathBuf,

    /// Prefix shared by all language directories
    pub values_prefix: String,

    /// Name of the unqualified (base language) directory
    pub base_dir: String,

    /// Structured file holding the string table in every language directory
    pub file_name: String,

    /// Path fragments excluded when scanning for key references
    pub usage_exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: text or json
    pub format: String,

    /// Directory for report files; defaults to the tool's own location
    pub directory: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["kt".to_string(), "java".to_string()],
            markup_extension: "xml".to_string(),
            manifest_name: "AndroidManifest.xml".to_string(),
            test_dirs: vec!["test".to_string(), "androidTest".to_string()],
            build_dirs: vec!["build".to_string()],
            exclude: vec!["**/.gradle/**".to_string(), "**/.idea/**".to_string()],
        }
    }
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            suffixes: vec![
                "Activity".to_string(),
                "Fragment".to_string(),
                "Adapter".to_string(),
            ],
        }
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            excluded_names: [
                "main", "onCreate", "onStart", "onResume", "onDestroy", "toString", "equals",
                "hashCode",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_dir: PathBuf::from("app/src/main/res/layout"),
            view_binding: false,
        }
    }
}

impl Default for StringConfig {
    fn default() -> Self {
        Self {
            res_dir: PathBuf::from("app/src/main/res"),
            values_prefix: "values".to_string(),
            base_dir: "values".to_string(),
            file_name: "strings.xml".to_string(),
            usage_exclude: vec!["/res/values".to_string()],
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadsweep.yml",
            ".deadsweep.yaml",
            ".deadsweep.toml",
            "deadsweep.yml",
            "deadsweep.yaml",
            "deadsweep.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Check if a path matches one of the exclusion globs
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.sources
            .exclude
            .iter()
            .any(|pattern| glob_match(pattern, &path_str))
    }

    /// Check if a path lies inside a test source directory
    pub fn in_test_dir(&self, path: &Path) -> bool {
        has_component(path, &self.sources.test_dirs)
    }

    /// Check if a path lies inside build output
    pub fn in_build_dir(&self, path: &Path) -> bool {
        has_component(path, &self.sources.build_dirs)
    }

    /// Absolute layout directory for a project
    pub fn layout_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.layouts.layout_dir)
    }

    /// Absolute resources directory for a project
    pub fn res_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.strings.res_dir)
    }
}

fn has_component(path: &Path, names: &[String]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(part) => {
            let part = part.to_string_lossy();
            names.iter().any(|name| name.eq_ignore_ascii_case(&part))
        }
        _ => false,
    })
}

/// Simple glob matching for patterns like "*Activity" or "**/build/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern.starts_with('*') && !pattern.contains('/') {
        return text.ends_with(&pattern[1..]);
    }

    if pattern.ends_with('*') && !pattern.contains('/') {
        return text.starts_with(&pattern[..pattern.len() - 1]);
    }

    if pattern.contains("**") {
        // "**/name/**" matches a complete directory name anywhere in the path
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = pattern.trim_start_matches("**/").trim_end_matches("/**");
            return text.contains(&format!("/{}/", dir_name))
                || text.starts_with(&format!("{}/", dir_name));
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }
            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }
            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }
            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    text == pattern
}
