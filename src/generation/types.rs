//! Core types for the generation domain

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::Error;

/// Supported function languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    TypeScript,
    CSharpScript,
    FSharpScript,
    Python,
    PowerShell,
    Bash,
    Batch,
    Php,
    Java,
}

/// How a language turns a template into a function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageClass {
    /// Template files are materialized directly into a function folder
    Script { entry_file: Option<&'static str> },
    /// Generation is delegated to the project's build tool
    BuildTool,
}

impl Language {
    /// Get the display name for this language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::CSharpScript => "C#Script",
            Language::FSharpScript => "F#Script",
            Language::Python => "Python",
            Language::PowerShell => "PowerShell",
            Language::Bash => "Bash",
            Language::Batch => "Batch",
            Language::Php => "PHP",
            Language::Java => "Java",
        }
    }

    /// Generation branch for this language
    pub fn class(&self) -> LanguageClass {
        let entry_file = match self {
            Language::Java => return LanguageClass::BuildTool,
            Language::JavaScript => "index.js",
            Language::TypeScript => "index.ts",
            Language::CSharpScript => "run.csx",
            Language::FSharpScript => "run.fsx",
            Language::Python => "__init__.py",
            Language::PowerShell => "run.ps1",
            Language::Bash => "run.sh",
            Language::Batch => "run.bat",
            Language::Php => "run.php",
        };
        LanguageClass::Script {
            entry_file: Some(entry_file),
        }
    }

    /// Whether function names follow the class-name convention
    pub fn uses_class_names(&self) -> bool {
        matches!(self.class(), LanguageClass::BuildTool)
    }

    /// Get all supported languages
    pub fn all() -> Vec<Language> {
        vec![
            Language::JavaScript,
            Language::TypeScript,
            Language::CSharpScript,
            Language::FSharpScript,
            Language::Python,
            Language::PowerShell,
            Language::Bash,
            Language::Batch,
            Language::Php,
            Language::Java,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "c#script" | "csharpscript" | "csx" => Ok(Language::CSharpScript),
            "f#script" | "fsharpscript" | "fsx" => Ok(Language::FSharpScript),
            "python" | "py" => Ok(Language::Python),
            "powershell" | "ps1" => Ok(Language::PowerShell),
            "bash" | "sh" => Ok(Language::Bash),
            "batch" | "bat" => Ok(Language::Batch),
            "php" => Ok(Language::Php),
            "java" => Ok(Language::Java),
            _ => Err(Error::config(format!("Unknown language: {s}"))),
        }
    }
}

/// Functions host runtime version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Runtime {
    V1,
    #[default]
    V2,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::V1 => "~1",
            Runtime::V2 => "~2",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Runtime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "~1" | "1" | "v1" => Ok(Runtime::V1),
            "~2" | "2" | "v2" | "beta" => Ok(Runtime::V2),
            _ => Err(Error::config(format!("Unknown runtime: {s}"))),
        }
    }
}

/// Narrows the template catalog shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateFilter {
    All,
    Core,
    #[default]
    Verified,
}

impl fmt::Display for TemplateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateFilter::All => write!(f, "All"),
            TemplateFilter::Core => write!(f, "Core"),
            TemplateFilter::Verified => write!(f, "Verified"),
        }
    }
}

impl FromStr for TemplateFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TemplateFilter::All),
            "core" => Ok(TemplateFilter::Core),
            "verified" => Ok(TemplateFilter::Verified),
            _ => Err(Error::config(format!("Unknown template filter: {s}"))),
        }
    }
}

/// Setting values resolved during one workflow, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSettings {
    entries: Vec<(String, String)>,
}

impl ResolvedSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, replacing any earlier value for the same setting
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of the generation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Primary file of the new function, if the language defines one
    pub primary_file: Option<PathBuf>,
}
