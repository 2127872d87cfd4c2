//! Business rules for the generation domain
//!
//! Validators return `None` when a value is acceptable and `Some(message)`
//! describing the problem otherwise, so they plug straight into
//! [`crate::generation::InputOptions::validate`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::generation::Language;

static FUNCTION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_\-]*$").expect("valid function name regex"));

static JAVA_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

static JAVA_PACKAGE_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_$][a-z0-9_$]*$").expect("valid package regex"));

/// Java reserved words and literals
const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while", "_",
];

/// Default package for new Java functions
pub const DEFAULT_JAVA_PACKAGE: &str = "com.function";

/// Validates a proposed function name for the project at `project_root`
pub fn validate_function_name(project_root: &Path, name: &str, language: Language) -> Option<String> {
    if name.is_empty() {
        return Some("The function name cannot be empty.".to_string());
    }

    if language.uses_class_names() {
        return validate_java_function_name(name);
    }

    if project_root.join(name).exists() {
        return Some(format!(
            "A file or folder with the name \"{name}\" already exists."
        ));
    }

    if !FUNCTION_NAME_RE.is_match(name) {
        return Some(format!(
            "\"{name}\" is not a valid function name. It must start with a letter and can only contain letters, digits, '_' and '-'."
        ));
    }

    None
}

/// Validates a Java function name, which becomes a class name
pub fn validate_java_function_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("The function name cannot be empty.".to_string());
    }
    if !JAVA_IDENTIFIER_RE.is_match(name) {
        return Some(format!(
            "\"{name}\" is not a valid Java class name. It must start with a letter, '_' or '$' and can only contain letters, digits, '_' and '$'."
        ));
    }
    if JAVA_RESERVED.contains(&name) {
        return Some(format!("\"{name}\" is a reserved Java keyword."));
    }
    None
}

/// Validates a dot-separated Java package name
pub fn validate_java_package_name(package: &str) -> Option<String> {
    if package.is_empty() {
        return Some("The package name cannot be empty.".to_string());
    }
    for segment in package.split('.') {
        if !JAVA_PACKAGE_SEGMENT_RE.is_match(segment) {
            return Some(format!(
                "\"{package}\" is not a valid Java package name. Each segment must start with a lowercase letter, '_' or '$' and contain only lowercase letters, digits, '_' and '$'."
            ));
        }
        if JAVA_RESERVED.contains(&segment) {
            return Some(format!(
                "\"{package}\" is not a valid Java package name: \"{segment}\" is a reserved Java keyword."
            ));
        }
    }
    None
}

/// First free name of the form `<base>1`, `<base>2`, ... under `project_root`
pub fn unique_function_name(project_root: &Path, base: &str) -> String {
    (1usize..)
        .map(|index| format!("{base}{index}"))
        .find(|candidate| !project_root.join(candidate).exists())
        .unwrap_or_else(|| base.to_string())
}
