//! String transformation utilities for code generation

/// Converts a function name to the Java class name the build tool generates.
///
/// Only the first character changes; the rest of the name is kept verbatim.
///
/// # Examples
/// ```
/// use funcgen::core::utils::to_class_name;
///
/// assert_eq!(to_class_name("myTimer"), "MyTimer");
/// assert_eq!(to_class_name("MyTimer"), "MyTimer");
/// ```
pub fn to_class_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Strips the language suffix from a template id.
///
/// Catalog ids look like `HttpTrigger-Java`; the build tool only knows the
/// part before the first dash.
///
/// # Examples
/// ```
/// use funcgen::core::utils::remove_language_suffix;
///
/// assert_eq!(remove_language_suffix("HttpTrigger-Java"), "HttpTrigger");
/// assert_eq!(remove_language_suffix("TimerTrigger"), "TimerTrigger");
/// ```
pub fn remove_language_suffix(template_id: &str) -> &str {
    template_id
        .split_once('-')
        .map_or(template_id, |(base, _)| base)
}
