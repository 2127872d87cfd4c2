//! Function creation strategies
//!
//! Script languages materialize template files into a new function folder.
//! Java delegates to the Azure Functions Maven plugin, which owns the project
//! layout, and only the path of the generated class is computed here.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::{Error, Result};
use crate::core::utils::{remove_language_suffix, to_class_name};
use crate::generation::rules::validate_java_package_name;
use crate::generation::{
    ContextUpdate, GenerationResult, InputOptions, Language, LanguageClass, Prompter,
    ResolvedSettings,
};
use crate::infrastructure::shell::{CommandExecutor, OutputChannel, display_command};
use crate::infrastructure::templates::Template;

const MISSING_MAVEN_GUIDANCE: &str =
    "Install Maven and make sure it is on your PATH, or set tools.maven in the funcgen config.";

/// How the new function gets onto disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCreator {
    Script {
        entry_file: Option<&'static str>,
    },
    Java {
        build_tool: String,
        package_name: String,
    },
}

/// Everything a creator needs once all prompts are answered
pub struct CreateRequest<'a> {
    pub project_root: &'a Path,
    pub template: &'a Template,
    pub function_name: &'a str,
    pub settings: &'a ResolvedSettings,
}

impl FunctionCreator {
    /// Pick the creator for `language`, asking for a Java package when needed
    ///
    /// `package_preset` skips the prompt but must still be a valid package.
    pub async fn prepare(
        language: Language,
        build_tool: &str,
        default_package: &str,
        package_preset: Option<&str>,
        prompter: &dyn Prompter,
    ) -> Result<Self> {
        match language.class() {
            LanguageClass::Script { entry_file } => Ok(Self::Script { entry_file }),
            LanguageClass::BuildTool => {
                let package_name = match package_preset {
                    Some(package) => {
                        if let Some(message) = validate_java_package_name(package) {
                            return Err(Error::rejected("package", message));
                        }
                        package.to_string()
                    }
                    None => {
                        let validate = |value: &str| validate_java_package_name(value);
                        prompter
                            .input(
                                InputOptions::new("Provide a package name")
                                    .value(Some(default_package))
                                    .validate(&validate),
                            )
                            .await?
                    }
                };
                Ok(Self::Java {
                    build_tool: build_tool.to_string(),
                    package_name,
                })
            }
        }
    }

    /// Create the function and report where its primary file should be
    pub async fn create(
        &self,
        request: CreateRequest<'_>,
        executor: &dyn CommandExecutor,
        output: &dyn OutputChannel,
    ) -> Result<(GenerationResult, ContextUpdate)> {
        match self {
            Self::Script { entry_file } => create_script_function(&request, *entry_file).await,
            Self::Java {
                build_tool,
                package_name,
            } => {
                create_java_function(&request, build_tool, package_name, executor, output).await
            }
        }
    }
}

async fn create_script_function(
    request: &CreateRequest<'_>,
    entry_file: Option<&'static str>,
) -> Result<(GenerationResult, ContextUpdate)> {
    let mut function_config = request.template.function_config.clone();
    for (name, value) in request.settings.iter() {
        function_config.set_in_binding_value(name, value);
    }

    let target_dir = request.project_root.join(request.function_name);
    let written = request
        .template
        .materialize(
            &target_dir,
            &function_config,
            request.function_name,
            request.settings,
        )
        .await?;
    debug!(
        target_dir = %target_dir.display(),
        files = written.len(),
        "Materialized template"
    );

    let primary_file =
        entry_file.map(|file| script_entry_path(request.project_root, request.function_name, file));
    let update = ContextUpdate::new().set("filesWritten", written.len());
    Ok((GenerationResult { primary_file }, update))
}

async fn create_java_function(
    request: &CreateRequest<'_>,
    build_tool: &str,
    package_name: &str,
    executor: &dyn CommandExecutor,
    output: &dyn OutputChannel,
) -> Result<(GenerationResult, ContextUpdate)> {
    ensure_build_tool(build_tool, request.project_root, executor).await?;

    let args = maven_add_args(
        package_name,
        request.function_name,
        &request.template.id,
        request.settings,
    );
    let command = display_command(build_tool, &args);
    info!(command = %command, "Running build tool");

    let result = executor
        .execute(build_tool, &args, request.project_root, output)
        .await?;
    if !result.is_success() {
        return Err(Error::ExternalToolFailure {
            command,
            exit_code: result.exit_code,
            output: result.output,
        });
    }

    let primary_file = java_source_path(request.project_root, package_name, request.function_name);
    let update = ContextUpdate::new().set("buildToolExitCode", result.exit_code);
    Ok((
        GenerationResult {
            primary_file: Some(primary_file),
        },
        update,
    ))
}

/// Output sink for probe commands nobody needs to see
struct DiscardOutput;

impl OutputChannel for DiscardOutput {
    fn append_line(&self, _line: &str) {}
}

async fn ensure_build_tool(
    build_tool: &str,
    working_dir: &Path,
    executor: &dyn CommandExecutor,
) -> Result<()> {
    let missing = || Error::MissingDependency {
        tool: build_tool.to_string(),
        guidance: MISSING_MAVEN_GUIDANCE.to_string(),
    };
    match executor
        .execute(build_tool, &["--version".to_string()], working_dir, &DiscardOutput)
        .await
    {
        Ok(result) if result.is_success() => Ok(()),
        Ok(result) => {
            debug!(exit_code = result.exit_code, "Build tool probe failed");
            Err(missing())
        }
        Err(e) => {
            debug!(error = %e, "Build tool could not be started");
            Err(missing())
        }
    }
}

/// Arguments for the Maven plugin goal that adds a function
pub fn maven_add_args(
    package_name: &str,
    function_name: &str,
    template_id: &str,
    settings: &ResolvedSettings,
) -> Vec<String> {
    let mut args = vec![
        "azure-functions:add".to_string(),
        "-B".to_string(),
        format!("-Dfunctions.package={package_name}"),
        format!("-Dfunctions.name={function_name}"),
        format!("-Dfunctions.template={}", remove_language_suffix(template_id)),
    ];
    args.extend(settings.iter().map(|(name, value)| format!("-D{name}={value}")));
    args
}

/// `<root>/src/main/java/<package dirs>/<ClassName>.java`
pub fn java_source_path(project_root: &Path, package_name: &str, function_name: &str) -> PathBuf {
    let mut path = project_root.join("src").join("main").join("java");
    path.extend(package_name.split('.'));
    path.join(format!("{}.java", to_class_name(function_name)))
}

/// `<root>/<function name>/<entry file>`
pub fn script_entry_path(project_root: &Path, function_name: &str, entry_file: &str) -> PathBuf {
    project_root.join(function_name).join(entry_file)
}
