//! Use case for adding a function to an existing project

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::{
    CreateFunctionRequest, CreateFunctionResponse, FileOpener, ProjectInitializer,
    ProjectSettingsOverrides, ProjectValidator, StorageValidator, TemplateSelector,
    resolve_project_settings,
};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::generation::rules::{unique_function_name, validate_function_name};
use crate::generation::{
    AppSettingsResolver, ContextUpdate, CreateRequest, FunctionCreator, InputOptions, Language,
    Prompter, SettingsResolver, WorkflowContext,
};
use crate::infrastructure::shell::{CommandExecutor, OutputChannel};
use crate::infrastructure::templates::{Template, TemplateCatalog};

/// Collaborators the workflow talks to
#[derive(Clone)]
pub struct WorkflowPorts {
    pub catalog: Arc<dyn TemplateCatalog>,
    pub prompter: Arc<dyn Prompter>,
    pub app_settings: Arc<dyn AppSettingsResolver>,
    pub storage: Arc<dyn StorageValidator>,
    pub initializer: Arc<dyn ProjectInitializer>,
    pub executor: Arc<dyn CommandExecutor>,
    pub output: Arc<dyn OutputChannel>,
    pub opener: Arc<dyn FileOpener>,
}

struct CreatedFunction {
    template_id: String,
    function_name: String,
    primary_file: Option<std::path::PathBuf>,
}

/// Use case for creating a function from a template
pub struct CreateFunctionUseCase {
    ports: WorkflowPorts,
    config: Config,
}

impl CreateFunctionUseCase {
    pub fn new(ports: WorkflowPorts, config: Config) -> Self {
        Self { ports, config }
    }

    /// Run the whole workflow once
    ///
    /// The invocation context is logged at debug level when the workflow
    /// ends, whatever the outcome.
    pub async fn execute(&self, request: CreateFunctionRequest) -> Result<CreateFunctionResponse> {
        let mut context = WorkflowContext::new();
        info!(
            invocation_id = %context.invocation_id,
            project_root = %request.project_root.display(),
            "Creating function"
        );

        let outcome = self.run(&request, &mut context).await;

        let result = match &outcome {
            Ok(_) => "Succeeded",
            Err(e) if e.is_user_cancelled() => "Canceled",
            Err(_) => "Failed",
        };
        let mut update = ContextUpdate::new()
            .set("result", result)
            .set("durationMs", context.elapsed_ms());
        if let Err(e) = &outcome {
            update = update.set("error", e.kind());
        }
        context.merge(update);
        debug!(
            invocation_id = %context.invocation_id,
            properties = ?context.properties(),
            "Create function workflow finished"
        );

        let created = outcome?;
        Ok(CreateFunctionResponse {
            template_id: created.template_id,
            function_name: created.function_name,
            primary_file: created.primary_file,
            context,
        })
    }

    /// Templates that `create` would offer for these overrides
    pub async fn eligible_templates(
        &self,
        overrides: ProjectSettingsOverrides,
    ) -> Result<Vec<Template>> {
        let prompter = self.ports.prompter.as_ref();
        let (settings, _) =
            resolve_project_settings(prompter, overrides, &self.config.project).await?;
        TemplateSelector::new(self.ports.catalog.as_ref(), prompter)
            .eligible(&settings)
            .await
    }

    async fn run(
        &self,
        request: &CreateFunctionRequest,
        context: &mut WorkflowContext,
    ) -> Result<CreatedFunction> {
        let project_root = request.project_root.as_path();
        let prompter = self.ports.prompter.as_ref();
        let catalog = self.ports.catalog.as_ref();

        // 1. Project shape
        context.merge(
            ProjectValidator::new(prompter, self.ports.initializer.as_ref())
                .validate(project_root)
                .await?,
        );

        // 2. Language, runtime and filter
        let (settings, update) =
            resolve_project_settings(prompter, request.overrides, &self.config.project).await?;
        context.merge(update);

        // 3. Template
        let (template, update) = TemplateSelector::new(catalog, prompter)
            .select(&settings, request.template_id.as_deref())
            .await?;
        context.merge(update);

        // 4. Storage, for anything not triggered over HTTP
        let needs_storage = !template.function_config.is_http_trigger();
        if needs_storage {
            self.ports.storage.ensure_storage(project_root).await?;
        }
        context.merge(ContextUpdate::new().set("storageChecked", needs_storage));

        // 5. Package (Java only) and name
        let creator = FunctionCreator::prepare(
            settings.language,
            &self.config.tools.maven,
            &self.config.java.default_package,
            request.package_name.as_deref(),
            prompter,
        )
        .await?;
        let function_name = self
            .function_name(
                project_root,
                &template,
                settings.language,
                request.function_name.as_deref(),
            )
            .await?;

        // 6. Template settings
        let (resolved, update) =
            SettingsResolver::new(catalog, prompter, self.ports.app_settings.as_ref())
                .resolve_all(project_root, &template, settings.runtime, &request.settings)
                .await?;
        context.merge(update);

        // 7. Generate
        let (generated, update) = creator
            .create(
                CreateRequest {
                    project_root,
                    template: &template,
                    function_name: &function_name,
                    settings: &resolved,
                },
                self.ports.executor.as_ref(),
                self.ports.output.as_ref(),
            )
            .await?;
        context.merge(update);
        info!(
            template_id = %template.id,
            function_name = %function_name,
            "Function created"
        );

        // 8. Reveal
        reveal_primary_file(self.ports.opener.as_ref(), generated.primary_file.as_deref()).await?;

        Ok(CreatedFunction {
            template_id: template.id,
            function_name,
            primary_file: generated.primary_file,
        })
    }

    async fn function_name(
        &self,
        project_root: &Path,
        template: &Template,
        language: Language,
        preset: Option<&str>,
    ) -> Result<String> {
        if let Some(name) = preset {
            if let Some(message) = validate_function_name(project_root, name, language) {
                return Err(Error::rejected("name", message));
            }
            return Ok(name.to_string());
        }

        let default_name = if language.uses_class_names() {
            template.default_function_name.clone()
        } else {
            unique_function_name(project_root, &template.default_function_name)
        };
        let validate = |value: &str| validate_function_name(project_root, value, language);

        self.ports
            .prompter
            .input(
                InputOptions::new("Provide a function name")
                    .value(Some(default_name.as_str()))
                    .validate(&validate),
            )
            .await
    }
}

/// Open the new function's primary file if there is one on disk
async fn reveal_primary_file(opener: &dyn FileOpener, primary_file: Option<&Path>) -> Result<()> {
    match primary_file {
        Some(path) if path.exists() => opener.open(path).await,
        Some(path) => {
            debug!(path = %path.display(), "Primary file not found; nothing to open");
            Ok(())
        }
        None => {
            debug!("Language has no primary file");
            Ok(())
        }
    }
}
