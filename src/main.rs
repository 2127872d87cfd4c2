//! funcgen CLI entrypoint
//! Parses command-line arguments and dispatches to the create-function workflow.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use funcgen::application::{
    CreateFunctionRequest, CreateFunctionUseCase, ProjectSettingsOverrides, WorkflowPorts,
};
use funcgen::core::config::load_config;
use funcgen::generation::{Language, Prompter, Runtime, TemplateFilter};
use funcgen::infrastructure::{
    CommandExecutor, CommandProjectInitializer, ConsoleFileOpener, FileSystemCatalog,
    LocalSettingsStorageValidator, OutputChannel, PromptingAppSettingsResolver,
    ShellCommandExecutor, TerminalPrompter, TracingOutputChannel,
};
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "funcgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

/// Options that decide which templates are available
#[derive(clap::Args, Debug)]
pub struct SelectionArgs {
    /// Function project directory
    #[arg(long, default_value = ".")]
    project: PathBuf,
    /// Project language, e.g. javascript, python or java
    #[arg(long)]
    language: Option<Language>,
    /// Functions runtime (~1 or ~2)
    #[arg(long)]
    runtime: Option<Runtime>,
    /// Template filter (verified, core or all)
    #[arg(long)]
    filter: Option<TemplateFilter>,
    /// Directory containing catalog.yml
    #[arg(long)]
    template_dir: Option<PathBuf>,
}

impl SelectionArgs {
    fn overrides(&self) -> ProjectSettingsOverrides {
        ProjectSettingsOverrides {
            language: self.language,
            runtime: self.runtime,
            filter: self.filter,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Add a new function to an existing project
    Create {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Template id, e.g. HttpTrigger-JavaScript
        #[arg(long)]
        template: Option<String>,
        /// Function name
        #[arg(long)]
        name: Option<String>,
        /// Java package name
        #[arg(long)]
        package: Option<String>,
        /// Template setting as name=value; may be repeated
        #[arg(long = "setting", value_parser = parse_key_val)]
        settings: Vec<(String, String)>,
    },
    /// Inspect the template catalog
    Templates {
        #[command(subcommand)]
        action: TemplateCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum TemplateCommands {
    /// List the templates `create` would offer
    List {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Parse a `name=value` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid name=value: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid name=value: empty name in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so prompts on stdout stay readable
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Create {
            selection,
            template,
            name,
            package,
            settings,
        } => {
            let request = CreateFunctionRequest {
                overrides: selection.overrides(),
                template_id: template,
                function_name: name,
                package_name: package,
                settings: settings.into_iter().collect(),
                ..CreateFunctionRequest::new(selection.project.clone())
            };
            let use_case = build_use_case(&selection).await?;

            match use_case.execute(request).await {
                Ok(response) => {
                    info!(
                        function_name = %response.function_name,
                        template_id = %response.template_id,
                        "Function created"
                    );
                }
                Err(e) if e.is_user_cancelled() => info!("Operation cancelled"),
                Err(e) => return Err(e).context("Failed to create function"),
            }
        }
        Commands::Templates {
            action: TemplateCommands::List { selection },
        } => {
            let use_case = build_use_case(&selection).await?;
            let templates = use_case
                .eligible_templates(selection.overrides())
                .await
                .context("Failed to list templates")?;

            for template in &templates {
                println!("{:<40} {}", template.id, template.name);
            }
        }
    }
    Ok(())
}

/// Load configuration and catalog and connect the terminal adapters
async fn build_use_case(selection: &SelectionArgs) -> anyhow::Result<CreateFunctionUseCase> {
    let loaded = load_config(&selection.project).context("Failed to load configuration")?;
    let mut config = loaded.config;
    if let Some(dir) = &selection.template_dir {
        config.templates.dir = Some(dir.to_string_lossy().into_owned());
    }
    debug!(
        config_path = ?loaded.config_path,
        project_config_path = ?loaded.project_config_path,
        "Configuration loaded"
    );

    let template_dir = config.template_dir();
    let catalog = FileSystemCatalog::load(&template_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to load template catalog from {}",
                template_dir.display()
            )
        })?;

    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter::new());
    let executor: Arc<dyn CommandExecutor> = Arc::new(ShellCommandExecutor::new());
    let output: Arc<dyn OutputChannel> = Arc::new(TracingOutputChannel);
    let (init_program, init_args) = config.init_command()?;

    let ports = WorkflowPorts {
        catalog: Arc::new(catalog),
        prompter: prompter.clone(),
        app_settings: Arc::new(PromptingAppSettingsResolver::new(prompter.clone())),
        storage: Arc::new(LocalSettingsStorageValidator::new(prompter)),
        initializer: Arc::new(CommandProjectInitializer::new(
            executor.clone(),
            output.clone(),
            init_program,
            init_args,
        )),
        executor,
        output,
        opener: Arc::new(ConsoleFileOpener),
    };
    Ok(CreateFunctionUseCase::new(ports, config))
}
