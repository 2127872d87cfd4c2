//! Language, runtime and template filter for the current project
//!
//! An explicit request value wins over the configuration. The language is
//! asked for when neither has one; runtime and filter fall back to defaults.

use std::str::FromStr;
use tracing::debug;

use crate::core::config::ProjectConfig;
use crate::core::error::{Error, Result};
use crate::generation::{
    ContextUpdate, Language, PickOption, Prompter, Runtime, TemplateFilter, pick_item,
};

/// Resolved project-wide choices for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectSettings {
    pub language: Language,
    pub runtime: Runtime,
    pub filter: TemplateFilter,
}

/// Values supplied with the request, each optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectSettingsOverrides {
    pub language: Option<Language>,
    pub runtime: Option<Runtime>,
    pub filter: Option<TemplateFilter>,
}

fn parse_configured<T>(key: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| match e {
                Error::Config(message) => Error::config(format!("project.{key}: {message}")),
                other => other,
            })
        })
        .transpose()
}

pub async fn resolve_project_settings(
    prompter: &dyn Prompter,
    overrides: ProjectSettingsOverrides,
    config: &ProjectConfig,
) -> Result<(ProjectSettings, ContextUpdate)> {
    let language = match overrides.language {
        Some(language) => language,
        None => match parse_configured::<Language>("language", config.language.as_deref())? {
            Some(language) => language,
            None => {
                let items: Vec<(PickOption, Language)> = Language::all()
                    .into_iter()
                    .map(|language| (PickOption::new(language.display_name()), language))
                    .collect();
                pick_item(prompter, "Select a language for your function project", &items).await?
            }
        },
    };

    let runtime = match overrides.runtime {
        Some(runtime) => runtime,
        None => parse_configured::<Runtime>("runtime", config.runtime.as_deref())?
            .unwrap_or_default(),
    };

    let filter = match overrides.filter {
        Some(filter) => filter,
        None => parse_configured::<TemplateFilter>(
            "template_filter",
            config.template_filter.as_deref(),
        )?
        .unwrap_or_default(),
    };

    debug!(%language, %runtime, %filter, "Resolved project settings");
    let update = ContextUpdate::new()
        .set("language", language)
        .set("runtime", runtime.as_str())
        .set("templateFilter", filter);
    Ok((
        ProjectSettings {
            language,
            runtime,
            filter,
        },
        update,
    ))
}
