//! Choosing the template a new function starts from

use tracing::debug;

use crate::core::error::{Error, Result};
use crate::generation::{ContextUpdate, PickOption, Prompter, pick_item};
use crate::application::ProjectSettings;
use crate::infrastructure::templates::{Template, TemplateCatalog};

pub struct TemplateSelector<'a> {
    catalog: &'a dyn TemplateCatalog,
    prompter: &'a dyn Prompter,
}

impl<'a> TemplateSelector<'a> {
    pub fn new(catalog: &'a dyn TemplateCatalog, prompter: &'a dyn Prompter) -> Self {
        Self { catalog, prompter }
    }

    /// Templates the user may choose from, failing if there are none
    pub async fn eligible(&self, settings: &ProjectSettings) -> Result<Vec<Template>> {
        let templates = self
            .catalog
            .eligible_templates(settings.language, settings.runtime, settings.filter)
            .await?;
        if templates.is_empty() {
            return Err(Error::NoEligibleTemplates {
                language: settings.language.to_string(),
                runtime: settings.runtime.to_string(),
                filter: settings.filter.to_string(),
            });
        }
        Ok(templates)
    }

    /// Pick a template, or look up `preset_id` among the eligible ones
    pub async fn select(
        &self,
        settings: &ProjectSettings,
        preset_id: Option<&str>,
    ) -> Result<(Template, ContextUpdate)> {
        let templates = self.eligible(settings).await?;
        debug!(count = templates.len(), "Eligible templates");

        let template = match preset_id {
            Some(id) => templates
                .into_iter()
                .find(|t| t.id.eq_ignore_ascii_case(id))
                .ok_or_else(|| Error::TemplateNotFound(id.to_string()))?,
            None => {
                let items: Vec<(PickOption, Template)> = templates
                    .into_iter()
                    .map(|t| (PickOption::new(t.name.as_str()), t))
                    .collect();
                pick_item(self.prompter, "Select a template for your function", &items).await?
            }
        };

        let update = ContextUpdate::new().set("templateId", &template.id);
        Ok((template, update))
    }
}
