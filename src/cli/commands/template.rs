//! Template command implementation

use colored::*;

use super::shared::{load_config, write_output};
use crate::app::services::denormalizer::write_template;
use crate::cli::args::{Args, OutputFormat, TemplateArgs};

/// Write an import template for the configured catalog and bracket list
pub async fn run_template(args: &Args, template: &TemplateArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let catalog = config.catalog()?;
    let brackets = config.bracket_set()?;
    let blank_rows = template.rows.unwrap_or(config.template_blank_rows);

    let mut buffer = Vec::new();
    write_template(&mut buffer, &catalog, &brackets, &config.area_column, blank_rows)?;
    write_output(template.output.as_deref(), &buffer)?;

    if let (Some(path), OutputFormat::Human) = (&template.output, args.output_format) {
        println!(
            "{} {} with {} brackets",
            "Wrote template".bright_green().bold(),
            path.display().to_string().bright_cyan(),
            brackets.len().to_string().bright_white()
        );
    }
    Ok(())
}
