//! `dspmctl rules` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use dspm_core::config::DspmConfig;
use dspm_engine::pii::rules::RuleSource;
use dspm_engine::{EngineError, PiiDetector, PiiRuleLoader, PiiRuleSet};

use crate::cli::{RulesAction, RulesArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `rules` command.
pub async fn execute(
    args: RulesArgs,
    config: &DspmConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        RulesAction::List => execute_list(config, writer).await,
        RulesAction::Validate { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(&config.pii.rules_path));
            execute_validate(&path, writer).await
        }
    }
}

/// List the rules the scanner would use, including the built-in fallback.
async fn execute_list(config: &DspmConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let rules = PiiRuleLoader::load(&config.pii.rules_path).await?;
    let report = RuleListReport::from_rule_set(&rules);
    writer.render(&report)
}

/// Validate a rule file strictly: the file must exist, parse, and compile.
async fn execute_validate(path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %path.display(), "validating PII rules");

    let report = match validate_file(path).await {
        Ok(rules) => RuleValidationReport {
            path: path.display().to_string(),
            valid: true,
            rules: rules.len(),
            errors: Vec::new(),
        },
        Err(e) => RuleValidationReport {
            path: path.display().to_string(),
            valid: false,
            rules: 0,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Rule(format!(
            "{} is not a valid rule file",
            report.path
        )));
    }
    Ok(())
}

async fn validate_file(path: &Path) -> Result<PiiRuleSet, EngineError> {
    let rules = PiiRuleLoader::load_strict(path).await?;
    PiiDetector::new(rules.clone())?;
    Ok(rules)
}

#[derive(Serialize)]
pub struct RuleListReport {
    pub source: String,
    pub total: usize,
    pub rules: Vec<RuleEntry>,
}

#[derive(Serialize)]
pub struct RuleEntry {
    pub name: String,
    pub pattern: String,
    pub description: String,
}

impl RuleListReport {
    pub fn from_rule_set(rules: &PiiRuleSet) -> Self {
        let source = match rules.source() {
            RuleSource::File(path) => path.clone(),
            RuleSource::BuiltIn => "built-in".to_owned(),
            RuleSource::Inline => "inline".to_owned(),
        };
        Self {
            source,
            total: rules.len(),
            rules: rules
                .rules()
                .iter()
                .map(|r| RuleEntry {
                    name: r.name.clone(),
                    pattern: r.pattern.clone(),
                    description: r.description.clone(),
                })
                .collect(),
        }
    }
}

impl Render for RuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "PII rules: {} (source: {})", self.total, self.source.bold())?;
        if self.rules.is_empty() {
            writeln!(w, "{}", "No rules configured.".yellow())?;
            return Ok(());
        }
        writeln!(w)?;
        writeln!(w, "{:<14} {:<36} Pattern", "Name", "Description")?;
        writeln!(w, "{}", "-".repeat(90))?;
        for rule in &self.rules {
            writeln!(
                w,
                "{:<14} {:<36} {}",
                rule.name, rule.description, rule.pattern
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct RuleValidationReport {
    pub path: String,
    pub valid: bool,
    pub rules: usize,
    pub errors: Vec<String>,
}

impl Render for RuleValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Rule Validation: {}", self.path.bold())?;
        if self.valid {
            writeln!(w, "  Result: {} ({} rules)", "VALID".green().bold(), self.rules)?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}
