//! Output formatting for JSON, YAML and human-readable text

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::modules::{
    DetectionOutcome, ModuleId, ModuleRegistry, ModuleType, PriorityType, StackCommands,
};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// One surviving module as reported by `franken detect`
#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub id: ModuleId,
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub priority: PriorityType,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub project_root: PathBuf,
    pub modules: Vec<ModuleReport>,
    pub excluded: Vec<ModuleId>,
}

impl DetectionReport {
    pub fn from_outcome(project_root: PathBuf, outcome: &DetectionOutcome) -> Self {
        let modules = outcome
            .modules()
            .iter()
            .map(|detected| ModuleReport {
                id: detected.id(),
                name: detected.id().name(),
                module_type: detected.module.module_type(),
                priority: detected.module.priority_type(),
                confidence: detected.result.confidence,
                version: detected.version.clone(),
                evidence: detected.result.evidence.clone(),
            })
            .collect();

        Self {
            project_root,
            modules,
            excluded: outcome.excluded().to_vec(),
        }
    }
}

/// Registry entry as reported by `franken modules`
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub name: String,
    pub enabled: bool,
}

impl ModuleSummary {
    pub fn from_registry(registry: &ModuleRegistry) -> Vec<Self> {
        registry
            .registrations()
            .iter()
            .map(|r| Self {
                id: r.id.clone(),
                name: r.id.name(),
                enabled: r.enabled,
            })
            .collect()
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_detection(&self, report: &DetectionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report, "detection report"),
            OutputFormat::Yaml => to_yaml(report, "detection report"),
            OutputFormat::Human => Ok(self.format_detection_human(report)),
        }
    }

    pub fn format_commands(&self, commands: &StackCommands) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(commands, "commands"),
            OutputFormat::Yaml => to_yaml(commands, "commands"),
            OutputFormat::Human => Ok(self.format_commands_human(commands)),
        }
    }

    pub fn format_modules(&self, modules: &[ModuleSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&modules, "module list"),
            OutputFormat::Yaml => to_yaml(&modules, "module list"),
            OutputFormat::Human => Ok(self.format_modules_human(modules)),
        }
    }

    fn format_detection_human(&self, report: &DetectionReport) -> String {
        let mut output = String::new();

        if report.modules.is_empty() {
            output.push_str("\u{26A0} No Technologies Detected\n");
        } else {
            output.push_str("\u{2713} Detected Stack\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");
        output.push_str(&format!("Project: {}\n\n", report.project_root.display()));

        for (index, module) in report.modules.iter().enumerate() {
            let last = index + 1 == report.modules.len();
            let branch = if last { "\u{2514}\u{2500}" } else { "\u{251C}\u{2500}" };
            let stem = if last { "   " } else { "\u{2502}  " };

            let version = module
                .version
                .as_deref()
                .map(|v| format!(" {}", v))
                .unwrap_or_default();
            output.push_str(&format!(
                "{} {}{} [{}] confidence {:.2}\n",
                branch, module.name, version, module.priority, module.confidence
            ));
            for evidence in &module.evidence {
                output.push_str(&format!("{}   {}\n", stem, evidence));
            }
        }

        if !report.excluded.is_empty() {
            let excluded: Vec<&str> = report.excluded.iter().map(ModuleId::key).collect();
            output.push_str(&format!("\nExcluded: {}\n", excluded.join(", ")));
        }

        output
    }

    fn format_commands_human(&self, commands: &StackCommands) -> String {
        let mut output = String::new();
        output.push_str("Stack Commands\n");
        output.push_str(RULE);
        output.push('\n');

        let sections = [
            ("Install", &commands.install),
            ("Dev", &commands.dev),
            ("Build", &commands.build),
            ("Test", &commands.test),
            ("Lint", &commands.lint),
        ];
        for (label, list) in sections {
            output.push_str(&format!("\n{}:\n", label));
            if list.is_empty() {
                output.push_str("  (none)\n");
            }
            for command in list.iter() {
                output.push_str(&format!("  {}\n", command));
            }
        }

        output
    }

    fn format_modules_human(&self, modules: &[ModuleSummary]) -> String {
        let mut output = String::new();
        output.push_str("Registered Modules\n");
        output.push_str(RULE);
        output.push('\n');

        for module in modules {
            let state = if module.enabled { "enabled" } else { "disabled" };
            output.push_str(&format!(
                "  {:<12} {:<14} {}\n",
                module.id.key(),
                module.name,
                state
            ));
        }

        output
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> DetectionReport {
        DetectionReport {
            project_root: PathBuf::from("/repo"),
            modules: vec![ModuleReport {
                id: ModuleId::Statamic,
                name: "Statamic".to_string(),
                module_type: ModuleType::Framework,
                priority: PriorityType::MetaFramework,
                confidence: 0.8,
                version: Some("5".to_string()),
                evidence: vec!["statamic/cms in composer.json".to_string()],
            }],
            excluded: vec![ModuleId::Laravel],
        }
    }

    #[test]
    fn test_json_detection_report() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_detection(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["modules"][0]["id"], "statamic");
        assert_eq!(value["modules"][0]["type"], "framework");
        assert_eq!(value["modules"][0]["priority"], "meta-framework");
        assert_eq!(value["excluded"][0], "laravel");
    }

    #[test]
    fn test_yaml_commands() {
        let commands = StackCommands {
            test: vec!["php artisan test".to_string()],
            ..Default::default()
        };
        let output = OutputFormatter::new(OutputFormat::Yaml)
            .format_commands(&commands)
            .unwrap();
        assert!(output.contains("- php artisan test"));
    }

    #[test]
    fn test_human_detection_report() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_detection(&sample_report())
            .unwrap();

        assert!(output.starts_with("\u{2713} Detected Stack"));
        assert!(output.contains("Statamic 5 [meta-framework] confidence 0.80"));
        assert!(output.contains("statamic/cms in composer.json"));
        assert!(output.contains("Excluded: laravel"));
    }

    #[test]
    fn test_human_empty_commands() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_commands(&StackCommands::new())
            .unwrap();
        assert_eq!(output.matches("(none)").count(), 5);
    }

    #[test]
    fn test_module_summary_lists_disabled() {
        let mut registry = ModuleRegistry::with_defaults();
        registry.disable(&ModuleId::Nuxt);

        let summaries = ModuleSummary::from_registry(&registry);
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_modules(&summaries)
            .unwrap();

        assert!(output.lines().any(|l| l.contains("nuxt") && l.ends_with("disabled")));
        assert_eq!(summaries.len(), 14);
    }
}
