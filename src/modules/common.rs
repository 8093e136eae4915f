//! Helpers shared by the built-in modules

use super::{DetectedStack, GuidelinePath, ModuleId, PriorityType, StackCommands};
use regex::Regex;
use std::sync::OnceLock;

fn major_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\^~>=<v*\s]*(\d+)").expect("valid major version pattern"))
}

/// Leading major version of a constraint or version string.
///
/// Accepts semver constraints (`^4.2.1`, `~3.0`, `>=8.1 <9`), alternatives
/// (`^10.0 || ^11.0` yields the first) and tagged versions (`v11.9.2`).
pub fn major_version(constraint: &str) -> Option<String> {
    let first = constraint.split("||").next()?.trim();
    major_pattern()
        .captures(first)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Locked version first, then the manifest constraint, reduced to its major.
pub fn resolve_major(locked: Option<&str>, constraint: Option<&str>) -> Option<String> {
    locked
        .and_then(major_version)
        .or_else(|| constraint.and_then(major_version))
}

/// Core document followed by the version-specific one.
pub fn standard_guideline_paths(
    id: &ModuleId,
    priority: PriorityType,
    category: &str,
    version: Option<&str>,
) -> Vec<GuidelinePath> {
    let mut paths = vec![GuidelinePath::new(
        format!("{}/guidelines/{}.md", id.key(), category),
        priority.clone(),
        category,
    )];

    if let Some(major) = version.and_then(major_version) {
        paths.push(
            GuidelinePath::new(
                format!("{}/guidelines/{}/features.md", id.key(), major),
                priority,
                category,
            )
            .with_version(major),
        );
    }

    paths
}

/// JavaScript package manager to drive scripts with. npm when none is known.
pub fn js_package_manager(stack: &DetectedStack) -> &'static str {
    ["bun", "pnpm", "yarn", "npm"]
        .into_iter()
        .find(|pm| stack.has_package_manager(pm))
        .unwrap_or("npm")
}

pub fn js_install(pm: &str) -> String {
    format!("{} install", pm)
}

pub fn js_run(pm: &str, script: &str) -> String {
    match pm {
        "yarn" | "pnpm" => format!("{} {}", pm, script),
        _ => format!("{} run {}", pm, script),
    }
}

/// Runs a package binary, e.g. `npx tsc` under npm.
pub fn js_exec(pm: &str, binary: &str) -> String {
    match pm {
        "yarn" => format!("yarn {}", binary),
        "pnpm" => format!("pnpm exec {}", binary),
        "bun" => format!("bunx {}", binary),
        _ => format!("npx {}", binary),
    }
}

const ESLINT_CONFIGS: &[&str] = &[
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.ts",
    ".eslintrc.json",
    ".eslintrc.js",
];

const VITE_CONFIGS: &[&str] = &["vite.config.js", "vite.config.mjs", "vite.config.ts"];

/// Install, build and lint commands every Node project gets, whichever
/// language module owns it.
pub fn js_commands(stack: &DetectedStack) -> StackCommands {
    let pm = js_package_manager(stack);
    let mut commands = StackCommands::new();

    commands.install.push(js_install(pm));

    if stack.has_dependency("eslint") || ESLINT_CONFIGS.iter().any(|c| stack.has_config_file(c)) {
        commands.lint.push(js_run(pm, "lint"));
    }
    if stack.has_dependency("vite") || VITE_CONFIGS.iter().any(|c| stack.has_config_file(c)) {
        commands.build.push(js_run(pm, "build"));
    }

    commands
}
