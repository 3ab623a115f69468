//! Command implementations for the CLI

use crate::{
    cli::Command,
    config::Config,
    core::{
        builder::CMakeBuilder,
        lifecycle::{Pipeline, PlanRequest, ResolutionPlan, resolve_plan},
        registry::Registry,
        validator::{CompatibilityVerdict, validate},
        version::VersionDetector,
    },
    utils::{
        env::{PackageReport, ReportWriter},
        fs::FileSystemUtils,
    },
};
use anyhow::{Context, bail};
use semver::Version;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config, command))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Validate => execute_validate_command(config),
        Command::Resolve { output } => execute_resolve_command(config, output.as_deref()),
        Command::Create { .. } => execute_create_command(config),
        Command::Id => execute_id_command(config),
        Command::Version => execute_version_command(config),
    }
}

/// Detect the package version from the recipe sources
fn detect_version(config: &Config) -> anyhow::Result<Version> {
    let header = config.version_header(Registry::current().package.version_header);
    let detector = VersionDetector::new()?;
    detector
        .detect(&header)
        .context("Failed to detect package version")
}

fn plan_request(config: &Config) -> anyhow::Result<PlanRequest> {
    Ok(PlanRequest {
        version: detect_version(config)?,
        options: config.options.clone(),
        toolchain: config.toolchain.clone(),
        test_mode: config.test_mode,
    })
}

/// Execute the validate command
#[instrument(skip(config))]
fn execute_validate_command(config: &Config) -> anyhow::Result<()> {
    let registry = Registry::current();
    let verdict = validate(registry, &config.toolchain, registry.min_standard)
        .context("Toolchain validation failed")?;
    verdict.report();

    match verdict {
        CompatibilityVerdict::Pass => {
            info!("{} is supported", config.toolchain);
            Ok(())
        }
        CompatibilityVerdict::UnknownCompiler { .. } => {
            info!("{} is not registered; continuing", config.toolchain);
            Ok(())
        }
        CompatibilityVerdict::Fail { reason } => bail!(reason),
    }
}

/// Execute the resolve command
#[instrument(skip(config))]
fn execute_resolve_command(config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let plan = resolve_plan(Registry::current(), &plan_request(config)?)
        .context("Failed to resolve package configuration")?;

    print_plan(&plan);

    if let Some(output) = output {
        let json = serde_json::to_string_pretty(&plan)?;
        FileSystemUtils::new()
            .write_file(output, json)
            .with_context(|| format!("Failed to write plan to {}", output.display()))?;
        info!("Resolution plan written to {}", output.display());
    }

    Ok(())
}

fn print_plan(plan: &ResolutionPlan) {
    println!("{}/{} for {}", plan.package, plan.version, plan.toolchain);
    println!("  {}", plan.metadata.description);
    println!("  license: {}, homepage: {}", plan.metadata.license, plan.metadata.url);
    println!("requires:");
    for dep in &plan.requires {
        println!("  {dep}");
    }
    if !plan.build_requires.is_empty() {
        println!("test requires:");
        for dep in &plan.build_requires {
            println!("  {dep}");
        }
    }
    println!("variables:");
    for (name, value) in plan.configuration.iter() {
        println!("  {name}={value}");
    }
    println!("package id: {}", plan.identity());
}

/// Execute the create command
#[instrument(skip(config))]
fn execute_create_command(config: &Config) -> anyhow::Result<()> {
    let request = plan_request(config)?;

    if let Some(previous) = previous_report(&config.package.report_file) {
        info!(
            "Replacing {}/{} (id {}, built {})",
            previous.package_name, previous.version, previous.package_id, previous.build_date
        );
    }

    let mut builder = CMakeBuilder::new(config);
    let mut pipeline = Pipeline::new(Registry::current());
    let outcome = pipeline
        .run(&request, &mut builder, &config.package.package_dir)
        .context("Failed to create package")?;

    let dependencies: Vec<String> = outcome.plan.requires.iter().map(|d| d.reference()).collect();
    let report = PackageReport::new(
        outcome.plan.package.clone(),
        outcome.plan.version.to_string(),
        outcome.identity.to_string(),
        outcome.plan.options.to_string(),
        dependencies.join(" "),
    );
    ReportWriter::new()
        .write(&report, &config.package.report_file)
        .context("Failed to write package report")?;

    info!(
        "Package {}/{} created with {} header(s), id {}",
        outcome.plan.package,
        outcome.plan.version,
        outcome.headers.len(),
        outcome.identity
    );
    Ok(())
}

/// Report left by an earlier `create` into the same package directory
fn previous_report(report_file: &Path) -> Option<PackageReport> {
    if !report_file.is_file() {
        return None;
    }
    match ReportWriter::new().load_from_file(report_file) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("Ignoring unreadable package report: {}", e);
            None
        }
    }
}

/// Execute the id command
#[instrument(skip(config))]
fn execute_id_command(config: &Config) -> anyhow::Result<()> {
    let plan = resolve_plan(Registry::current(), &plan_request(config)?)
        .context("Failed to resolve package configuration")?;
    println!("{}", plan.identity());
    Ok(())
}

/// Execute the version command
#[instrument(skip(config))]
fn execute_version_command(config: &Config) -> anyhow::Result<()> {
    println!("{}", detect_version(config)?);
    Ok(())
}
