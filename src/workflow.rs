use crate::audit::{
    AuditConfig, AuditResult, AuditRunner, CompatibilityResolver, RunOptions, SearchStrategy,
};
use crate::cli::Cli;
use crate::error::{AuditError, Result};
use crate::export::{DEFAULT_EXPORT_FILE, write_failure_report};
use crate::interaction::AuditInteraction;
use crate::modpack::ModpackIndex;
use crate::registry::RegistryFactory;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Execute the audit workflow
pub fn execute_audit(cli: &Cli) -> Result<()> {
    execute_audit_with(cli, &mut AuditInteraction::stdio(cli.yes))
}

fn execute_audit_with<R: BufRead, W: Write>(
    cli: &Cli,
    interaction: &mut AuditInteraction<R, W>,
) -> Result<()> {
    println!(
        "{}",
        format!(
            "Auditing modpack for Minecraft {}...",
            cli.target_version
        )
        .cyan()
        .bold()
    );

    // Step 1: Read the manifest
    println!("\n{}", "1. Reading modpack manifest...".yellow());
    let index = ModpackIndex::from_archive(&cli.modpack)?;
    println!("{}", "✓ Manifest loaded".green());
    println!(
        "   Base version: {}",
        index.dependencies.minecraft.bright_cyan()
    );
    println!(
        "   {} mods to check ({} disabled)",
        index.active_entries().count(),
        index.disabled_count()
    );

    let config = AuditConfig::new(&cli.target_version, cli.loader, &index.base_version());
    // Bad --api-url must surface before the user is asked anything
    let client = RegistryFactory::create_modrinth(&cli.api_url, Duration::from_secs(cli.timeout))?;

    // Step 2: Pick the search strategy
    println!("\n{}", "2. Selecting search strategy...".yellow());
    match config.strategy() {
        SearchStrategy::Comprehensive { loader, .. } => {
            println!(
                "   Full search for {} builds",
                loader.to_string().bright_cyan()
            );
            match interaction.confirm_full_search() {
                Ok(()) => {}
                Err(AuditError::UserCancelled) => {
                    println!("{}", "Exclude mod loader to perform a fast search.".yellow());
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
        SearchStrategy::Fast => {
            println!(
                "{} - Fast search does not check for mod loader compatibility.",
                "WARNING".yellow().bold()
            );
        }
    }

    // Step 3: Resolve every mod
    println!("\n{}", "3. Checking mods against Modrinth...".yellow());
    let resolver = CompatibilityResolver::new(client, &config);
    let runner = AuditRunner::new(
        resolver,
        RunOptions {
            keep_going: cli.keep_going,
            jobs: usize::from(cli.jobs),
            show_progress: true,
        },
    );

    let start = Instant::now();
    let result = runner.run(&index.files)?;
    let elapsed = start.elapsed();
    println!("{}", "✓ Check completed".green());

    // Step 4: Report
    print_summary(&result);
    export_failures(cli, &result, interaction)?;

    println!(
        "\n{} in {:.2} seconds.",
        "Done!".green().bold(),
        elapsed.as_secs_f64()
    );
    if config.loader.is_none() {
        println!(
            "{}",
            "Please note that the fast search does not check for mod loader compatibility."
                .dimmed()
        );
        println!(
            "{}",
            "If you wish to perform a full search, please include the mod loader as an argument."
                .dimmed()
        );
    }

    Ok(())
}

fn print_summary(result: &AuditResult) {
    println!("\n{}", "Audit Summary:".cyan().bold());
    println!("  {} {}", "Total mods:".blue(), result.modcount);
    println!("  {} {}", "Updatable mods:".green(), result.updatable);
    println!(
        "  {} {} ({} categories)",
        "Failed mods:".red(),
        result.failed_count(),
        result.failure_categories()
    );
    if !result.errored.is_empty() {
        println!("  {} {}", "Errored mods:".magenta(), result.errored.len());
    }
    println!("  {} {:.2}%", "Update ratio:".blue(), result.update_ratio());

    for (category, titles) in result.sorted_failures() {
        println!("\n{}:", category.cyan().bold());
        for title in titles {
            println!("  • {}", title.white());
        }
    }

    if !result.errored.is_empty() {
        println!("\n{}:", "Lookup errors".magenta().bold());
        for errored in &result.errored {
            println!(
                "  • {}/{} {}",
                errored.category,
                errored.name.white().bold(),
                errored.reason.dimmed()
            );
        }
    }
}

fn export_failures<R: BufRead, W: Write>(
    cli: &Cli,
    result: &AuditResult,
    interaction: &mut AuditInteraction<R, W>,
) -> Result<()> {
    if !result.has_failures() {
        println!("\n{}", "✨ No incompatible mods to export!".green().bold());
        return Ok(());
    }

    if let Some(path) = &cli.export {
        return write_report(result, path);
    }

    if !cli.no_export && interaction.confirm_export()? {
        return write_report(result, Path::new(DEFAULT_EXPORT_FILE));
    }

    Ok(())
}

fn write_report(result: &AuditResult, path: &Path) -> Result<()> {
    write_failure_report(result, path)?;
    println!(
        "{}",
        format!("✓ Failed mods written to {}", path.display()).green()
    );
    Ok(())
}
