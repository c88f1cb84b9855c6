//! CLI entry point for kanshi-profile-manager
//!
//! Provides the command-line interface for inspecting, validating, and
//! canonically rewriting kanshi configs, plus the niri-backed preview
//! and reload commands.

use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use kanshi_profile_manager::config::ConfigManager;
use kanshi_profile_manager::core::{parser::parse, serializer::serialize, Config, Output};
use kanshi_profile_manager::ipc::{plan_commands, ClientMode, ConnectedOutput, NiriClient};

const DEFAULT_CONFIG: &str = "~/.config/kanshi/config";

#[derive(Parser)]
#[command(name = "kanshi-profile-manager")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config file and report parse errors
    Check {
        /// Path to kanshi config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// List all profiles and their outputs
    List {
        /// Path to kanshi config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Reprint the config in canonical form
    Format {
        /// Path to kanshi config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Rewrite the file in place (with backup) instead of printing
        #[arg(long)]
        write: bool,
    },

    /// Show outputs currently connected according to niri
    Outputs,

    /// Preview a profile's output settings via niri msg
    Apply {
        /// Profile name to apply (first match wins on duplicates)
        profile: String,

        /// Path to kanshi config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Only apply entries matching these connectors (repeatable)
        #[arg(long = "connector")]
        connectors: Vec<String>,

        /// Print the niri commands without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the running kanshi daemon to reload its config
    Reload,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => check_config(&config)?,
        Commands::List { config } => list_profiles(&config)?,
        Commands::Format { config, write } => format_config(&config, write)?,
        Commands::Outputs => show_outputs()?,
        Commands::Apply {
            profile,
            config,
            connectors,
            dry_run,
        } => apply_profile(&profile, &config, &connectors, dry_run)?,
        Commands::Reload => reload_daemon()?,
    }

    Ok(())
}

/// Expand tilde in a user-supplied path
fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(
        path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Read and parse a config file, with the parse error shown nicely
fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(parse(&content)?)
}

/// Validate the config and report what was found
fn check_config(config_path: &Path) -> anyhow::Result<()> {
    let path = expand_path(config_path)?;
    println!("{} Parsing config: {}", "→".cyan(), path.display());

    let content = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    match parse(&content) {
        Ok(config) => {
            let outputs: usize = config.profiles.iter().map(|p| p.outputs.len()).sum();
            println!(
                "{} {} profile{}, {} output{}",
                "✓".green().bold(),
                config.profiles.len(),
                if config.profiles.len() == 1 { "" } else { "s" },
                outputs,
                if outputs == 1 { "" } else { "s" },
            );
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), e);
            println!(
                "{}",
                format!("  (byte offset {} in {})", e.offset(), path.display()).dimmed()
            );
            process::exit(1);
        }
    }

    Ok(())
}

/// List every profile with its outputs and directives
fn list_profiles(config_path: &Path) -> anyhow::Result<()> {
    let path = expand_path(config_path)?;
    let config = load_config(&path)?;

    println!("{}", format!("Profiles from: {}\n", path.display()).bold());

    for profile in &config.profiles {
        let name = profile.name.as_deref().unwrap_or("(anonymous)");
        println!("{}", name.cyan().bold());

        for output in &profile.outputs {
            println!("  {} {}", "output".magenta(), output.criteria);
            for directive in describe_directives(output) {
                println!("    {}", directive.dimmed());
            }
        }
        println!();
    }

    println!(
        "{} Total: {} profiles",
        "✓".green(),
        config.profiles.len()
    );

    Ok(())
}

/// Human-readable directive lines for one output entry
fn describe_directives(output: &Output) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(enabled) = output.enabled {
        lines.push(if enabled { "enable".to_string() } else { "disable".to_string() });
    }
    if let Some(mode) = &output.mode {
        lines.push(format!("mode {}", mode));
    }
    if let Some(scale) = output.scale {
        lines.push(format!("scale {}", scale));
    }
    if let Some(position) = &output.position {
        lines.push(format!("position {}", position));
    }
    if let Some(transform) = &output.transform {
        lines.push(format!("transform {}", transform));
    }
    if let Some(adaptive_sync) = output.adaptive_sync {
        lines.push(format!("adaptive_sync {}", if adaptive_sync { "on" } else { "off" }));
    }
    lines
}

/// Print or rewrite the config in canonical form
fn format_config(config_path: &Path, write: bool) -> anyhow::Result<()> {
    let path = expand_path(config_path)?;
    let config = load_config(&path)?;

    if write {
        let manager = ConfigManager::new(path.clone())?;
        manager.save(&config)?;
        println!(
            "{} Rewrote {} canonically (previous version backed up)",
            "✓".green(),
            path.display()
        );
    } else {
        print!("{}", serialize(&config));
    }

    Ok(())
}

/// Show what niri reports as connected
fn show_outputs() -> anyhow::Result<()> {
    let client = NiriClient::new(ClientMode::ReadOnly);
    let outputs = client.detect_outputs()?;

    if outputs.is_empty() {
        println!("{}", "No outputs reported by niri".yellow());
        return Ok(());
    }

    for output in &outputs {
        println!("{}  {}", output.connector.cyan().bold(), output.description);

        if let Some(mode) = output.current_mode {
            println!(
                "  current: {}x{} @ {:.3} Hz",
                mode.width, mode.height, mode.refresh_rate
            );
        } else {
            println!("  current: {}", "off".dimmed());
        }

        if let Some(position) = output.logical_position {
            println!("  position: {}", position);
        }
        if let Some(scale) = output.scale {
            println!("  scale: {}", scale);
        }
        if let Some(transform) = &output.transform {
            println!("  transform: {}", transform);
        }
        println!(
            "  vrr: {}",
            if output.vrr_enabled {
                "on"
            } else if output.vrr_supported {
                "off (supported)"
            } else {
                "unsupported"
            }
        );
        println!();
    }

    println!("{} {} connected", "✓".green(), outputs.len());

    Ok(())
}

/// Preview one profile's settings through niri msg
fn apply_profile(
    name: &str,
    config_path: &Path,
    connectors: &[String],
    dry_run: bool,
) -> anyhow::Result<()> {
    let path = expand_path(config_path)?;
    let config = load_config(&path)?;

    // Duplicate profile names are preserved by the parser; the first
    // match is authoritative here.
    let profile = config
        .profiles
        .iter()
        .find(|p| p.name.as_deref() == Some(name))
        .ok_or_else(|| {
            let known: Vec<&str> = config
                .profiles
                .iter()
                .filter_map(|p| p.name.as_deref())
                .collect();
            anyhow::anyhow!("Profile {:?} not found (known: {})", name, known.join(", "))
        })?;

    let client = NiriClient::new(if dry_run {
        ClientMode::DryRun
    } else {
        ClientMode::Live
    });

    let detected = if dry_run {
        Vec::new()
    } else {
        client.detect_outputs()?
    };

    for output in &profile.outputs {
        let connector = resolve_connector(output, &detected);

        if !connectors.is_empty()
            && !connectors.iter().any(|c| *c == connector || *c == output.criteria)
        {
            continue;
        }

        let plan = plan_commands(&connector, output);

        if plan.is_empty() {
            println!("{} {}: nothing to apply", "→".cyan(), output.criteria);
            continue;
        }

        if dry_run {
            for args in &plan {
                println!("niri {}", args.join(" "));
            }
        } else {
            client.apply_output(&connector, output)?;
            println!("{} applied {} ({})", "✓".green(), output.criteria, connector);
        }
    }

    Ok(())
}

/// Map an entry's criteria to a live connector name.
///
/// Criteria are either a connector name or the "Make Model Serial"
/// description; when nothing matches (or detection was skipped), the
/// criteria string itself is handed to niri.
fn resolve_connector(output: &Output, detected: &[ConnectedOutput]) -> String {
    detected
        .iter()
        .find(|o| o.connector == output.criteria || o.description == output.criteria)
        .map(|o| o.connector.clone())
        .unwrap_or_else(|| output.criteria.clone())
}

/// Signal the kanshi daemon to reload
fn reload_daemon() -> anyhow::Result<()> {
    let client = NiriClient::new(ClientMode::Live);
    client.reload_daemon()?;
    println!("{} kanshi reloaded", "✓".green());
    Ok(())
}
