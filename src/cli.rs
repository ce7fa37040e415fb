use crate::modrinth::DEFAULT_API_URL;
use crate::registry::Loader;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mrpack-audit",
    about = "Check which mods in a Modrinth modpack can be updated to another Minecraft version",
    version
)]
pub struct Cli {
    /// Path to the modpack archive (.mrpack)
    #[arg(value_name = "MODPACK")]
    pub modpack: PathBuf,

    /// Minecraft version to check compatibility against (e.g. 1.20.1)
    #[arg(value_name = "VERSION")]
    pub target_version: String,

    /// Mod loader to require; enables the full (loader-aware) search
    #[arg(value_enum, ignore_case = true, value_name = "LOADER")]
    pub loader: Option<Loader>,

    /// Skip the confirmation prompt before a full search
    #[arg(short, long)]
    pub yes: bool,

    /// Write failed mods to this file without prompting
    #[arg(long, value_name = "FILE", conflicts_with = "no_export")]
    pub export: Option<PathBuf>,

    /// Never offer to export failed mods
    #[arg(long)]
    pub no_export: bool,

    /// Keep checking when a registry lookup fails and report those mods separately
    #[arg(long)]
    pub keep_going: bool,

    /// Number of mods to check concurrently
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub jobs: u16,

    /// Base URL of the Modrinth API
    #[arg(long, env = "MRPACK_AUDIT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "MRPACK_AUDIT_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
