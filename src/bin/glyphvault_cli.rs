//! Glyphvault CLI - Operator bridge
//!
//! Commands: groups, asset, render, metadata, decode
//! Outputs JSON (SVG for render) to stdout
//! Returns non-zero on failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use glyphvault_core::{
    codec,
    metadata::token_metadata,
    registry::{AssetDefinition, AssetRegistry},
    validation::CharsetValidator,
    RenderComposer, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "glyphvault-cli", version = ENGINE_VERSION)]
#[command(about = "Glyphvault CLI - Append-Only Vector Asset Registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the asset definition directory
    #[arg(short, long, default_value = "definitions")]
    definitions_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the full group/category/asset hierarchy
    Groups,

    /// Show one asset's attributes
    Asset {
        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        name: String,
    },

    /// Render an asset as a full SVG document
    Render {
        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        name: String,
    },

    /// Token metadata JSON for an asset
    Metadata {
        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        name: String,
    },

    /// Decode a base64-encoded packed part body into path text
    Decode {
        /// Base64-encoded body bytes
        #[arg(short, long)]
        body: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Local bridge: the definition directory stands in for the hosting
    // environment's submission channel, so the allow-list bypass is on.
    let mut registry = AssetRegistry::new();
    registry.allow_list_mut().set_open(true);

    let definitions = match AssetDefinition::load_dir(&cli.definitions_dir) {
        Ok(d) => d,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to read definitions: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };
    for outcome in registry.register_batch(&definitions, "local", &CharsetValidator) {
        if let Err(e) = outcome {
            eprintln!(r#"{{"error": "Skipped definition: {}"}}"#, e);
        }
    }

    let composer = RenderComposer::new(&registry, &CharsetValidator);

    match cli.command {
        Commands::Groups => {
            let hierarchy = match hierarchy_json(&registry) {
                Ok(h) => h,
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };
            println!("{}", serde_json::to_string_pretty(&hierarchy).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Asset {
            group,
            category,
            name,
        } => match asset_json(&registry, &group, &category, &name) {
            Ok(output) => {
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!(r#"{{"error": "{}"}}"#, e);
                ExitCode::from(2)
            }
        },

        Commands::Render {
            group,
            category,
            name,
        } => {
            let document = registry
                .asset_id(&group, &category, &name)
                .and_then(|id| composer.compose_document(id));
            match document {
                Ok(svg) => {
                    println!("{}", svg);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Metadata {
            group,
            category,
            name,
        } => {
            let metadata = registry
                .asset_id(&group, &category, &name)
                .and_then(|id| token_metadata(&registry, &composer, id));
            match metadata {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Decode { body } => {
            let bytes = match base64::Engine::decode(
                &base64::engine::general_purpose::STANDARD,
                body.as_bytes(),
            ) {
                Ok(b) => b,
                Err(e) => {
                    println!(r#"{{"error": "Invalid base64 body: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };
            match codec::decode(&bytes) {
                Ok(path) => {
                    println!("{}", serde_json::json!({ "path": path }));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    ExitCode::from(2)
                }
            }
        }
    }
}

fn hierarchy_json(registry: &AssetRegistry) -> glyphvault_core::Result<serde_json::Value> {
    let mut groups = Vec::new();
    for g in 0..registry.group_count() {
        let group = registry.group_name_at(g)?;
        let mut categories = Vec::new();
        for c in 0..registry.category_count(group)? {
            let category = registry.category_name_at(group, c)?;
            let mut assets = Vec::new();
            for a in 0..registry.asset_count(group, category)? {
                let id = registry.asset_id_at(group, category, a)?;
                assets.push(serde_json::json!({
                    "id": id,
                    "name": registry.asset_raw(id)?.name,
                }));
            }
            categories.push(serde_json::json!({
                "category": category,
                "assets": assets,
            }));
        }
        groups.push(serde_json::json!({
            "group": group,
            "categories": categories,
        }));
    }
    Ok(serde_json::Value::Array(groups))
}

fn asset_json(
    registry: &AssetRegistry,
    group: &str,
    category: &str,
    name: &str,
) -> glyphvault_core::Result<serde_json::Value> {
    let id = registry.asset_id(group, category, name)?;
    let asset = registry.visible_asset(id)?;
    Ok(serde_json::json!({
        "id": id,
        "group": registry.group_name(asset.group)?,
        "category": registry.category_name(asset.group, asset.category)?,
        "name": asset.name,
        "width": asset.width,
        "height": asset.height,
        "minter": asset.minter,
        "soulbound": asset.soulbound,
        "parts": asset.parts,
    }))
}
