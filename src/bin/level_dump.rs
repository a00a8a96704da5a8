use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use graal_levels::{load_level, Level, LoadOptions, ResolverConfig, SpriteResolver};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "level-dump")]
#[command(about = "Decode Graal level files and print their contents")]
struct Args {
    /// Level files to decode
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Sprite and script search root
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Resolver config (JSON); defaults to ~/.graal-levels/resolver.json if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip sprite lookup and script directives
    #[arg(long)]
    fast: bool,

    /// Print each level as JSON instead of the text dump
    #[arg(long)]
    json: bool,

    /// Print the four content hashes only
    #[arg(long)]
    hashes: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn resolver_config(args: &Args) -> Result<ResolverConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::from_json_file(path)?,
        None => {
            let default = ResolverConfig::default_path();
            if default.is_file() {
                ResolverConfig::from_json_file(&default)?
            } else {
                ResolverConfig::default()
            }
        }
    };
    if let Some(root) = &args.sprites {
        config.root = root.clone();
    }
    Ok(config)
}

fn print_level(level: &Level, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.hashes {
        let h = level.hashes();
        println!("{}", level.path.display());
        println!("  tile    {}", h.tile);
        println!("  palette {}", h.palette);
        println!("  content {}", h.content);
        println!("  level   {}", h.level);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(level)?);
    } else {
        println!("=== {} ===", level.path.display());
        print!("{}", level.debug_dump());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let options = Arc::new(LoadOptions {
        resolver: Some(SpriteResolver::new(resolver_config(&args)?)),
        fast: args.fast,
    });

    // Decodes are independent; run them on the blocking pool and report in
    // argument order.
    let tasks: Vec<_> = args
        .paths
        .iter()
        .cloned()
        .map(|path| {
            let options = Arc::clone(&options);
            tokio::task::spawn_blocking(move || {
                let result = load_level(&path, &options);
                (path, result)
            })
        })
        .collect();

    let mut failures = 0;
    for task in tasks {
        let (path, result) = task.await?;
        match result {
            Ok(level) => print_level(&level, &args)?,
            Err(err) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), err);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} files failed", failures, args.paths.len());
        std::process::exit(1);
    }
    Ok(())
}
