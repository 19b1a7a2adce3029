use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use larder_core::path::data_root;
use larder_core::{
    BaseDirs, ContentKind, FixedDirs, LocalStore, Scope, StoreConfig, WriteOutcome,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "larder", about = "Inspect and edit a scoped on-disk object store")]
struct Cli {
    /// JSON config file overriding the cache/documents roots.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep both scopes under this directory (`<root>/cache`,
    /// `<root>/documents`). Takes precedence over `--config`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Logical resource name. Any `/` is dropped.
    name: String,

    #[arg(long, default_value = "documents")]
    scope: Scope,
}

#[derive(Args)]
struct KindedTarget {
    #[command(flatten)]
    target: Target,

    /// dictionary, generic, text or image.
    #[arg(long)]
    kind: ContentKind,
}

#[derive(Subcommand)]
enum Command {
    /// Store a text string.
    SaveText {
        #[command(flatten)]
        target: Target,
        text: String,
        #[arg(long)]
        overwrite: bool,
    },
    /// Store the contents of a file unchanged.
    SaveFile {
        #[command(flatten)]
        target: Target,
        file: PathBuf,
        #[arg(long)]
        overwrite: bool,
    },
    /// Store a JSON object as a dictionary.
    SaveDict {
        #[command(flatten)]
        target: Target,
        json: String,
        #[arg(long)]
        overwrite: bool,
    },
    /// Print a stored resource. Generic payloads go to stdout as raw bytes.
    Load(KindedTarget),
    /// Delete one resource.
    Rm(KindedTarget),
    /// Print where a resource lives, whether or not it exists.
    Path(KindedTarget),
    /// Delete every resource in a scope.
    Clear {
        #[arg(long, default_value = "documents")]
        scope: Scope,
    },
    /// List stored names of one kind.
    Ls {
        #[arg(long, default_value = "documents")]
        scope: Scope,
        #[arg(long)]
        kind: ContentKind,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let dirs: Box<dyn BaseDirs> = match (&cli.root, &cli.config) {
        (Some(root), _) => Box::new(FixedDirs::under(root)),
        (None, Some(path)) => Box::new(
            StoreConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?
                .resolver(),
        ),
        (None, None) => Box::new(StoreConfig::default().resolver()),
    };
    let store = LocalStore::new(dirs.as_ref());
    for line in describe_roots(&store) {
        log::debug!("{line}");
    }

    if run(&store, cli.command)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Executes one command. `Ok(false)` means the requested resource was absent.
fn run<D: BaseDirs>(store: &LocalStore<D>, command: Command) -> Result<bool> {
    match command {
        Command::SaveText {
            target,
            text,
            overwrite,
        } => {
            let outcome = store
                .save_text(&text, target.scope, &target.name, overwrite)
                .context("saving text")?;
            report(outcome, &target.name);
        }
        Command::SaveFile {
            target,
            file,
            overwrite,
        } => {
            let data =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let outcome = store
                .save_generic(&data, target.scope, &target.name, overwrite)
                .context("saving file")?;
            report(outcome, &target.name);
        }
        Command::SaveDict {
            target,
            json,
            overwrite,
        } => {
            let Value::Object(dict) =
                serde_json::from_str::<Value>(&json).context("parsing dictionary JSON")?
            else {
                bail!("dictionary must be a JSON object");
            };
            let outcome = store
                .save_dictionary(&dict, target.scope, &target.name, overwrite)
                .context("saving dictionary")?;
            report(outcome, &target.name);
        }
        Command::Load(KindedTarget { target, kind }) => {
            let Target { name, scope } = target;
            let found = match kind {
                ContentKind::Dictionary => match store.load_dictionary(&name, scope)? {
                    Some(dict) => {
                        println!("{}", serde_json::to_string_pretty(&dict)?);
                        true
                    }
                    None => false,
                },
                ContentKind::Text => match store.load_text(&name, scope)? {
                    Some(text) => {
                        println!("{text}");
                        true
                    }
                    None => false,
                },
                ContentKind::Generic => match store.load_generic(&name, scope)? {
                    Some(bytes) => {
                        let mut stdout = std::io::stdout().lock();
                        stdout.write_all(&bytes)?;
                        stdout.flush()?;
                        true
                    }
                    None => false,
                },
                ContentKind::Image => bail!("image resources cannot be loaded"),
            };
            if !found {
                eprintln!("no {kind} named '{name}' in {scope}");
                return Ok(false);
            }
        }
        Command::Rm(KindedTarget { target, kind }) => {
            store.remove_resource(&target.name, target.scope, kind);
        }
        Command::Path(KindedTarget { target, kind }) => {
            let path = store.resource_path(&target.name, target.scope, kind)?;
            println!("{}", path.display());
        }
        Command::Clear { scope } => {
            store.remove_all_items(scope);
        }
        Command::Ls { scope, kind } => {
            for name in store.list(scope, kind)? {
                println!("{name}");
            }
        }
    }
    Ok(true)
}

/// One line per scope naming the `Data` root the store will use.
fn describe_roots<D: BaseDirs>(store: &LocalStore<D>) -> Vec<String> {
    Scope::ALL
        .into_iter()
        .map(|scope| match store.dirs().base_dir(scope) {
            Some(base) => format!("{scope} root: {}", data_root(&base).display()),
            None => format!("{scope} root: unavailable"),
        })
        .collect()
}

fn report(outcome: WriteOutcome, name: &str) {
    if outcome == WriteOutcome::SkippedExisting {
        log::warn!("'{name}' already exists; pass --overwrite to replace it");
    }
}
