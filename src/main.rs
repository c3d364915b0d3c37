use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use reductor::logging::init_tracing;
use reductor::showcase::{showcase_definition, ShowcaseActions, ShowcaseData, ShowcaseStatePatch, Theme};
use reductor::{Action, Store, StoreConfig};

/// Drive the showcase store from the command line and print the final state.
#[derive(Debug, Parser)]
#[command(name = "reductor-demo", version)]
struct Cli {
    /// Store config file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every dispatch at debug level.
    #[arg(long)]
    trace: bool,

    /// Commands: `theme=<light|dark>`, `data:<key>=<value>`, `reset`.
    commands: Vec<DemoCommand>,
}

#[derive(Debug, Clone, PartialEq)]
enum DemoCommand {
    Theme(Theme),
    Data { key: String, value: String },
    Reset,
}

impl FromStr for DemoCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s == "reset" {
            return Ok(Self::Reset);
        }
        if let Some(theme) = s.strip_prefix("theme=") {
            return Ok(Self::Theme(theme.parse()?));
        }
        if let Some(entry) = s.strip_prefix("data:") {
            let Some((key, value)) = entry.split_once('=') else {
                bail!("expected data:<key>=<value>, got '{s}'");
            };
            return Ok(Self::Data {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        bail!("unknown command '{s}'")
    }
}

impl DemoCommand {
    fn into_action(self, actions: &ShowcaseActions) -> Action {
        match self {
            Self::Theme(theme) => actions.set_state.action(ShowcaseStatePatch {
                theme: Some(theme),
                ..Default::default()
            }),
            Self::Data { key, value } => actions.set_data.action(ShowcaseData::from([(key, value)])),
            Self::Reset => actions.reset_state.action(()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StoreConfig::load().context("loading default store config")?,
    };
    config.trace_dispatch |= cli.trace;

    init_tracing(if config.trace_dispatch { "debug" } else { "warn" });

    let store = Store::with_config(showcase_definition(&config), &config);
    let actions = ShowcaseActions::new();

    let notifications = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&notifications);
    let _subscription = store.subscribe(move |_| {
        counted.fetch_add(1, Ordering::Relaxed);
    });

    for command in cli.commands {
        store
            .dispatch(command.into_action(&actions))
            .context("dispatching command")?;
    }

    let report = serde_json::json!({
        "store": store.name(),
        "version": store.version(),
        "notifications": notifications.load(Ordering::Relaxed),
        "state": *store.get_state(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
