use anyhow::Context;
use assetvar_core::{AssetVariable, Callback};
use assetvar_persist::{Format, VariableStore};
use assetvar_tools::VariableInspector;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "assetvar-cli", about = "CLI tool for asset variables")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the variable assets
    #[arg(short, long, default_value = "assets/variables")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CLI version
    Info,
    /// Run the subscribe/unsubscribe demo
    Demo,
    /// Create a variable asset from a JSON value
    Create {
        name: String,
        /// Initial value as JSON, e.g. `5`, `"text"`, `[1.0, 2.0, 3.0]`
        value: String,
        /// Payload format: json, yaml or cbor
        #[arg(short, long, default_value = "json")]
        format: Format,
    },
    /// Show a variable asset
    Show { name: String },
    /// Edit a variable asset as the inspector would
    Set {
        name: String,
        /// New value as JSON
        value: String,
    },
    /// Force a refresh of a variable asset's subscribers without editing it
    Touch { name: String },
    /// List variable assets
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("assetvar-cli v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Demo => run_demo(),
        Commands::Create {
            name,
            value,
            format,
        } => {
            let store = VariableStore::open(&cli.store)?;
            if store.contains(&name) {
                anyhow::bail!("variable {name:?} already exists");
            }
            let value: Value = serde_json::from_str(&value).context("parsing initial value")?;
            let meta = store.save(&name, &AssetVariable::new(value), format)?;
            println!("Created {name} guid={} format={}", meta.guid, meta.format);
        }
        Commands::Show { name } => {
            let store = VariableStore::open(&cli.store)?;
            let meta = store.meta(&name)?;
            let var: AssetVariable<Value> = store.load(&name)?;
            println!("{name} guid={} format={}", meta.guid, meta.format);
            println!("{}", VariableInspector::summary(&var));
        }
        Commands::Set { name, value } => {
            let store = VariableStore::open(&cli.store)?;
            let meta = store.meta(&name)?;
            let mut var: AssetVariable<Value> = store.load(&name)?;

            let notified = watch(&mut var, &name);

            VariableInspector::edit_json(&mut var, &value)?;
            store.save(&name, &var, meta.format)?;
            println!("{name} = {} (notified {} subscriber(s))", var.get(), notified.get());
        }
        Commands::Touch { name } => {
            let store = VariableStore::open(&cli.store)?;
            let mut var: AssetVariable<Value> = store.load(&name)?;
            let notified = watch(&mut var, &name);

            VariableInspector::refresh(&var);
            println!("{name} refreshed (notified {} subscriber(s))", notified.get());
        }
        Commands::List => {
            let store = VariableStore::open(&cli.store)?;
            for name in store.list()? {
                let meta = store.meta(&name)?;
                println!("{name}\t{}\t{}", meta.format, meta.guid);
            }
        }
    }

    Ok(())
}

/// Attach a logging subscriber and return its notification counter.
fn watch(var: &mut AssetVariable<Value>, name: &str) -> Rc<Cell<u32>> {
    let notified = Rc::new(Cell::new(0u32));
    let n = notified.clone();
    let label = name.to_string();
    var.subscribe(Callback::new(move || {
        n.set(n.get() + 1);
        info!(variable = %label, "subscriber notified");
    }));
    notified
}

/// Subscribe A and B, set 5, drop A, set 7, printing who was notified.
fn run_demo() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let callback = |tag: &'static str| {
        let log = log.clone();
        Callback::new(move || log.borrow_mut().push(tag))
    };
    let a = callback("A");
    let b = callback("B");

    let mut var = AssetVariable::new(0i64);
    var.subscribe(a.clone());
    var.subscribe(b);

    var.set(5);
    println!("set 5 -> notified {:?}, value={}", log.borrow(), var.get());

    log.borrow_mut().clear();
    var.unsubscribe(&a);
    var.set(7);
    println!("set 7 -> notified {:?}, value={}", log.borrow(), var.get());
}
