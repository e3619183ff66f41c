//! Command-line front end over the profile store.
//!
//! This is the reference consumer of the enumeration/update interface: it
//! only ever calls the store's public operations, the same way any settings
//! UI would. It uses the strict tier so automation sees real I/O failures.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use inikit_store::ProfileStore;

#[derive(Parser, Debug)]
#[command(name = "inikit")]
#[command(about = "Sectioned key=value profile store")]
struct Cli {
    /// Profile file (defaults to <exe dir>/<exe name>.ini)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List section names in file order
    List {
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Show the raw entries of one section
    Show {
        section: String,

        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Print the value stored under a key
    Get { section: String, key: String },

    /// Insert or update a value
    Set {
        section: String,
        key: String,
        value: String,
    },

    /// Remove one entry, or the whole section when no key is given
    Remove {
        section: String,
        key: Option<String>,
    },

    /// Dump the whole document
    Dump {
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = match &cli.file {
        Some(path) => ProfileStore::open(path)?,
        None => ProfileStore::open_default()?,
    };

    match cli.command {
        Commands::List { format } => cmd_list(&store, format),
        Commands::Show { section, format } => cmd_show(&store, &section, format),
        Commands::Get { section, key } => cmd_get(&store, &section, &key),
        Commands::Set {
            section,
            key,
            value,
        } => {
            store.try_set(&section, &key, &value)?;
            Ok(())
        }
        Commands::Remove { section, key } => {
            match key {
                Some(key) => store.try_remove_entry(&section, &key)?,
                None => store.try_remove_section(&section)?,
            }
            Ok(())
        }
        Commands::Dump { format } => cmd_dump(&store, format),
    }
}

fn cmd_list(store: &ProfileStore, format: Format) -> Result<()> {
    let sections = store.try_sections()?;
    match format {
        Format::Pretty => {
            for name in sections {
                println!("{name}");
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&sections)?),
    }
    Ok(())
}

fn cmd_show(store: &ProfileStore, section: &str, format: Format) -> Result<()> {
    let entries = store.try_entries(section)?;
    match format {
        Format::Pretty => {
            for line in entries {
                // No separator means a valueless entry: present, but carrying
                // nothing a consumer could edit.
                if line.contains('=') {
                    println!("{line}");
                } else {
                    println!("{line} (disabled)");
                }
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

fn cmd_get(store: &ProfileStore, section: &str, key: &str) -> Result<()> {
    match store.try_get(section, key)? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => {
            eprintln!("{section}/{key}: not found");
            std::process::exit(1);
        }
    }
}

fn cmd_dump(store: &ProfileStore, format: Format) -> Result<()> {
    let doc = store.try_document()?;
    match format {
        Format::Pretty => print!("{}", inikit_format::render(&doc)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&doc)?),
    }
    Ok(())
}
