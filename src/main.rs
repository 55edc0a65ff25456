//! # Onboarding Harness CLI (`onboard`)
//!
//! The `onboard` binary loads a knowledge base from JSON files, runs the
//! knowledge tools from the command line, and serves them over HTTP for
//! onboarding assistants.
//!
//! ## Usage
//!
//! ```bash
//! onboard --config ./config/onboard.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `onboard init` | Create the SQLite database and schema |
//! | `onboard import` | Load `<category>/<file>.json` documents from the import root |
//! | `onboard find <term>` | List every document that mentions a term |
//! | `onboard tool list` | List the knowledge tools and their parameters |
//! | `onboard tool call <name> --param k=v` | Run one tool and print its envelope |
//! | `onboard agent list` | List agent personas |
//! | `onboard agent prompt <name> --arg k=v` | Print an agent's resolved prompt |
//! | `onboard serve` | Start the HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! onboard init
//! onboard import --root ./knowledge
//! onboard tool call analyze_error --param "error_message=Connection refused"
//! onboard agent prompt team_integrator --arg "question=Who runs payments?"
//! onboard serve
//! ```

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use onboarding_core::ops::search::search_knowledge_base;
use onboarding_core::{Envelope, KnowledgeBase};
use onboarding_harness::agents::{AgentInfo, AgentRegistry};
use onboarding_harness::config::{self, Config};
use onboarding_harness::sqlite_store::SqliteDocumentStore;
use onboarding_harness::traits::{validate_params, ToolContext, ToolInfo, ToolRegistry};
use onboarding_harness::{import, migrate, server};

/// Onboarding Harness: relevance-ranked knowledge retrieval for
/// developer onboarding assistants.
#[derive(Parser)]
#[command(
    name = "onboard",
    about = "Onboarding Harness: knowledge retrieval for developer onboarding assistants",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/onboard.toml`. Commands that only describe
    /// tools or agents fall back to built-in defaults when it is missing.
    #[arg(long, global = true, default_value = "./config/onboard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it again is safe.
    Init,

    /// Import JSON knowledge documents.
    ///
    /// Walks the import root, treating the first directory of each file as
    /// its category. Unchanged files are skipped by content hash.
    Import {
        /// Import root; overrides `[import].root`.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Parse and report without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },

    /// List every stored document that mentions a term.
    Find {
        /// Text to look for, case-insensitive.
        term: String,
    },

    /// Inspect and run knowledge tools.
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },

    /// Inspect agent personas.
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[derive(Subcommand)]
enum ToolAction {
    /// List registered tools.
    List,

    /// Run a tool and print the JSON envelope.
    Call {
        /// Tool name, e.g. `search_codebase`.
        name: String,

        /// Tool parameter as KEY=VALUE (repeatable).
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum AgentAction {
    /// List agent personas.
    List,

    /// Resolve an agent's prompt and print it as JSON.
    Prompt {
        /// Agent name, e.g. `codebase_navigator`.
        name: String,

        /// Agent argument as KEY=VALUE (repeatable).
        #[arg(long = "arg", value_parser = parse_key_val)]
        args: Vec<(String, String)>,
    },
}

/// Parse a `KEY=VALUE` string into a tuple.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn to_object(pairs: Vec<(String, String)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    Value::Object(map)
}

/// Install the global subscriber: `RUST_LOG` if set, else `level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn open_knowledge(cfg: &Config) -> (Arc<SqliteDocumentStore>, KnowledgeBase) {
    let store = Arc::new(SqliteDocumentStore::from_config(cfg));
    let kb = KnowledgeBase::new(store.clone());
    (store, kb)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that only describe built-ins run without a config file
    let describe_only = matches!(
        &cli.command,
        Commands::Tool {
            action: ToolAction::List
        } | Commands::Agent {
            action: AgentAction::List
        }
    );
    let cfg = if describe_only {
        config::load_config(&cli.config).unwrap_or_else(|_| Config::minimal())
    } else {
        config::load_config(&cli.config)?
    };

    init_tracing(&cfg.logging.level);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized at {}", cfg.db.path.display());
        }
        Commands::Import { root, dry_run } => {
            import::run_import(&cfg, root, dry_run).await?;
        }
        Commands::Find { term } => {
            let (store, kb) = open_knowledge(&cfg);
            let result = search_knowledge_base(&kb, &term).await;
            store.close().await;
            match result {
                Ok(found) => {
                    println!("{} document(s) mention \"{}\"", found.total_found, term);
                    for doc in &found.results {
                        match &doc.subcategory {
                            Some(sub) => println!("  {}/{}/{}", doc.category, sub, doc.key),
                            None => println!("  {}/{}", doc.category, doc.key),
                        }
                    }
                    if found.additional_results_available > 0 {
                        println!("  ... and {} more", found.additional_results_available);
                    }
                }
                Err(e) => {
                    let env: Envelope<()> = Envelope::from_result("search knowledge base", Err(e));
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&env.into_value("search knowledge base"))?
                    );
                }
            }
        }
        Commands::Tool { action } => match action {
            ToolAction::List => {
                let tools = ToolRegistry::with_builtins();
                let infos: Vec<ToolInfo> = tools
                    .tools()
                    .iter()
                    .map(|t| ToolInfo::from_tool(t.as_ref()))
                    .collect();
                for info in &infos {
                    let required = info.parameters["required"]
                        .as_array()
                        .map(|r| {
                            r.iter()
                                .filter_map(Value::as_str)
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();
                    println!("{:<24} {}", info.name, info.description);
                    if !required.is_empty() {
                        println!("{:<24} required: {}", "", required);
                    }
                }
            }
            ToolAction::Call { name, params } => {
                let tools = ToolRegistry::with_builtins();
                let Some(tool) = tools.find(&name) else {
                    bail!("no tool registered with name: {}", name);
                };
                let params = validate_params(&tool.parameters_schema(), &to_object(params))?;

                let (store, kb) = open_knowledge(&cfg);
                let result = tool.execute(params, &ToolContext::new(kb)).await;
                store.close().await;
                println!("{}", serde_json::to_string_pretty(&result?)?);
            }
        },
        Commands::Agent { action } => match action {
            AgentAction::List => {
                let agents = AgentRegistry::from_config(&cfg);
                for agent in agents.agents() {
                    let info = AgentInfo::from_agent(agent.as_ref());
                    println!("{:<26} [{}] {}", info.name, info.source, info.description);
                    println!("{:<26} tools: {}", "", info.tools.join(", "));
                }
            }
            AgentAction::Prompt { name, args } => {
                let agents = AgentRegistry::from_config(&cfg);
                let Some(agent) = agents.find(&name) else {
                    bail!("no agent registered with name: {}", name);
                };

                let (store, kb) = open_knowledge(&cfg);
                let prompt = agent.resolve(to_object(args), &ToolContext::new(kb)).await;
                store.close().await;
                println!("{}", serde_json::to_string_pretty(&prompt?)?);
            }
        },
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
