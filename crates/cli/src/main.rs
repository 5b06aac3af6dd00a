mod config;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use client::{Client, HttpTransport};
use tracing_subscriber::EnvFilter;
use warrant::{
    Check, CheckMany, CheckOp, Context, FeatureCheck, ListWarrantOptions, ObjectRef,
    PermissionCheck, Query, SubjectRef, WarrantTuple,
};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "warrant.toml";

#[derive(Parser)]
#[command(name = "warrant")]
#[command(about = "Check and manage relationship-based access", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./warrant.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by all check commands.
#[derive(clap::Args)]
struct CheckFlags {
    /// Context attribute passed to the evaluator (repeatable)
    #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_context_entry)]
    context: Vec<(String, String)>,
    /// Bypass any cached relationship snapshot
    #[arg(long)]
    consistent_read: bool,
    /// Request a decision trace
    #[arg(long)]
    debug: bool,
}

impl CheckFlags {
    fn context(&self) -> Option<Context> {
        (!self.context.is_empty()).then(|| self.context.iter().cloned().collect())
    }

    // Unset flags stay off the wire.
    fn consistent_read(&self) -> Option<bool> {
        self.consistent_read.then_some(true)
    }

    fn debug(&self) -> Option<bool> {
        self.debug.then_some(true)
    }

    fn apply(&self, mut check: Check) -> Check {
        if let Some(context) = self.context() {
            check = check.context(context);
        }
        if self.consistent_read {
            check = check.consistent_read(true);
        }
        if self.debug {
            check = check.debug(true);
        }
        check
    }

    fn apply_many(&self, mut check: CheckMany) -> CheckMany {
        if self.consistent_read {
            check = check.consistent_read(true);
        }
        if self.debug {
            check = check.debug(true);
        }
        check
    }

    /// Attach the context to every warrant of a batch.
    fn with_context(&self, warrants: Vec<WarrantTuple>) -> Vec<WarrantTuple> {
        match self.context() {
            Some(context) => warrants
                .into_iter()
                .map(|warrant| warrant.with_context(context.clone()))
                .collect(),
            None => warrants,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a subject has a relation on an object
    Check {
        /// Object as type:id
        object: ObjectRef,
        relation: String,
        /// Subject as type:id[#relation]
        subject: SubjectRef,
        #[command(flatten)]
        flags: CheckFlags,
    },
    /// Check several warrants at once
    CheckMany {
        /// anyOf or allOf
        #[arg(long)]
        op: CheckOp,
        /// Warrants as type:id#relation@type:id[#relation]
        #[arg(required = true)]
        warrants: Vec<WarrantTuple>,
        #[command(flatten)]
        flags: CheckFlags,
    },
    /// Check whether a subject has a feature
    HasFeature {
        feature_id: String,
        /// Subject as type:id[#relation]
        subject: SubjectRef,
        #[command(flatten)]
        flags: CheckFlags,
    },
    /// Check whether a subject has a permission
    HasPermission {
        permission_id: String,
        /// Subject as type:id[#relation]
        subject: SubjectRef,
        #[command(flatten)]
        flags: CheckFlags,
    },
    /// Create a warrant
    Create {
        /// Warrant as type:id#relation@type:id[#relation]
        warrant: WarrantTuple,
    },
    /// Delete a warrant
    Delete {
        /// Warrant as type:id#relation@type:id[#relation]
        warrant: WarrantTuple,
    },
    /// Query warrants
    Query {
        /// Query, e.g. "select role where user:u1 is member"
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

/// What a successful command produced.
enum Outcome {
    Done,
    Decision(bool),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(Outcome::Done) | Ok(Outcome::Decision(true)) => ExitCode::SUCCESS,
        Ok(Outcome::Decision(false)) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.log_level);

    let client = Client::new(config.client.apply_env())?;
    tracing::debug!(%client, "client ready");

    match cli.command {
        Commands::Check {
            object,
            relation,
            subject,
            flags,
        } => {
            let check = flags.apply(Check::new(&object, relation, &subject));
            tracing::debug!(warrant = %check.warrant(), "checking");
            decide(client.check(check).await?)
        }
        Commands::CheckMany {
            op,
            warrants,
            flags,
        } => {
            let check = CheckMany::from((op, flags.with_context(warrants)));
            decide(client.check_many(flags.apply_many(check)).await?)
        }
        Commands::HasFeature {
            feature_id,
            subject,
            flags,
        } => {
            let check = FeatureCheck {
                context: flags.context(),
                consistent_read: flags.consistent_read(),
                debug: flags.debug(),
                ..FeatureCheck::new(feature_id, &subject)
            };
            decide(client.has_feature(check).await?)
        }
        Commands::HasPermission {
            permission_id,
            subject,
            flags,
        } => {
            let check = PermissionCheck {
                context: flags.context(),
                consistent_read: flags.consistent_read(),
                debug: flags.debug(),
                ..PermissionCheck::new(permission_id, &subject)
            };
            decide(client.has_permission(check).await?)
        }
        Commands::Create { warrant } => {
            let created = client.create_warrant(&warrant).await?;
            println!("created {created}");
            Ok(Outcome::Done)
        }
        Commands::Delete { warrant } => {
            client.delete_warrant(&warrant).await?;
            println!("deleted {warrant}");
            Ok(Outcome::Done)
        }
        Commands::Query { query, limit } => cmd_query(&client, &query, limit).await,
    }
}

fn decide(authorized: bool) -> Result<Outcome> {
    println!("{}", if authorized { "authorized" } else { "not authorized" });
    Ok(Outcome::Decision(authorized))
}

async fn cmd_query(
    client: &Client<HttpTransport>,
    query: &str,
    limit: Option<u32>,
) -> Result<Outcome> {
    let options = ListWarrantOptions {
        limit,
        ..Default::default()
    };
    let warrants = client.query_warrants(&Query::new(query), &options).await?;

    if warrants.is_empty() {
        println!("No warrants found.");
    }
    for warrant in warrants {
        println!("{warrant}");
    }
    Ok(Outcome::Done)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if !path.exists() => Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        }),
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_context_entry(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
