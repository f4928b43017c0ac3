use crate::cli::CliContext;
use crate::constants;
use crate::core::store::CredentialStore;
use crate::models::identity::Identity;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use dialoguer::Password;
use serde::Serialize;
use std::io::Read;
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Label to store the secret under
    #[arg(value_name = "LABEL", conflicts_with_all = ["service", "username"])]
    pub label: Option<String>,

    /// Service name (requires --username)
    #[arg(long, requires = "username")]
    pub service: Option<String>,

    /// Username (requires --service)
    #[arg(long, requires = "service")]
    pub username: Option<String>,

    /// Read secret from stdin instead of interactive prompt
    #[arg(long)]
    pub from_stdin: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Label the secret was stored under
    #[arg(value_name = "LABEL", conflicts_with_all = ["service", "username"])]
    pub label: Option<String>,

    /// Service name (requires --username)
    #[arg(long, requires = "username")]
    pub service: Option<String>,

    /// Username (requires --service)
    #[arg(long, requires = "service")]
    pub username: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Serialize)]
struct ListItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    created_at: String,
    updated_at: String,
}

fn identity_from_parts(
    label: Option<String>,
    service: Option<String>,
    username: Option<String>,
) -> Result<Identity> {
    match Identity::from_parts(label, service, username) {
        Some(identity) => Ok(identity),
        None => bail!("specify either a LABEL or both --service and --username"),
    }
}

pub fn print_saved(identity: &Identity) {
    println!("Saved credential for {}", identity);
}

pub fn run_save(ctx: &CliContext, args: SaveArgs) -> Result<()> {
    let identity = identity_from_parts(args.label, args.service, args.username)?;

    if ctx.non_interactive && !args.from_stdin {
        bail!("--non-interactive requires --from-stdin for save");
    }

    let secret = read_secret(args.from_stdin, &identity)?;
    if secret.is_empty() {
        bail!("secret is empty");
    }

    let store = CredentialStore::open(&ctx.paths, ctx.config.store.backend)
        .context("open credential store")?;
    store
        .save(&identity, &secret)
        .with_context(|| format!("save credential for {}", identity))?;
    print_saved(&identity);
    Ok(())
}

pub fn run_get(ctx: &CliContext, args: GetArgs) -> Result<()> {
    let identity = identity_from_parts(args.label, args.service, args.username)?;

    let store = CredentialStore::open(&ctx.paths, ctx.config.store.backend)
        .context("open credential store")?;
    match store
        .get(&identity)
        .with_context(|| format!("look up credential for {}", identity))?
    {
        Some(credential) => {
            println!("{}", *credential.password);
            Ok(())
        }
        // A missing entry is a valid negative result, not a failure.
        None => {
            println!("No credential found for {}", identity);
            Ok(())
        }
    }
}

pub fn run_list(ctx: &CliContext, args: ListArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let store = CredentialStore::open(&ctx.paths, ctx.config.store.backend)
        .context("open credential store")?;
    let summaries = store.list().context("list credentials")?;

    if args.format == "json" {
        let items: Vec<ListItem> = summaries
            .iter()
            .map(|s| ListItem {
                label: s.identity.label().map(str::to_string),
                service: s.identity.service().map(str::to_string),
                username: s.identity.username().map(str::to_string),
                created_at: s.created_at.to_rfc3339(),
                updated_at: s.updated_at.to_rfc3339(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&items).context("serialize list")?;
        println!("{}", json);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No credentials stored");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Identity").add_attribute(Attribute::Bold),
        Cell::new("Created").add_attribute(Attribute::Bold),
        Cell::new("Updated").add_attribute(Attribute::Bold),
    ]);

    for summary in summaries {
        table.add_row(vec![
            summary.identity.to_string(),
            format_local(summary.created_at),
            format_local(summary.updated_at),
        ]);
    }

    println!("{}", table);
    Ok(())
}

fn format_local(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    let local: DateTime<Local> = timestamp.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn read_secret(from_stdin: bool, identity: &Identity) -> Result<Zeroizing<String>> {
    let secret = if from_stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read secret from stdin")?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        Zeroizing::new(
            Password::new()
                .with_prompt(format!("Secret for {}", identity))
                .allow_empty_password(false)
                .interact()
                .context("read secret from prompt")?,
        )
    };
    if secret.len() > constants::MAX_SECRET_SIZE {
        bail!(
            "secret exceeds maximum size ({} bytes, max {} bytes)",
            secret.len(),
            constants::MAX_SECRET_SIZE
        );
    }
    Ok(secret)
}
