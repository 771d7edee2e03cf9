//! CLI commands and argument parsing
//!
//! This module defines the command-line interface of the demo binary using
//! clap. Every command builds a manager with the two demo sections and
//! drives it through load and save.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::cli::sections::DemoSections;
use crate::codec::{Codec, EncodingFormat, JsonCodec};
use crate::config::ManagerOptions;
use crate::error::{Result, SectionalError};
use crate::manager::{ConfigManager, LoadReport};

#[derive(Parser)]
#[command(name = "sectional")]
#[command(about = "Load and save typed configuration sections in one file")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// File format (json, yaml, toml); inferred from --path when omitted
    #[arg(long, global = true, env = "SECTIONAL_FORMAT")]
    pub format: Option<EncodingFormat>,

    /// Configuration file path
    #[arg(long, global = true, env = "SECTIONAL_PATH")]
    pub path: Option<PathBuf>,

    /// Skip validate and on-load hooks
    #[arg(long, global = true)]
    pub no_callbacks: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write default values for every section
    Init {
        /// Overwrite a non-empty file
        #[arg(long)]
        force: bool,
    },
    /// Load the file and print every section
    Show,
    /// Load, increment the web server port, and save
    BumpPort {
        /// Amount to add to the port
        #[arg(long, default_value_t = 1)]
        by: u16,
    },
    /// Load, then wait and save once on SIGINT or SIGTERM
    Run,
}

impl Cli {
    /// Resolve manager options from flags
    pub fn options(&self) -> Result<ManagerOptions> {
        let format = match (&self.format, &self.path) {
            (Some(format), _) => *format,
            (None, Some(path)) => EncodingFormat::from_path(path)?,
            (None, None) => EncodingFormat::Json,
        };

        let path = match &self.path {
            Some(path) => path.clone(),
            None => ManagerOptions::default_path("sectional", format)?,
        };

        Ok(ManagerOptions::new(format, path)
            .with_auto_save(matches!(self.command, Commands::Run))
            .with_callbacks(!self.no_callbacks))
    }

    /// Execute the command
    pub async fn execute(self) -> Result<()> {
        let options = self.options()?;
        debug!("Resolved options: {:?}", options);

        let sections = DemoSections::default();
        let mut manager = sections
            .register(ConfigManager::builder(options))?
            .build()
            .await?;

        let result = match self.command {
            Commands::Init { force } => execute_init(&manager, force).await,
            Commands::Show => execute_show(&manager, &sections).await,
            Commands::BumpPort { by } => execute_bump_port(&manager, &sections, by).await,
            Commands::Run => execute_run(&mut manager).await,
        };

        manager.shutdown().await;
        result
    }
}

async fn execute_init(manager: &ConfigManager, force: bool) -> Result<()> {
    let existing = tokio::fs::metadata(manager.path())
        .await
        .map(|metadata| metadata.len())
        .unwrap_or(0);

    if existing > 0 && !force {
        println!(
            "{} already has content, use --force to overwrite it",
            manager.path().display()
        );
        return Ok(());
    }

    manager.save().await?;
    println!("Wrote default sections to {}", manager.path().display());
    Ok(())
}

async fn execute_show(manager: &ConfigManager, sections: &DemoSections) -> Result<()> {
    let report = manager.load().await?;
    print_report(&report);

    let rendered = serde_json::json!({
        "web_server": &*sections.web_server.read(),
        "database_cache": &*sections.database_cache.read(),
    });
    let bytes = JsonCodec.encode(&rendered).map_err(SectionalError::Encode)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

async fn execute_bump_port(manager: &ConfigManager, sections: &DemoSections, by: u16) -> Result<()> {
    manager.load().await?;

    let port = {
        let mut server = sections.web_server.write();
        server.port = server.port.saturating_add(by);
        server.port
    };

    manager.save().await?;
    info!("Web server port is now {}", port);
    println!("web_server.port = {port}");
    Ok(())
}

async fn execute_run(manager: &mut ConfigManager) -> Result<()> {
    let report = manager.load().await?;
    print_report(&report);

    if let Some(listener) = manager.take_autosave() {
        println!("Waiting for SIGINT or SIGTERM to save {}", manager.path().display());
        listener.join().await;
        println!("Saved {}", manager.path().display());
    }
    Ok(())
}

fn print_report(report: &LoadReport) {
    println!("Loaded:  {}", list_or_none(&report.loaded));
    println!("Skipped: {}", list_or_none(&report.skipped));
    println!("Ignored: {}", list_or_none(&report.ignored));
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
