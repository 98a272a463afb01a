pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod render;

use std::ffi::OsString;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{
  debug,
  info
};
use xpns_core::shell::Shell;

pub const PREFS_FILE: &str =
  "prefs.json";

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args);
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting xpns"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.xpnsrc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    datastore::DataStore::open(
      &data_dir
    )
    .with_context(|| {
      format!(
        "failed to open datastore at \
         {}",
        data_dir.display()
      )
    })?;
  let prefs =
    datastore::PrefsFile::open(
      data_dir.join(PREFS_FILE)
    )?;

  let mut shell = Shell::new(
    store,
    prefs,
    Local::now().date_naive(),
    cfg.shell_settings()
  )?;
  let renderer =
    render::Renderer::new(&cfg);

  let command =
    cli.command.unwrap_or(
      cli::Command::Expenses {
        month:   None,
        display: None
      }
    );

  commands::dispatch(
    &mut shell,
    &renderer,
    command,
    &mut std::io::stdout().lock()
  )?;

  info!("done");
  Ok(())
}
