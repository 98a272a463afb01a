use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};
use xpns_core::format::Locale;
use xpns_core::shell::ShellSettings;

const DEFAULTS: [(&str, &str); 4] = [
  ("data.location", "~/.xpns"),
  ("locale", "de"),
  ("currency.default", "EUR"),
  ("color", "on")
];

/// Settings from `xpnsrc` files layered over built-in defaults, with `rc.`
/// overrides on top.
#[derive(Debug, Clone)]
pub struct Config {
  values:           HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      values:       DEFAULTS
        .iter()
        .map(|(k, v)| {
          (k.to_string(), v.to_string())
        })
        .collect(),
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    xpnsrc_override
  ))]
  pub fn load(
    xpnsrc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::default();

    match resolve_xpnsrc_path(
      xpnsrc_override
    )? {
      | Some(path) => {
        info!(xpnsrc = %path.display(), "loading xpnsrc");
        cfg.load_file(&path)?;
      }
      | None => {
        warn!(
          "no xpnsrc found; using \
           defaults"
        );
      }
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.values.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self
      .values
      .get(key)
      .map(String::as_str)
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self.get(key).map(parse_bool)
  }

  pub fn locale(&self) -> Locale {
    self
      .get("locale")
      .map(Locale::from_tag)
      .unwrap_or_default()
  }

  pub fn default_currency(
    &self
  ) -> String {
    self
      .get("currency.default")
      .map(|c| c.trim().to_uppercase())
      .filter(|c| !c.is_empty())
      .unwrap_or_else(|| {
        xpns_core::expense::DEFAULT_CURRENCY
          .to_string()
      })
  }

  pub fn shell_settings(
    &self
  ) -> ShellSettings {
    ShellSettings {
      locale:           self.locale(),
      default_currency: self
        .default_currency()
    }
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    if self.loaded_files.contains(&path)
    {
      warn!(file = %path.display(), "xpnsrc already loaded; skipping include loop");
      return Ok(());
    }

    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (idx, raw_line) in
      text.lines().enumerate()
    {
      let line = raw_line
        .split_once('#')
        .map_or(raw_line, |(kept, _)| {
          kept
        })
        .trim();
      if line.is_empty() {
        continue;
      }

      if let Some(target) =
        line.strip_prefix("include ")
      {
        let include =
          resolve_include_path(
            &base_dir,
            target.trim()
          )?;
        if include.exists() {
          debug!(
            file = %path.display(),
            include = %include.display(),
            line = idx + 1,
            "processing include"
          );
          self.load_file(&include)?;
        } else {
          warn!(include = %include.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            idx + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.values.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  cfg,
  override_dir
))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = match (
    override_dir,
    cfg.get("data.location")
  ) {
    | (Some(path), _) => {
      path.to_path_buf()
    }
    | (None, Some(location)) => {
      expand_tilde(Path::new(location))
    }
    | (None, None) => home_dir()?
      .join(".xpns")
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_xpnsrc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(from_env) =
    std::env::var("XPNSRC")
  {
    if from_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      from_env
    )));
  }

  let candidate =
    home_dir()?.join(".xpnsrc");
  Ok(
    candidate
      .exists()
      .then_some(candidate)
  )
}

fn home_dir() -> anyhow::Result<PathBuf>
{
  dirs::home_dir().ok_or_else(|| {
    anyhow!(
      "cannot determine home directory"
    )
  })
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let expanded =
    expand_tilde(Path::new(include));
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("xpnsrc");
    fs::write(
      &rc,
      "# personal\nlocale = en\ncurrency.default = chf # swiss\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load config");

    assert_eq!(cfg.locale(), Locale::En);
    assert_eq!(cfg.default_currency(), "CHF");
    assert_eq!(cfg.get("color"), Some("on"));
    assert_eq!(cfg.loaded_files, vec![rc]);
  }

  #[test]
  fn includes_are_resolved_relative_to_the_including_file()
  {
    let dir = tempdir().expect("tempdir");
    fs::write(
      dir.path().join("colors.rc"),
      "color = off\n"
    )
    .expect("write include");
    let rc = dir.path().join("xpnsrc");
    fs::write(
      &rc,
      "include colors.rc\ninclude missing.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load config");

    assert_eq!(
      cfg.get_bool("color"),
      Some(false)
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn rc_overrides_win() {
    let mut cfg = Config::default();
    cfg.apply_overrides(vec![(
      "rc.locale".to_string(),
      "en".to_string()
    )]);
    assert_eq!(cfg.locale(), Locale::En);
  }

  #[test]
  fn malformed_lines_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("xpnsrc");
    fs::write(&rc, "locale de\n")
      .expect("write rc");

    let err = Config::load(Some(&rc))
      .expect_err("invalid line");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }
}
