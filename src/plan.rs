use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{AppIconConfig, Config, CropConfig};
use crate::lockfile::{Lockfile, TargetLock};

pub const APP_TARGET: &str = "app";
pub const TRAY_TARGET: &str = "tray";

#[derive(Debug)]
pub struct RenderPlan {
    pub targets: Vec<TargetAction>,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct TargetAction {
    pub name: String,
    pub action: Action,
    /// Lock entry to record once the target has been rendered.
    pub lock: TargetLock,
}

#[derive(Debug)]
pub enum Action {
    Create,
    Update { changes: Vec<Change> },
    Skip,
}

#[derive(Debug, PartialEq)]
pub enum Change {
    Source,
    Settings,
    MissingOutput(String),
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Source => write!(f, "source image changed"),
            Change::Settings => write!(f, "settings changed"),
            Change::MissingOutput(name) => write!(f, "missing output {}", name),
        }
    }
}

impl RenderPlan {
    pub fn has_changes(&self) -> bool {
        self.targets
            .iter()
            .any(|t| !matches!(t.action, Action::Skip))
    }

    pub fn summary(&self) -> String {
        let mut creates = 0;
        let mut updates = 0;
        let mut skips = 0;

        for target in &self.targets {
            match &target.action {
                Action::Create => creates += 1,
                Action::Update { .. } => updates += 1,
                Action::Skip => skips += 1,
            }
        }

        format!(
            "{} to render, {} to re-render, {} unchanged",
            creates, updates, skips
        )
    }

    pub fn target(&self, name: &str) -> Option<&TargetAction> {
        self.targets.iter().find(|t| t.name == name)
    }
}

pub fn hash_file(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

#[derive(Serialize)]
struct Fingerprint<'a, T: Serialize> {
    crop: &'a CropConfig,
    target: &'a T,
}

/// Hash of everything that influences a target's pixels besides the source.
pub fn settings_hash<T: Serialize>(crop: &CropConfig, target: &T) -> Result<String> {
    let text = toml::to_string(&Fingerprint { crop, target })
        .context("Failed to serialize target settings")?;
    Ok(blake3::hash(text.as_bytes()).to_hex().to_string())
}

pub fn build_render_plan(
    config: &Config,
    lockfile: &Lockfile,
    config_dir: &Path,
) -> Result<RenderPlan> {
    let mut warnings = Vec::new();

    for key in lockfile.targets.keys() {
        let configured = match key.as_str() {
            APP_TARGET => config.app.is_some(),
            TRAY_TARGET => config.tray.is_some(),
            _ => false,
        };
        if !configured {
            warnings.push(format!(
                "Target '{}' exists in lockfile but not in config (outputs are left in place)",
                key
            ));
        }
    }

    let mut targets = Vec::new();

    if let Some(app) = &config.app {
        let outputs = app_output_files(config_dir, &app.out_dir, app);
        let lock = TargetLock {
            source_hash: hash_file(&config_dir.join(&app.source))?,
            settings_hash: settings_hash(&config.crop, app)?,
            outputs: outputs.iter().map(|(name, _)| name.clone()).collect(),
        };
        targets.push(diff_target(APP_TARGET, lock, lockfile, &outputs));
    }

    if let Some(tray) = &config.tray {
        let outputs: Vec<(String, PathBuf)> = tray
            .outputs()
            .into_iter()
            .map(|(_, name)| (name.clone(), config_dir.join(&tray.out_dir).join(name)))
            .collect();
        let lock = TargetLock {
            source_hash: hash_file(&config_dir.join(&tray.source))?,
            settings_hash: settings_hash(&config.crop, tray)?,
            outputs: outputs.iter().map(|(name, _)| name.clone()).collect(),
        };
        targets.push(diff_target(TRAY_TARGET, lock, lockfile, &outputs));
    }

    Ok(RenderPlan { targets, warnings })
}

fn app_output_files(
    config_dir: &Path,
    out_dir: &Path,
    app: &AppIconConfig,
) -> Vec<(String, PathBuf)> {
    let mut names: Vec<String> = app.png_outputs().into_iter().map(|(_, n)| n).collect();
    if !app.ico_sizes.is_empty() {
        names.push("icon.ico".to_string());
    }
    names
        .into_iter()
        .map(|name| {
            let path = config_dir.join(out_dir).join(&name);
            (name, path)
        })
        .collect()
}

fn diff_target(
    name: &str,
    lock: TargetLock,
    lockfile: &Lockfile,
    outputs: &[(String, PathBuf)],
) -> TargetAction {
    let action = match lockfile.targets.get(name) {
        None => Action::Create,
        Some(previous) => {
            let mut changes = Vec::new();
            if previous.source_hash != lock.source_hash {
                changes.push(Change::Source);
            }
            if previous.settings_hash != lock.settings_hash {
                changes.push(Change::Settings);
            }
            for (file, path) in outputs {
                if !path.exists() {
                    changes.push(Change::MissingOutput(file.clone()));
                }
            }

            if changes.is_empty() {
                Action::Skip
            } else {
                Action::Update { changes }
            }
        }
    };

    TargetAction {
        name: name.to_string(),
        action,
        lock,
    }
}
