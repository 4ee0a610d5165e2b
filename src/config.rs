use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    /// Tool names whose command is inspected; all other tools are allowed.
    #[serde(default)]
    pub shell_tools: Vec<String>,
    /// Env var holding the project root, used when the request has no `cwd`.
    #[serde(default)]
    pub project_dir_env: String,
    #[serde(default)]
    pub unknown_branch: UnknownBranch,
    #[serde(default)]
    pub log_level: String,
    #[serde(default)]
    pub log_file: String,
}

/// Policy for an implicit push whose current branch could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownBranch {
    /// Block only when no working directory could be established.
    #[default]
    Auto,
    Allow,
    Block,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub protected_branches: Vec<String>,
    #[serde(default)]
    pub global_options_with_arg: Vec<String>,
    #[serde(default)]
    pub global_flags: Vec<String>,
    #[serde(default)]
    pub push_options_with_arg: Vec<String>,
    #[serde(default)]
    pub bulk_push_flags: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    git: GitOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    shell_tools: Vec<String>,
    #[serde(default)]
    remove_shell_tools: Vec<String>,
    project_dir_env: Option<String>,
    unknown_branch: Option<UnknownBranch>,
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GitOverlay {
    #[serde(default)]
    replace: bool,
    program: Option<String>,
    #[serde(default)]
    protected_branches: Vec<String>,
    #[serde(default)]
    global_options_with_arg: Vec<String>,
    #[serde(default)]
    global_flags: Vec<String>,
    #[serde(default)]
    push_options_with_arg: Vec<String>,
    #[serde(default)]
    bulk_push_flags: Vec<String>,
    #[serde(default)]
    remove_protected_branches: Vec<String>,
    #[serde(default)]
    remove_global_options_with_arg: Vec<String>,
    #[serde(default)]
    remove_global_flags: Vec<String>,
    #[serde(default)]
    remove_push_options_with_arg: Vec<String>,
    #[serde(default)]
    remove_bulk_push_flags: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/mainguard/config.toml (if exists)
    ///
    /// User config merges with defaults: lists extend, scalars override.
    /// Set `replace = true` in any section to replace its lists entirely.
    /// Use `remove_<field>` lists to subtract specific items from defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/mainguard/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/mainguard/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("mainguard: config parse error: {e}");
                None
            }
        }
    }

    /// Serialize the merged configuration (for `--dump-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        merge_list(
            &mut self.settings.shell_tools,
            s.shell_tools,
            &s.remove_shell_tools,
            s.replace,
        );
        if let Some(v) = s.project_dir_env {
            self.settings.project_dir_env = v;
        }
        if let Some(v) = s.unknown_branch {
            self.settings.unknown_branch = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }

        let g = overlay.git;
        if let Some(v) = g.program {
            self.git.program = v;
        }
        merge_list(
            &mut self.git.protected_branches,
            g.protected_branches,
            &g.remove_protected_branches,
            g.replace,
        );
        merge_list(
            &mut self.git.global_options_with_arg,
            g.global_options_with_arg,
            &g.remove_global_options_with_arg,
            g.replace,
        );
        merge_list(
            &mut self.git.global_flags,
            g.global_flags,
            &g.remove_global_flags,
            g.replace,
        );
        merge_list(
            &mut self.git.push_options_with_arg,
            g.push_options_with_arg,
            &g.remove_push_options_with_arg,
            g.replace,
        );
        merge_list(
            &mut self.git.bulk_push_flags,
            g.bulk_push_flags,
            &g.remove_bulk_push_flags,
            g.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    pub(crate) fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
