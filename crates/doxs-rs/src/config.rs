// Copyright 2025 HyperZoekt Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env::VarError;
use std::path::{Path, PathBuf};

use crate::format::DEFAULT_MAX_STRING_LEN;

pub const DEFAULT_INDEX_PATH: &str = "search.idx";
pub const DEFAULT_OUTPUT_DB: &str = "output_index.db";
pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

/// Settings for one conversion run.
///
/// Precedence, lowest first: defaults, TOML file, `DOXS_*` environment
/// variables, command line flags (applied by the binary).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub index_path: PathBuf,
    pub output_db: PathBuf,
    /// Upper bound for any NUL-terminated string in the index.
    pub max_string_len: usize,
    /// Log progress every N non-empty buckets; 0 disables.
    pub progress_every: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            output_db: PathBuf::from(DEFAULT_OUTPUT_DB),
            max_string_len: DEFAULT_MAX_STRING_LEN,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

impl ConvertConfig {
    /// Load from `path` if given, else defaults; then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ConvertConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_usize("DOXS_MAX_STRING_LEN")? {
            self.max_string_len = v;
        }
        if let Some(v) = env_usize("DOXS_PROGRESS_EVERY")? {
            self.progress_every = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_string_len == 0 {
            bail!("max_string_len must be >= 1");
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    parse_env_usize(key, std::env::var(key))
}

fn parse_env_usize(key: &str, var: Result<String, VarError>) -> Result<Option<usize>> {
    match var {
        Ok(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .with_context(|| format!("{} is not an integer: {:?}", key, v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(v)) => bail!("{} is not valid UTF-8: {:?}", key, v),
    }
}
