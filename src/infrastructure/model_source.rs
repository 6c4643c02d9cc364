use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const SINGLE_WEIGHTS_FILE: &str = "model.safetensors";
const SHARD_INDEX_FILE: &str = "model.safetensors.index.json";

/// Where pretrained weights come from: a local directory prepared ahead of
/// time, or a Hugging Face hub repository fetched into the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Local(PathBuf),
    Hub {
        model_id: String,
        revision: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelSourceError {
    #[error("missing model file: {0}")]
    MissingFile(String),
    #[error("hub: {0}")]
    Hub(String),
    #[error("invalid shard index: {0}")]
    InvalidIndex(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelSource {
    pub fn new(model_dir: Option<&Path>, model_id: &str, revision: Option<&str>) -> Self {
        match model_dir {
            Some(dir) => Self::Local(dir.to_path_buf()),
            None => Self::Hub {
                model_id: model_id.to_string(),
                revision: revision.map(str::to_owned),
            },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Local(dir) => dir.display().to_string(),
            Self::Hub { model_id, revision } => match revision {
                Some(rev) => format!("{model_id}@{rev}"),
                None => model_id.clone(),
            },
        }
    }

    pub fn resolve(&self) -> Result<ModelFiles, ModelSourceError> {
        match self {
            Self::Local(dir) => resolve_local(dir),
            Self::Hub { model_id, revision } => resolve_hub(model_id, revision.as_deref()),
        }
    }
}

fn resolve_local(dir: &Path) -> Result<ModelFiles, ModelSourceError> {
    let require = |name: &str| {
        let path = dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ModelSourceError::MissingFile(path.display().to_string()))
        }
    };

    let config = require(CONFIG_FILE)?;
    let tokenizer = require(TOKENIZER_FILE)?;

    let weights = match require(SINGLE_WEIGHTS_FILE) {
        Ok(path) => vec![path],
        Err(_) => {
            let index = std::fs::read_to_string(require(SHARD_INDEX_FILE)?)?;
            parse_shard_names(&index)?
                .into_iter()
                .map(|name| require(&name))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(ModelFiles {
        config,
        tokenizer,
        weights,
    })
}

fn resolve_hub(model_id: &str, revision: Option<&str>) -> Result<ModelFiles, ModelSourceError> {
    let mut builder = ApiBuilder::new();
    if let Ok(token) = std::env::var("HF_TOKEN") {
        builder = builder.with_token(Some(token));
    }
    let api = builder
        .build()
        .map_err(|e| ModelSourceError::Hub(format!("init: {e}")))?;

    let repo = api.repo(match revision {
        Some(rev) => Repo::with_revision(model_id.to_string(), RepoType::Model, rev.to_string()),
        None => Repo::new(model_id.to_string(), RepoType::Model),
    });

    let fetch = |name: &str| {
        repo.get(name)
            .map_err(|e| ModelSourceError::Hub(format!("{name}: {e}")))
    };

    Ok(ModelFiles {
        config: fetch(CONFIG_FILE)?,
        tokenizer: fetch(TOKENIZER_FILE)?,
        weights: hub_weights(&repo)?,
    })
}

fn hub_weights(repo: &ApiRepo) -> Result<Vec<PathBuf>, ModelSourceError> {
    if let Ok(path) = repo.get(SINGLE_WEIGHTS_FILE) {
        tracing::info!("Loading single-shard model.safetensors");
        return Ok(vec![path]);
    }

    tracing::info!("model.safetensors not found, trying sharded layout via index.json");

    let index_path = repo
        .get(SHARD_INDEX_FILE)
        .map_err(|e| ModelSourceError::Hub(format!("{SHARD_INDEX_FILE}: {e}")))?;
    let index = std::fs::read_to_string(&index_path)?;
    let shard_names = parse_shard_names(&index)?;

    tracing::info!(shard_count = shard_names.len(), "Downloading weight shards");

    shard_names
        .iter()
        .map(|name| {
            repo.get(name)
                .map_err(|e| ModelSourceError::Hub(format!("shard {name}: {e}")))
        })
        .collect()
}

/// Distinct shard filenames from a safetensors `weight_map`, sorted.
pub fn parse_shard_names(index_json: &str) -> Result<Vec<String>, ModelSourceError> {
    let index: serde_json::Value = serde_json::from_str(index_json)
        .map_err(|e| ModelSourceError::InvalidIndex(e.to_string()))?;

    let weight_map = index
        .get("weight_map")
        .and_then(|v| v.as_object())
        .ok_or_else(|| ModelSourceError::InvalidIndex("missing weight_map object".to_string()))?;

    let names: BTreeSet<String> = weight_map
        .values()
        .filter_map(|v| v.as_str())
        .map(str::to_owned)
        .collect();

    if names.is_empty() {
        return Err(ModelSourceError::InvalidIndex(
            "weight_map contains no shard filenames".to_string(),
        ));
    }

    Ok(names.into_iter().collect())
}
