use std::collections::HashMap;
use std::path::PathBuf;

use crate::provider::IrProvider;

/// Resolved settings for one configured project.
#[derive(Debug, Clone)]
pub struct ProjectParam {
    /// Output directory, relative to the project directory.
    pub output_dir: PathBuf,
    pub ir_provider: IrProvider,
    pub publish: bool,
    pub server: bool,
}

/// All configured projects, iterated in lexical key order.
#[derive(Debug, Clone, Default)]
pub struct ProjectParams {
    sorted_keys: Vec<String>,
    params: HashMap<String, ProjectParam>,
}

impl ProjectParams {
    #[must_use]
    pub fn new(params: HashMap<String, ProjectParam>) -> Self {
        let mut sorted_keys = params.keys().cloned().collect::<Vec<_>>();
        sorted_keys.sort();
        Self {
            sorted_keys,
            params,
        }
    }

    /// `(key, param)` pairs in sorted key order.
    pub fn ordered(&self) -> impl Iterator<Item = (&str, &ProjectParam)> {
        self.sorted_keys
            .iter()
            .filter_map(|key| self.params.get(key).map(|param| (key.as_str(), param)))
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.sorted_keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted_keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted_keys.is_empty()
    }
}

impl FromIterator<(String, ProjectParam)> for ProjectParams {
    fn from_iter<I: IntoIterator<Item = (String, ProjectParam)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
