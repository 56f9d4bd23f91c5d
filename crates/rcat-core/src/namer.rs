//! Run-scoped identifiers for ephemeral artifacts.
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const RUN_ID_LEN: usize = 8;
const DATA_PREFIX: &str = "data_";
const SCRIPT_PREFIX: &str = "categorical_script_";

/// Short random token shared by both files of one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn generate() -> Self {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(RUN_ID_LEN);
        RunId(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `data_<id>.csv`
    pub fn data_file_name(&self) -> String {
        format!("{DATA_PREFIX}{}.csv", self.0)
    }

    /// `categorical_script_<id>.R`
    pub fn script_file_name(&self) -> String {
        format!("{SCRIPT_PREFIX}{}.R", self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn token_is_short_hex() {
        let id = RunId::generate();
        assert_eq!(id.as_str().len(), RUN_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn file_names_share_the_token() {
        let id = RunId::generate();
        assert_eq!(id.data_file_name(), format!("data_{id}.csv"));
        assert_eq!(id.script_file_name(), format!("categorical_script_{id}.R"));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let ids: HashSet<_> = (0..200).map(|_| RunId::generate()).collect();
        assert_eq!(ids.len(), 200);
    }
}
