use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Images {
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}
