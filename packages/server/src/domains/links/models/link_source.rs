use serde::{Deserialize, Serialize};

/// Where a saved URL points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    Instagram,
    Twitter,
    Web,
    Unknown,
}

impl LinkSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkSource::Instagram => "instagram",
            LinkSource::Twitter => "twitter",
            LinkSource::Web => "web",
            LinkSource::Unknown => "unknown",
        }
    }

    pub fn is_social(&self) -> bool {
        matches!(self, LinkSource::Instagram | LinkSource::Twitter)
    }
}

impl std::fmt::Display for LinkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "instagram" => Ok(LinkSource::Instagram),
            "twitter" => Ok(LinkSource::Twitter),
            "web" => Ok(LinkSource::Web),
            "unknown" => Ok(LinkSource::Unknown),
            _ => Err(anyhow::anyhow!("Invalid link source: {}", s)),
        }
    }
}
