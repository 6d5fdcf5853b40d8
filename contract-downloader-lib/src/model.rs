//! Structs shared between the explorer API clients, the bounty page parser and the downloader.

use crate::error::Error;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use std::fmt;
use std::str::FromStr;

/// Networks a contract can be downloaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Polygon,
    Bsc,
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "polygon" => Ok(Network::Polygon),
            "bsc" => Ok(Network::Bsc),
            _ => Err(Error::UnsupportedNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Polygon => write!(f, "polygon"),
            Network::Bsc => write!(f, "bsc"),
        }
    }
}

/// Block explorers whose links are recognized on a bounty page, in matching order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Explorer {
    Etherscan,
    Polygonscan,
    Bscscan,
}

impl Explorer {
    pub const ALL: [Explorer; 3] = [Explorer::Etherscan, Explorer::Polygonscan, Explorer::Bscscan];

    /// Second-level domain name of the explorer, e.g. `etherscan` for `https://etherscan.io`.
    pub fn name(&self) -> &'static str {
        match self {
            Explorer::Etherscan => "etherscan",
            Explorer::Polygonscan => "polygonscan",
            Explorer::Bscscan => "bscscan",
        }
    }

    pub fn network(&self) -> Network {
        match self {
            Explorer::Etherscan => Network::Mainnet,
            Explorer::Polygonscan => Network::Polygon,
            Explorer::Bscscan => Network::Bsc,
        }
    }
}

/// Contract found in the "Assets in scope" section of a bounty page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeLink {
    pub explorer: Explorer,
    pub address: String,
}

impl fmt::Display for ScopeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.explorer.name(), self.address)
    }
}

/// One entry of the `getsourcecode` endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContractRecord {
    #[serde(rename = "ContractName", default)]
    pub name: String,

    #[serde(rename = "SourceCode", default)]
    pub source_code: String,

    #[serde(rename = "Proxy", default)]
    pub proxy: String,

    #[serde(rename = "Implementation", default)]
    pub implementation: String,
}

impl ContractRecord {
    pub fn is_proxy(&self) -> bool {
        self.proxy == "1"
    }
}

/// Multi-file Standard JSON input as returned by the explorers.
#[derive(Deserialize, Debug, PartialEq, Eq)]
pub struct SourceBundle {
    /// Source file references and their content, in the order listed by the explorer.
    #[serde(deserialize_with = "ordered_sources")]
    pub sources: Vec<(String, SourceFile)>,
}

#[derive(Deserialize, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub content: String,
}

/// Deserializes a JSON object into its key-value pairs, keeping document order.
fn ordered_sources<'de, D>(deserializer: D) -> Result<Vec<(String, SourceFile)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SourcesVisitor;

    impl<'de> Visitor<'de> for SourcesVisitor {
        type Value = Vec<(String, SourceFile)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a map of source file references to their content")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut sources = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, SourceFile>()? {
                sources.push(entry);
            }

            Ok(sources)
        }
    }

    deserializer.deserialize_map(SourcesVisitor)
}

/// The two shapes a verified contract's `SourceCode` field comes in.
#[derive(Debug, PartialEq, Eq)]
pub enum SourceCode {
    Bundle(SourceBundle),

    /// Contract was flattened into one file upon verification.
    SingleFile(String),
}

impl SourceCode {
    /// Parses the raw `SourceCode` field. Explorers wrap multi-file bundles into an additional pair of
    /// curly braces (`{{ ... }}`) so exactly one character is stripped from each end before parsing.
    pub fn parse(raw: &str) -> Self {
        let inner = match raw.len() {
            0 | 1 => None,
            len => raw.get(1..len - 1),
        };

        match inner.map(serde_json::from_str::<SourceBundle>) {
            Some(Ok(bundle)) => SourceCode::Bundle(bundle),
            _ => SourceCode::SingleFile(raw.to_string()),
        }
    }
}
