//! Config manager, reading the content of the `.env` file.
//!
//! Reads the explorer API keys from `.env` (or the process environment) into [`Config`], which is then
//! handed to the explorer clients. A key is only validated once the matching network is actually used.

use crate::error::Error;
use crate::model::Network;
use dotenv::dotenv;
use std::path::Path;

pub struct Config {
    /// Etherscan (mainnet) API token.
    pub token_etherscan: Option<String>,

    /// Polygonscan API token.
    pub token_polygonscan: Option<String>,

    /// BscScan API token.
    pub token_bscscan: Option<String>,
}

/// Base URL and token of one explorer API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub api_url: String,
    pub token: String,
}

const ENV_VAR_TOKEN_ETHERSCAN: &str = "ETHERSCAN_API_KEY";
const ENV_VAR_TOKEN_POLYGONSCAN: &str = "POLYGONSCAN_API_KEY";
const ENV_VAR_TOKEN_BSCSCAN: &str = "BSCSCAN_API_KEY";

const API_URL_ETHERSCAN: &str = "https://api.etherscan.io/api";
const API_URL_POLYGONSCAN: &str = "https://api.polygonscan.com/api";
const API_URL_BSCSCAN: &str = "https://api.bscscan.com/api";

#[inline]
fn read_and_return_env_var(env_var: &'static str) -> Result<String, Error> {
    let res = std::env::var(env_var)
        .map_err(|err| Error::ConfigReadNonExistantEnvironmentVariable(env_var, err))?;

    match res.is_empty() {
        true => Err(Error::ConfigReadEmptyEnvironmentVariable(env_var)),
        false => Ok(res),
    }
}

impl Config {
    /// Returns a new config manager, reading the content of `.env` if such a file exists.
    pub fn new() -> Result<Self, Error> {
        if Path::new(".env").exists() {
            dotenv()?;
        } else if Path::new("../.env").exists() {
            dotenv::from_filename("../.env")?; // If executed within a sub-directory
        }

        Ok(Config {
            token_etherscan: std::env::var(ENV_VAR_TOKEN_ETHERSCAN).ok(),
            token_polygonscan: std::env::var(ENV_VAR_TOKEN_POLYGONSCAN).ok(),
            token_bscscan: std::env::var(ENV_VAR_TOKEN_BSCSCAN).ok(),
        })
    }

    /// Returns the API URL and token for the given network, failing if its token is missing or empty.
    pub fn explorer(&self, network: Network) -> Result<ExplorerConfig, Error> {
        let (env_var, token, api_url) = match network {
            Network::Mainnet => (ENV_VAR_TOKEN_ETHERSCAN, &self.token_etherscan, API_URL_ETHERSCAN),
            Network::Polygon => (ENV_VAR_TOKEN_POLYGONSCAN, &self.token_polygonscan, API_URL_POLYGONSCAN),
            Network::Bsc => (ENV_VAR_TOKEN_BSCSCAN, &self.token_bscscan, API_URL_BSCSCAN),
        };

        let token = match token {
            Some(token) if token.is_empty() => return Err(Error::ConfigReadEmptyEnvironmentVariable(env_var)),
            Some(token) => token.clone(),

            // The token may have been exported after `Config::new` ran
            None => read_and_return_env_var(env_var)?,
        };

        Ok(ExplorerConfig {
            api_url: api_url.to_string(),
            token,
        })
    }
}
