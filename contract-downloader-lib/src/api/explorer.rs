//! Etherscan-family API client.
//!
//! Etherscan, Polygonscan and BscScan expose the same API, hence one client configured with a per-network
//! [`ExplorerConfig`] covers all of them. Currently only the
//! [`getsourcecode`](https://docs.etherscan.io/api-endpoints/contracts#get-contract-source-code-for-verified-contract-source-codes)
//! endpoint is covered.

use crate::config::ExplorerConfig;
use crate::error::Error;
use crate::model::ContractRecord;
use serde::Deserialize;

use super::ExplorerResponseHandler;
use super::RequestHandler;

/// Anything able to return the verified source records of a contract address.
pub trait ContractSource {
    fn get_contract_source_code(&self, address: &str) -> Result<Vec<ContractRecord>, Error>;
}

pub struct ExplorerClient {
    request_handler: RequestHandler,
    config: ExplorerConfig,
}

#[derive(Deserialize)]
struct Page {
    result: Vec<ContractRecord>,
}

impl ExplorerClient {
    /// Returns a new explorer API client, see [`crate::config::Config::explorer`].
    pub fn new(config: ExplorerConfig) -> Result<Self, Error> {
        Ok(ExplorerClient {
            request_handler: RequestHandler::new()?,
            config,
        })
    }
}

impl ContractSource for ExplorerClient {
    fn get_contract_source_code(&self, address: &str) -> Result<Vec<ContractRecord>, Error> {
        let query = [
            ("module", "contract"),
            ("action", "getsourcecode"),
            ("address", address),
            ("apikey", self.config.token.as_str()),
        ];

        Ok(self
            .request_handler
            .execute_deser::<ExplorerResponseHandler, Page>(&self.config.api_url, &query)?
            .result)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::explorer::ContractSource;
    use crate::api::explorer::ExplorerClient;
    use crate::config::ExplorerConfig;
    use crate::error::Error;
    use httpmock::prelude::*;
    use serde_json::json;

    const ADDRESS: &str = "0x1111111111111111111111111111111111111111";

    fn client(server: &MockServer) -> ExplorerClient {
        let config = ExplorerConfig {
            api_url: server.url("/api"),
            token: "token".to_string(),
        };

        ExplorerClient::new(config).unwrap()
    }

    #[test]
    fn get_contract_source_code() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api")
                .query_param("module", "contract")
                .query_param("action", "getsourcecode")
                .query_param("address", ADDRESS)
                .query_param("apikey", "token");
            then.status(200).json_body(json!({
                "status": "1",
                "message": "OK",
                "result": [{
                    "SourceCode": "{{\"sources\":{\"contracts/A.sol\":{\"content\":\"contract A {}\"}}}}",
                    "ABI": "[]",
                    "ContractName": "A",
                    "CompilerVersion": "v0.8.17+commit.8df45f5f",
                    "Proxy": "0",
                    "Implementation": ""
                }]
            }));
        });

        let records = client(&server).get_contract_source_code(ADDRESS).unwrap();
        mock.assert();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "A");
        assert!(!records[0].is_proxy());
    }

    #[test]
    fn get_contract_source_code_invalid_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api");
            then.status(200).json_body(json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Invalid API Key"
            }));
        });

        let err = client(&server).get_contract_source_code(ADDRESS).unwrap_err();
        assert!(matches!(err, Error::ExplorerInvalidToken(_)));
        assert!(!err.to_string().contains("token"));
    }

    #[test]
    fn get_contract_source_code_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api");
            then.status(200).json_body(json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Invalid Address format"
            }));
        });

        match client(&server).get_contract_source_code("0xinvalid") {
            Err(Error::ExplorerApi(_, why)) => assert_eq!(why, "Invalid Address format"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn get_contract_source_code_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api");
            then.status(502);
        });

        assert!(matches!(
            client(&server).get_contract_source_code(ADDRESS),
            Err(Error::HttpStatus(_, 502))
        ));
    }

    #[test]
    fn get_contract_source_code_connection_refused() {
        let config = ExplorerConfig {
            api_url: "http://127.0.0.1:1/api".to_string(),
            token: "SECRETKEY".to_string(),
        };

        let err = ExplorerClient::new(config).unwrap().get_contract_source_code(ADDRESS).unwrap_err();
        assert!(matches!(err, Error::HttpRequest(_)));
        assert!(!err.to_string().contains("SECRETKEY"));
        assert!(!format!("{err:?}").contains("SECRETKEY"));
    }
}
