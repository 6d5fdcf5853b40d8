//! Block explorer and Immunefi HTTP clients.

use crate::error::Error;
use log::debug;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod explorer;
pub mod immunefi;

struct RequestHandler {
    client: Client,
}

/// Handler responsible for sites which don't need any special error handling
struct GenericResponseHandler;

/// Handler responsible for Etherscan-family APIs (Etherscan, Polygonscan, BscScan)
struct ExplorerResponseHandler;

trait ResponseHandler {
    /// Prepares a request by i.e. setting it's headers or query parameters.
    fn prepare(request_handler: &RequestHandler, url: &str, query: &[(&str, &str)]) -> RequestBuilder {
        request_handler.client.get(url).query(query)
    }

    /// Given a response different error status codes are handled, returning the response body on success.
    fn process(response: Response) -> Result<String, Error>;
}

impl RequestHandler {
    pub fn new() -> Result<Self, Error> {
        Ok(RequestHandler {
            client: Client::builder().build()?,
        })
    }

    #[inline]
    fn execute<T: ResponseHandler>(&self, url: &str, query: &[(&str, &str)]) -> Result<String, Error> {
        let request = T::prepare(self, url, query);
        let response = request.send().map_err(http_request_error)?;
        debug!("{} {}", response.status().as_u16(), redact(response.url().as_str()));

        T::process(response)
    }

    pub fn execute_text<T: ResponseHandler>(&self, url: &str) -> Result<String, Error> {
        self.execute::<T>(url, &[])
    }

    pub fn execute_deser<T: ResponseHandler, U: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<U, Error> {
        Ok(serde_json::from_str(&self.execute::<T>(url, query)?)?)
    }
}

/// Drops the request URL, including its `apikey` parameter, from transport errors.
fn http_request_error(why: reqwest::Error) -> Error {
    Error::HttpRequest(why.without_url())
}

/// Strips the `apikey` query parameter from URLs before they end up in logs or error messages.
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .filter(|(key, _)| key != "apikey")
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();

            match pairs.is_empty() {
                true => parsed.set_query(None),
                false => {
                    parsed.query_pairs_mut().clear().extend_pairs(pairs);
                }
            }

            parsed.to_string()
        }

        Err(_) => url.to_string(),
    }
}

impl ResponseHandler for GenericResponseHandler {
    fn process(response: Response) -> Result<String, Error> {
        match response.status().as_u16() {
            200 => Ok(response.text().map_err(http_request_error)?),

            status => Err(Error::HttpStatus(redact(response.url().as_str()), status)),
        }
    }
}

impl ResponseHandler for ExplorerResponseHandler {
    fn process(response: Response) -> Result<String, Error> {
        #[derive(Deserialize)]
        struct Page {
            status: String,

            // A list of records on success, an error description otherwise
            result: serde_json::Value,
        }

        let url = redact(response.url().as_str());
        match response.status().as_u16() {
            200 => {
                let content = response.text().map_err(http_request_error)?;
                let json = serde_json::from_str::<Page>(&content)?;

                // Etherscan (among others) always return a 200 status code regardless of whether or not the
                // request was sucessful. The actual status is wrapped within the JSON body.
                match json.status.as_str() {
                    "1" => Ok(content),

                    _ => match json.result.as_str() {
                        Some("Invalid API Key") | Some("Missing/Invalid API Key") => {
                            Err(Error::ExplorerInvalidToken(url))
                        }

                        Some("Contract source code not verified") => {
                            Err(Error::ExplorerContractSourceCodeNotVerified(url))
                        }

                        Some(why) => Err(Error::ExplorerApi(url, why.to_string())),
                        None => Err(Error::ExplorerApi(url, json.result.to_string())),
                    },
                }
            }

            status => Err(Error::HttpStatus(url, status)),
        }
    }
}
