//! Client for Immunefi bug bounty pages, e.g. <https://immunefi.com/bounty/vulnerableproject/>
//!
//! Bounty pages list their in-scope assets below a `<h3>Assets in scope</h3>` heading, where each contract
//! is linked to a block explorer, e.g. `https://etherscan.io/address/0x...`. Only links to one of the
//! [`Explorer`]s are picked up.
//!
//! The heading text is compared after trimming surrounding whitespace, so `<h3> Assets in scope </h3>` is
//! accepted as well. Apart from that the text must match exactly.

use crate::error::Error;
use crate::model::Explorer;
use crate::model::ScopeLink;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use select::document::Document;
use select::predicate::Name;
use url::Url;

use super::GenericResponseHandler;
use super::RequestHandler;

const SCOPE_HEADING: &str = "Assets in scope";

lazy_static! {
    static ref REGEX_ADDRESS: Regex = Regex::new(r"\b0x[0-9a-fA-F]{40}\b").unwrap();
}

pub struct ImmunefiClient {
    request_handler: RequestHandler,
}

impl ImmunefiClient {
    pub fn new() -> Result<Self, Error> {
        Ok(ImmunefiClient {
            request_handler: RequestHandler::new()?,
        })
    }

    /// Downloads the bounty page and returns all contracts linked in its scope section.
    pub fn get_scope_links(&self, bounty_url: &str) -> Result<Vec<ScopeLink>, Error> {
        let url = Url::parse(bounty_url).map_err(|why| Error::InvalidBountyUrl(bounty_url.to_string(), why))?;
        let html = self.request_handler.execute_text::<GenericResponseHandler>(url.as_str())?;

        scope_links_from_html(&html).ok_or_else(|| Error::ScopeSectionNotFound(bounty_url.to_string()))
    }
}

/// Extracts all block explorer links from the parent element of the "Assets in scope" heading, returning
/// `None` if no such heading exists.
pub fn scope_links_from_html(html: &str) -> Option<Vec<ScopeLink>> {
    let document = Document::from(html);
    let section = document
        .find(Name("h3"))
        .find(|heading| heading.text().trim() == SCOPE_HEADING)?
        .parent()?;

    let mut links = Vec::new();
    for anchor in section.find(Name("a")) {
        let text = anchor.text();
        let text = text.trim();

        if let Some(explorer) = explorer_of(text) {
            match address_of(text) {
                Some(address) => links.push(ScopeLink { explorer, address }),
                None => warn!("Skipping {} link without contract address '{text}'", explorer.name()),
            }
        }
    }

    Some(links)
}

/// Returns the first explorer whose domain, e.g. `/etherscan.`, is part of the given link text.
fn explorer_of(text: &str) -> Option<Explorer> {
    Explorer::ALL
        .into_iter()
        .find(|explorer| text.contains(&format!("/{}.", explorer.name())))
}

/// Returns the last 20 byte hex address within the given link text.
fn address_of(text: &str) -> Option<String> {
    REGEX_ADDRESS.find_iter(text).last().map(|address| address.as_str().to_string())
}
