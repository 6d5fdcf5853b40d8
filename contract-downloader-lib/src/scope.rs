//! Forwards contracts found on a bounty page to the downloader, one at a time.

use crate::error::Error;
use crate::model::Network;
use crate::model::ScopeLink;
use log::warn;

/// Calls `download` for every scope link, collecting contracts that failed instead of aborting.
pub fn forward<F>(links: &[ScopeLink], mut download: F) -> Vec<(ScopeLink, Error)>
where
    F: FnMut(Network, &str) -> Result<(), Error>,
{
    let mut skipped = Vec::new();

    for link in links {
        if let Err(why) = download(link.explorer.network(), &link.address) {
            warn!("Skipping {link}; {why}");
            skipped.push((link.clone(), why));
        }
    }

    skipped
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::model::Explorer;
    use crate::model::Network;
    use crate::model::ScopeLink;
    use crate::scope;

    fn link(explorer: Explorer, address: &str) -> ScopeLink {
        ScopeLink {
            explorer,
            address: address.to_string(),
        }
    }

    #[test]
    fn forward_all() {
        let links = vec![link(Explorer::Etherscan, "0x1111111111111111111111111111111111111111")];
        let mut calls = Vec::new();

        let skipped = scope::forward(&links, |network, address| {
            calls.push((network, address.to_string()));
            Ok(())
        });

        assert!(skipped.is_empty());
        assert_eq!(calls, vec![(Network::Mainnet, "0x1111111111111111111111111111111111111111".to_string())]);
    }

    #[test]
    fn forward_tolerates_failures() {
        let links = vec![
            link(Explorer::Etherscan, "0x1111111111111111111111111111111111111111"),
            link(Explorer::Polygonscan, "0x2222222222222222222222222222222222222222"),
            link(Explorer::Bscscan, "0x3333333333333333333333333333333333333333"),
        ];
        let mut calls = Vec::new();

        let skipped = scope::forward(&links, |network, address| {
            calls.push(network);

            match network {
                Network::Polygon => Err(Error::HttpStatus(address.to_string(), 503)),
                _ => Ok(()),
            }
        });

        assert_eq!(calls, vec![Network::Mainnet, Network::Polygon, Network::Bsc]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, links[1]);
        assert!(matches!(skipped[0].1, Error::HttpStatus(_, 503)));
    }
}
