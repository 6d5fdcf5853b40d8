//! Downloads verified contracts including their dependencies and replicates their directory tree locally,
//! or removes a previously downloaded contract again.
//!
//! Source files are laid out according to [`crate::layout`]. If requested, proxy contracts are resolved to
//! their implementation contract which is downloaded instead of the proxy.

use crate::api::explorer::ContractSource;
use crate::api::explorer::ExplorerClient;
use crate::config::Config;
use crate::error::Error;
use crate::layout;
use crate::layout::ResolvedPath;
use crate::model::ContractRecord;
use crate::model::Network;
use crate::model::SourceCode;
use log::info;
use log::warn;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

pub struct Downloader {
    root: PathBuf,
    remove: bool,
}

/// Downloads (or removes) the contract at `address` on the given network into `root`.
///
/// Unsupported networks are reported and skipped without returning an error.
pub fn start(
    config: &Config,
    root: &Path,
    network: &str,
    address: &str,
    remove: bool,
    resolve_impl: bool,
) -> Result<(), Error> {
    match network.parse::<Network>() {
        Ok(network) => start_network(config, root, network, address, remove, resolve_impl),

        Err(why) => {
            warn!("{why}");
            Ok(())
        }
    }
}

/// Same as [`start`] for an already parsed network.
pub fn start_network(
    config: &Config,
    root: &Path,
    network: Network,
    address: &str,
    remove: bool,
    resolve_impl: bool,
) -> Result<(), Error> {
    match remove {
        true => info!("Removing {network} contract {address} ..."),
        false => info!("Downloading {network} contract {address} ..."),
    }

    // The client and its connection pool live for this one invocation only
    let client = ExplorerClient::new(config.explorer(network)?)?;
    Downloader::new(root.to_path_buf(), remove).run(&client, address, resolve_impl)
}

impl Downloader {
    pub fn new(root: PathBuf, remove: bool) -> Self {
        Downloader { root, remove }
    }

    /// Fetches the source records of `address` and writes (or removes) their files.
    pub fn run(&self, source: &dyn ContractSource, address: &str, resolve_impl: bool) -> Result<(), Error> {
        for contract in source.get_contract_source_code(address)? {
            info!("Contract {}", contract.name);

            if resolve_impl && contract.is_proxy() {
                info!("Proxy! Using implementation contract {} instead", contract.implementation);
                return self.run(source, &contract.implementation, false);
            }

            self.materialize(&contract)?;
        }

        Ok(())
    }

    fn materialize(&self, contract: &ContractRecord) -> Result<(), Error> {
        let bundle = match SourceCode::parse(&contract.source_code) {
            SourceCode::Bundle(bundle) => bundle,
            SourceCode::SingleFile(_) => return Err(Error::SourceNotMultiFile(contract.name.clone())),
        };

        // Resolve everything upfront so an invalid reference leaves the filesystem untouched
        let files = bundle
            .sources
            .into_iter()
            .map(|(reference, file)| Ok::<_, Error>((layout::resolve(&self.root, &reference)?, file.content)))
            .collect::<Result<Vec<(ResolvedPath, String)>, Error>>()?;

        match self.remove {
            false => {
                for (path, content) in &files {
                    info!("{}", path.relative.display());
                    layout::write(path, content)?;
                }
            }

            true => {
                let mut module_roots = BTreeSet::new();
                for (path, _) in &files {
                    info!("{}", path.relative.display());
                    layout::remove(&self.root, path);

                    if let Some(module_root) = &path.module_root {
                        module_roots.insert(module_root.clone());
                    }
                }

                for module_root in module_roots {
                    layout::remove_placeholder(&self.root, &module_root);
                }
            }
        }

        Ok(())
    }
}
