use crate::{data::Contract, error::Error};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::{
    collections::HashMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    process,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

lazy_static! {
    static ref UNSAFE_FILE_CHARACTERS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

static TEMP_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`, so distinct names never share a file name.
fn encode_file_name(name: &str) -> String {
    if name.is_empty() {
        return String::from("%");
    }

    UNSAFE_FILE_CHARACTERS
        .replace_all(name, |captures: &Captures| {
            captures[0]
                .bytes()
                .map(|byte| format!("%{:02X}", byte))
                .collect::<String>()
        })
        .into_owned()
}

/// Durable mapping from a (consumer, provider) pair to the latest contract between them.
pub trait ContractStore: Debug {
    /// Replaces whatever contract was stored for the contract's pair.
    fn save(&self, contract: &Contract) -> Result<(), Error>;
    /// Fails with [`Error::ContractNotFound`] when nothing was saved for the pair.
    fn load(&self, consumer: &str, provider: &str) -> Result<Contract, Error>;
}

/// Stores each contract as `<directory>/<consumer>/<provider>.json`.
#[derive(Debug, Clone)]
pub struct FileContractStore {
    directory: PathBuf,
}

impl FileContractStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn contract_path(&self, consumer: &str, provider: &str) -> PathBuf {
        self.directory
            .join(encode_file_name(consumer))
            .join(format!("{}.json", encode_file_name(provider)))
    }
}

impl ContractStore for FileContractStore {
    fn save(&self, contract: &Contract) -> Result<(), Error> {
        let document = contract.to_document()?;
        let path = self.contract_path(contract.consumer_name(), contract.provider_name());
        let temp_path = path.with_extension(format!(
            "json.{}-{}.tmp",
            process::id(),
            TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&temp_path, document)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::info!(path = %path.display(), interactions = contract.interactions.len(), "Saved contract");

        Ok(())
    }

    fn load(&self, consumer: &str, provider: &str) -> Result<Contract, Error> {
        let path = self.contract_path(consumer, provider);
        let document = match fs::read_to_string(&path) {
            Ok(document) => document,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ContractNotFound {
                    consumer: consumer.into(),
                    provider: provider.into(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let contract = Contract::from_document(&document)?;
        if contract.consumer_name() != consumer || contract.provider_name() != provider {
            tracing::warn!(
                path = %path.display(),
                consumer,
                provider,
                "Stored contract belongs to another pair"
            );
            return Err(Error::ContractNotFound {
                consumer: consumer.into(),
                provider: provider.into(),
            });
        }

        Ok(contract)
    }
}

/// Keeps serialized contracts in memory. Useful when a test doesn't care about the files.
#[derive(Debug, Default)]
pub struct MemoryContractStore {
    documents: Mutex<HashMap<(String, String), String>>,
}

impl MemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialized form of the stored contract, exactly as a file store would write it.
    pub fn document(&self, consumer: &str, provider: &str) -> Result<Option<String>, Error> {
        Ok(self
            .documents
            .lock()?
            .get(&(consumer.to_string(), provider.to_string()))
            .cloned())
    }
}

impl ContractStore for MemoryContractStore {
    fn save(&self, contract: &Contract) -> Result<(), Error> {
        let document = contract.to_document()?;
        self.documents.lock()?.insert(
            (
                contract.consumer_name().to_string(),
                contract.provider_name().to_string(),
            ),
            document,
        );

        Ok(())
    }

    fn load(&self, consumer: &str, provider: &str) -> Result<Contract, Error> {
        match self.document(consumer, provider)? {
            Some(document) => Ok(Contract::from_document(&document)?),
            None => Err(Error::ContractNotFound {
                consumer: consumer.into(),
                provider: provider.into(),
            }),
        }
    }
}
