//! Persistence of the state that must survive between invocations: the last
//! known address, the history of the day and the rollover state.

use crate::address::Address;
use crate::error::{BoxError, Error};
use crate::history::DailyHistory;
use crate::rollover::RolloverState;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

/// Keeps the address that the DNS record was last updated to.
pub trait AddressStore {
    fn load_last_address(&self) -> Result<Option<Address>, Error>;
    fn save_last_address(&self, address: &Address) -> Result<(), Error>;
}

/// Keeps the observations of the current day.
pub trait HistoryStore {
    /// Returns an empty history when nothing has been saved yet.
    fn load_history(&self) -> Result<DailyHistory, Error>;
    fn save_history(&self, history: &DailyHistory) -> Result<(), Error>;
}

/// Keeps the state of the daily rollover.
pub trait RolloverStore {
    /// Returns the default state when nothing has been saved yet.
    fn load_rollover(&self) -> Result<RolloverState, Error>;
    fn save_rollover(&self, state: &RolloverState) -> Result<(), Error>;
}

/// A store which implements all the kinds of state.
pub trait Store: AddressStore + HistoryStore + RolloverStore {}

impl<T: AddressStore + HistoryStore + RolloverStore> Store for T {}

const LAST_ADDRESS_FILE: &str = "last_ip";
const HISTORY_FILE: &str = "daily_history.json";
const ROLLOVER_FILE: &str = "rollover.json";

/// Store which keeps each kind of state in a JSON file inside of a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store in `dir`; the directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads and deserializes `name`; `None` if the file doesn't exist.
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        let path = self.dir.join(name);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::internal(
                    &format!("error while reading {}", path.display()),
                    BoxError::from(e),
                ))
            }
        };

        serde_json::from_str(&contents).map(Some).map_err(|e| {
            Error::internal(
                &format!("error while parsing {}", path.display()),
                BoxError::from(e),
            )
        })
    }

    /// Serializes `value` to `name` through a temporary file, so a failure
    /// never leaves a half written file.
    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), Error> {
        let contents = serde_json::to_string_pretty(value).map_err(|e| {
            Error::internal(&format!("error while serializing {}", name), BoxError::from(e))
        })?;

        let path = self.dir.join(name);
        let tmp = self.dir.join(format!(".{}.tmp", name));
        write_replace(&self.dir, &tmp, &path, contents.as_bytes()).map_err(|e| {
            Error::internal(
                &format!("error while writing {}", path.display()),
                BoxError::from(e),
            )
        })
    }
}

fn write_replace(dir: &Path, tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(tmp, contents)?;
    fs::rename(tmp, path)
}

impl AddressStore for FileStore {
    fn load_last_address(&self) -> Result<Option<Address>, Error> {
        self.read(LAST_ADDRESS_FILE)
    }

    fn save_last_address(&self, address: &Address) -> Result<(), Error> {
        self.write(LAST_ADDRESS_FILE, address)
    }
}

impl HistoryStore for FileStore {
    fn load_history(&self) -> Result<DailyHistory, Error> {
        Ok(self.read(HISTORY_FILE)?.unwrap_or_default())
    }

    fn save_history(&self, history: &DailyHistory) -> Result<(), Error> {
        self.write(HISTORY_FILE, history)
    }
}

impl RolloverStore for FileStore {
    fn load_rollover(&self) -> Result<RolloverState, Error> {
        Ok(self.read(ROLLOVER_FILE)?.unwrap_or_default())
    }

    fn save_rollover(&self, state: &RolloverState) -> Result<(), Error> {
        self.write(ROLLOVER_FILE, state)
    }
}

/// Store which keeps the state in memory.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) last_address: std::cell::RefCell<Option<Address>>,
    pub(crate) history: std::cell::RefCell<DailyHistory>,
    pub(crate) rollover: std::cell::RefCell<RolloverState>,
    /// When set, every save fails.
    pub(crate) read_only: std::cell::Cell<bool>,
}

#[cfg(test)]
impl MemoryStore {
    fn check_writable(&self) -> Result<(), Error> {
        if self.read_only.get() {
            return Err(Error::internal(
                "error while writing the state",
                BoxError::from("read-only store"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
impl AddressStore for MemoryStore {
    fn load_last_address(&self) -> Result<Option<Address>, Error> {
        Ok(self.last_address.borrow().clone())
    }

    fn save_last_address(&self, address: &Address) -> Result<(), Error> {
        self.check_writable()?;
        *self.last_address.borrow_mut() = Some(address.clone());
        Ok(())
    }
}

#[cfg(test)]
impl HistoryStore for MemoryStore {
    fn load_history(&self) -> Result<DailyHistory, Error> {
        Ok(self.history.borrow().clone())
    }

    fn save_history(&self, history: &DailyHistory) -> Result<(), Error> {
        self.check_writable()?;
        *self.history.borrow_mut() = history.clone();
        Ok(())
    }
}

#[cfg(test)]
impl RolloverStore for MemoryStore {
    fn load_rollover(&self) -> Result<RolloverState, Error> {
        Ok(self.rollover.borrow().clone())
    }

    fn save_rollover(&self, state: &RolloverState) -> Result<(), Error> {
        self.check_writable()?;
        *self.rollover.borrow_mut() = state.clone();
        Ok(())
    }
}
