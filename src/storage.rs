//! Key pair persistence as two PEM files.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use zeroize::Zeroizing;

use crate::crypto::KeyPair;
use crate::error::{Error, Result};

/// Extension of the private key file.
pub const PRIVATE_KEY_EXT: &str = "pvt";
/// Extension of the public key file.
pub const PUBLIC_KEY_EXT: &str = "pub";
/// File mode for newly created key files.
pub const KEY_FILE_MODE: u32 = 0o700;

const DEFAULT_BASE_NAME: &str = "courier";

/// Which halves of a key pair a [`KeyStore::load`] found.
///
/// The discriminants are stable status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LoadStatus {
    /// Both keys loaded; encrypt and decrypt are possible.
    Complete = 0,
    /// Only the public key loaded; decryption is impossible.
    PrivateMissing = 1,
    /// Only the private key loaded; encryption is impossible.
    PublicMissing = 2,
    /// Neither key loaded.
    BothMissing = 3,
}

impl LoadStatus {
    /// Builds the status from which halves failed to load.
    pub fn from_flags(private_missing: bool, public_missing: bool) -> Self {
        match (private_missing, public_missing) {
            (false, false) => LoadStatus::Complete,
            (true, false) => LoadStatus::PrivateMissing,
            (false, true) => LoadStatus::PublicMissing,
            (true, true) => LoadStatus::BothMissing,
        }
    }

    /// Returns the numeric status code, 0 to 3.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the private key was not loaded.
    pub fn private_missing(self) -> bool {
        self.bits() & LoadStatus::PrivateMissing.bits() != 0
    }

    /// Returns `true` if the public key was not loaded.
    pub fn public_missing(self) -> bool {
        self.bits() & LoadStatus::PublicMissing.bits() != 0
    }

    /// Returns `true` if a public key is available.
    pub fn can_encrypt(self) -> bool {
        !self.public_missing()
    }

    /// Returns `true` if a private key is available.
    pub fn can_decrypt(self) -> bool {
        !self.private_missing()
    }
}

/// Key material read back by [`KeyStore::load`]; absent halves are `None`.
pub struct LoadedKeys {
    public_key: Option<String>,
    private_key: Option<Zeroizing<String>>,
}

impl LoadedKeys {
    /// Returns the public key PEM, if it was loaded.
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Returns the private key PEM, if it was loaded.
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_ref().map(|k| k.as_str())
    }

    /// Returns the status matching the loaded halves.
    pub fn status(&self) -> LoadStatus {
        LoadStatus::from_flags(self.private_key.is_none(), self.public_key.is_none())
    }

    /// Returns the pair if both halves were loaded.
    pub fn into_key_pair(self) -> Option<KeyPair> {
        match (self.public_key, self.private_key) {
            (Some(public_key), Some(private_key)) => {
                Some(KeyPair::from_parts(public_key, private_key))
            }
            _ => None,
        }
    }
}

/// Stores a key pair as `<base>.pvt` and `<base>.pub`.
///
/// The two files are written and read independently. A failed
/// [`save`](KeyStore::save) may leave the private key file updated and the
/// public one not, and concurrent callers on the same base path are not
/// coordinated.
#[derive(Debug, Clone)]
pub struct KeyStore {
    base: PathBuf,
}

impl KeyStore {
    /// Creates a store for the given base path (without extension).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Store in the platform data directory, e.g.
    /// `~/.local/share/rsa-courier/courier.{pvt,pub}` on Linux.
    pub fn default_location() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("", "", "rsa-courier").ok_or(Error::DataDirUnavailable)?;

        Ok(Self::new(project_dirs.data_dir().join(DEFAULT_BASE_NAME)))
    }

    /// Returns the base path the extensions are appended to.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns `<base>.pvt`.
    pub fn private_path(&self) -> PathBuf {
        self.with_extension(PRIVATE_KEY_EXT)
    }

    /// Returns `<base>.pub`.
    pub fn public_path(&self) -> PathBuf {
        self.with_extension(PUBLIC_KEY_EXT)
    }

    // Appends rather than replaces, so a base of "keys.v2" gives "keys.v2.pub".
    fn with_extension(&self, ext: &str) -> PathBuf {
        let mut path = OsString::from(self.base.as_os_str());
        path.push(".");
        path.push(ext);
        PathBuf::from(path)
    }

    /// Writes the private key file, then the public key file.
    ///
    /// Missing parent directories are created. Existing files are
    /// truncated and keep their permissions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] naming the file that could not be written. If
    /// that is the public key file, the private key file has already been
    /// replaced.
    pub fn save(&self, keys: &KeyPair) -> Result<()> {
        if let Some(parent) = self.base.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        write_key_file(&self.private_path(), keys.private_key())?;
        write_key_file(&self.public_path(), keys.public_key())?;
        Ok(())
    }

    /// Reads both key files. Never fails: a file that cannot be read is
    /// reported through the returned [`LoadStatus`].
    pub fn load(&self) -> (LoadedKeys, LoadStatus) {
        let keys = LoadedKeys {
            public_key: read_key_file(&self.public_path()),
            private_key: read_key_file(&self.private_path()).map(Zeroizing::new),
        };
        let status = keys.status();
        debug!("loaded keys from {}: {status:?}", self.base.display());

        (keys, status)
    }
}

fn write_key_file(path: &Path, contents: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(KEY_FILE_MODE);
    }

    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = options.open(path).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;

    debug!("wrote key file {}", path.display());
    Ok(())
}

fn read_key_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            debug!("key file {} unavailable: {e}", path.display());
            None
        }
    }
}
