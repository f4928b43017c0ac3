//! Centralized constants for character classes, limits, and file layout.

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Default length for generated passwords when none is configured.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Lowercase character class.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// Uppercase character class.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Digit character class.
pub const DIGITS: &str = "0123456789";

/// Special character class (ASCII punctuation).
pub const SPECIAL: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Size of the symmetric encryption key in bytes.
pub const KEY_LEN: usize = 32;

/// Maximum secret size in bytes accepted by `save`.
pub const MAX_SECRET_SIZE: usize = 4096;

/// Permission mode for the store root directory.
pub const STORE_DIR_MODE: u32 = 0o700;

/// Permission mode for the key file and record files.
pub const SECRET_FILE_MODE: u32 = 0o600;

/// Config file name at the store root.
pub const CONFIG_FILE: &str = "forge.toml";

/// JSON record file name.
pub const STORE_FILE: &str = "store.json";

/// SQLite database file name.
pub const DB_FILE: &str = "store.db";

/// Encryption key file name.
pub const KEY_FILE: &str = "secret.key";

/// Lock file guarding JSON store rewrites.
pub const LOCK_FILE: &str = "store.lock";

/// Default store root directory name under the user data dir.
pub const DEFAULT_ROOT_DIR: &str = "passforge";
