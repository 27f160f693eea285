//! Configuration and constants for the CLI.

/// Production endpoint of the cassette API
pub const DEFAULT_API_URL: &str = "https://api.cassette.dev/api";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "API_URL";

// Variables injected into the test command so the instrumented HTTP layer
// knows where (and how) to record transactions
pub const RECORDING_ENV: &str = "CASSETTE_RECORDING";
pub const BULK_FILE_PATH_ENV: &str = "CASSETTE_BULK_FILE_PATH";
pub const BULK_FILE_SEPARATOR_ENV: &str = "CASSETTE_BULK_FILE_SEPARATOR";

/// Prefix of every separator token
pub const SEPARATOR_PREFIX: &str = "separator--";

/// Number of random characters following the separator prefix
pub const SEPARATOR_RANDOM_LEN: usize = 32;

// Multipart upload of the capture file
pub const UPLOAD_FIELD_NAME: &str = "request-transactions";
pub const UPLOAD_FILE_NAME: &str = "request-transactions.txt";
pub const UPLOAD_CONTENT_TYPE: &str = "text/plain";

/// Longest error text shown in verbose mode
pub const MAX_ERROR_DETAIL_CHARS: usize = 1000;

/// Capacity of the stdout chunk channel between the reader thread and the sink
pub const OUTPUT_CHANNEL_CAPACITY: usize = 64;
