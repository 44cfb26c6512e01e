use std::env;

/// Application configuration loaded from environment variables.
///
/// Every knob has a default; a fresh checkout runs with no environment at
/// all. An unparsable `PORT` fails startup loudly rather than silently
/// binding somewhere unexpected.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Directory holding channels.json and library.json.
    pub data_dir: String,
    /// Seconds before an ffprobe invocation is abandoned.
    pub probe_timeout_secs: u64,
    /// ffprobe binary to invoke; override for non-PATH installs.
    pub ffprobe_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let port = env::var("PORT").unwrap_or_else(|_| "9210".to_string()).parse()?;

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let probe_timeout_secs = env::var("PROBE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let ffprobe_path = env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string());

        Ok(Config {
            port,
            data_dir,
            probe_timeout_secs,
            ffprobe_path,
        })
    }
}
