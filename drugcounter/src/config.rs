use std::path::PathBuf;

/// Audit log destination when none is given
pub const DEFAULT_LOG_PATH: &str = "log.txt";

/// Interpretation of the optional logging flag argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingFlag {
    Enabled,
    Disabled,
    /// Anything other than "0" or "1"; logging stays on
    Unrecognized,
}

impl LoggingFlag {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("1") => LoggingFlag::Enabled,
            Some("0") => LoggingFlag::Disabled,
            Some(_) => LoggingFlag::Unrecognized,
        }
    }

    pub fn enabled(self) -> bool {
        self != LoggingFlag::Disabled
    }
}

/// Everything one run needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Keep only the top K drugs; `None` reports all of them
    pub top_k: Option<usize>,
    pub logging: bool,
    pub log_path: PathBuf,
}

impl RunConfig {
    /// Config with every optional setting at its default
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            top_k: None,
            logging: true,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

/// Lenient top-K parsing
///
/// Unparseable or missing values mean "report everything". Negative values
/// keep nothing, so they clamp to zero.
pub fn parse_top_k(raw: Option<&str>) -> Option<usize> {
    let k: i64 = raw?.trim().parse().ok()?;
    Some(usize::try_from(k).unwrap_or(0))
}
