use std::fmt;

/// Top-level application error type
#[derive(Debug)]
pub enum AppError {
    /// Browser / page interaction errors
    Browser(BrowserError),
    /// Concept table (spreadsheet) errors
    Table(TableError),
    /// Login flow errors
    Auth(AuthError),
    /// Anything else (wraps third-party errors without a better home)
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "browser error: {}", e),
            AppError::Table(e) => write!(f, "table error: {}", e),
            AppError::Auth(e) => write!(f, "authentication error: {}", e),
            AppError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Table(e) => Some(e),
            AppError::Auth(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// Browser / page interaction errors
#[derive(Debug)]
pub enum BrowserError {
    /// Launching the headless browser failed
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Creating the page failed
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Navigation to a URL failed
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Evaluating a script in the page failed
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A bounded wait for an expected page state ran out
    WaitTimedOut { what: String, waited_secs: u64 },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::LaunchFailed { source } => {
                write!(f, "failed to launch browser: {}", source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "failed to create page: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "navigation to {} failed: {}", url, source)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "script execution failed: {}", source)
            }
            BrowserError::WaitTimedOut { what, waited_secs } => {
                write!(f, "timed out after {}s waiting for {}", waited_secs, what)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            BrowserError::WaitTimedOut { .. } => None,
        }
    }
}

/// Concept table (spreadsheet) errors
#[derive(Debug)]
pub enum TableError {
    /// Input file does not exist
    NotFound { path: String },
    /// Reading or parsing the input file failed
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Writing the output file failed
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A row has an empty concept_name cell
    EmptyConceptName { row: usize },
    /// A row index outside the table was addressed
    RowOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::NotFound { path } => write!(f, "input file not found: {}", path),
            TableError::ReadFailed { path, source } => {
                write!(f, "failed to read table ({}): {}", path, source)
            }
            TableError::WriteFailed { path, source } => {
                write!(f, "failed to write table ({}): {}", path, source)
            }
            TableError::EmptyConceptName { row } => {
                write!(f, "row {} has an empty concept_name", row)
            }
            TableError::RowOutOfRange { index, len } => {
                write!(f, "row index {} out of range (table has {} rows)", index, len)
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::ReadFailed { source, .. } | TableError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Login flow errors — always fatal to the run
#[derive(Debug)]
pub enum AuthError {
    /// A login step never reached its expected page state
    StepTimedOut { step: String, waited_secs: u64 },
    /// Credentials were submitted but the landing page never appeared
    HomePageNotReached { waited_secs: u64 },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::StepTimedOut { step, waited_secs } => {
                write!(f, "login step '{}' timed out after {}s", step, waited_secs)
            }
            AuthError::HomePageNotReached { waited_secs } => {
                write!(
                    f,
                    "landing page did not appear within {}s of submitting credentials",
                    waited_secs
                )
            }
        }
    }
}

impl std::error::Error for AuthError {}

// ========== Conversions from common error types ==========
// anyhow converts AppError automatically via the std::error::Error impl.

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON conversion failed: {}", err))
    }
}

// ========== Convenience constructors ==========

impl AppError {
    pub fn wait_timed_out(what: impl Into<String>, waited_secs: u64) -> Self {
        AppError::Browser(BrowserError::WaitTimedOut {
            what: what.into(),
            waited_secs,
        })
    }

    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    pub fn table_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Table(TableError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    pub fn table_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Table(TableError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    pub fn auth_step_timed_out(step: impl Into<String>, waited_secs: u64) -> Self {
        AppError::Auth(AuthError::StepTimedOut {
            step: step.into(),
            waited_secs,
        })
    }
}

// ========== Result type alias ==========

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
