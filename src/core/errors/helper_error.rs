use thiserror::Error;

/// Failure kinds shared by every helper.
///
/// Remote kinds keep the HTTP status (when one exists) so the binaries can
/// surface it instead of swallowing it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HelperError {
    #[error("authentication failed{}: {message}", status_suffix(.status))]
    Authentication {
        status: Option<u16>,
        message: String,
    },
    #[error("not found{}: {message}", status_suffix(.status))]
    NotFound {
        status: Option<u16>,
        message: String,
    },
    #[error("permission denied{}: {message}", status_suffix(.status))]
    Permission {
        status: Option<u16>,
        message: String,
    },
    #[error("remote service error{}: {message}", status_suffix(.status))]
    RemoteService {
        status: Option<u16>,
        message: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl HelperError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            status: None,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            status: None,
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            status: None,
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteService {
            status: None,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Map a non-success HTTP status onto the taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let status_opt = Some(status);
        let message = message.into();
        match status {
            401 => Self::Authentication {
                status: status_opt,
                message,
            },
            403 => Self::Permission {
                status: status_opt,
                message,
            },
            404 => Self::NotFound {
                status: status_opt,
                message,
            },
            _ => Self::RemoteService {
                status: status_opt,
                message,
            },
        }
    }

    /// The HTTP status behind the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::NotFound { status, .. }
            | Self::Permission { status, .. }
            | Self::RemoteService { status, .. } => *status,
            Self::InvalidInput(_) => None,
        }
    }

    /// Process exit code for this kind. Zero is reserved for success.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::Authentication { .. } => 3,
            Self::NotFound { .. } => 4,
            Self::Permission { .. } => 5,
            Self::RemoteService { .. } => 6,
        }
    }
}

impl From<reqwest::Error> for HelperError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteService {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}
