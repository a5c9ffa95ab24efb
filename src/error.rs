use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum OptError {
	Io(io::Error),
	Yaml(serde_yaml::Error),
	Parse(String),
	Validation(String),
	Serialization(String),
	InvalidParameter(String),
	FileNotFound(PathBuf),
	UnknownComponent { kind: &'static str, name: String },
}

impl fmt::Display for OptError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			OptError::Io(err) => write!(f, "IO error: {}", err),
			OptError::Yaml(err) => write!(f, "YAML error: {}", err),
			OptError::Parse(msg) => write!(f, "Parse error: {}", msg),
			OptError::Validation(msg) => write!(f, "Validation error: {}", msg),
			OptError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
			OptError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
			OptError::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
			OptError::UnknownComponent { kind, name } => {
				write!(f, "Unknown {} type: {}", kind, name)
			},
		}
	}
}

impl StdError for OptError {}

impl From<io::Error> for OptError {
	fn from(err: io::Error) -> Self {
		OptError::Io(err)
	}
}

impl From<serde_yaml::Error> for OptError {
	fn from(err: serde_yaml::Error) -> Self {
		OptError::Yaml(err)
	}
}

pub type Result<T> = std::result::Result<T, OptError>;
