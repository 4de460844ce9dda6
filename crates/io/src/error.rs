use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { path: PathBuf, message: String },
    /// File could not be created or written.
    Write { path: PathBuf, message: String },
    /// Timestamped working copy could not be created.
    Copy { from: PathBuf, to: PathBuf, message: String },
    /// Content holds characters the file's encoding cannot represent.
    Unencodable { path: PathBuf, encoding: &'static str },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Copy { from, to, message } => {
                write!(f, "cannot copy {} to {}: {message}", from.display(), to.display())
            }
            Self::Unencodable { path, encoding } => {
                write!(f, "{}: content cannot be encoded as {encoding}", path.display())
            }
        }
    }
}

impl std::error::Error for IoError {}
