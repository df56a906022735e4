use std::{fmt, str::FromStr};

/// Classification dimension requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CheckKind {
    /// Human-readable description, e.g. "ASCII text".
    Text,
    /// MIME type, e.g. "text/plain".
    Mime,
    /// Character encoding, e.g. "us-ascii".
    Encoding,
}

impl CheckKind {
    pub const ALL: [CheckKind; 3] = [CheckKind::Text, CheckKind::Mime, CheckKind::Encoding];
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Text => "text",
                Self::Mime => "mime",
                Self::Encoding => "encoding",
            }
        )
    }
}

impl FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "mime" => Ok(Self::Mime),
            "encoding" => Ok(Self::Encoding),
            other => Err(format!("Unknown check kind: {other}")),
        }
    }
}
