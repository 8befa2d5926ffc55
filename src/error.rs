//! Error types for colour extraction.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failures surfaced by the loader, the strategies and the config layer.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file is missing, unreadable or not a decodable image.
    #[error("failed to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An in-memory buffer could not be decoded.
    #[error("unable to decode image: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },

    /// Something went wrong after the image was loaded.
    #[error("processing error: {message}")]
    Processing { message: String },

    #[error("invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    #[error("invalid hex color: {value:?}")]
    InvalidHex { value: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl ExtractError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// True when the image never made it into memory.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_are_distinguished_from_processing() {
        let load = ExtractError::Load {
            path: PathBuf::from("missing.png"),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "gone",
            )),
        };
        assert!(load.is_load());
        assert!(load.to_string().contains("missing.png"));

        let processing = ExtractError::processing("empty sample");
        assert!(!processing.is_load());
        assert_eq!(processing.to_string(), "processing error: empty sample");
    }

    #[test]
    fn invalid_parameter_message() {
        let err = ExtractError::invalid_parameter("k", 0);
        assert_eq!(err.to_string(), "invalid parameter: k = 0");
    }
}
