use std::fmt;

/// Custom error type for reply generation
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Incoming message is empty after trimming
    InputInvalid
  , /// Generation backend missing, not initialized or faulted
    GenerationUnavailable(String)
  , /// Generation finished but produced no usable text
    EmptyGeneration
  , /// Timeout error
    Timeout
  , /// API key is missing for the backend
    MissingApiKey(String)
  , /// HTTP request error
    HttpError(String)
  , /// API returned an error response
    ApiError(String)
  , /// Failed to parse API response
    ParseError(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Unrecognized tone, length or similar option
    UnknownOption(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InputInvalid => {
              write!(f, "Incoming message is empty")
            }
          , Error::GenerationUnavailable(msg) => {
              write!(f, "Generation unavailable: {}", msg)
            }
          , Error::EmptyGeneration => {
              write!(f, "Generation produced no usable text")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::MissingApiKey(backend) => {
              write!(f, "Missing API key for: {}", backend)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::UnknownOption(value) => {
              write!(f, "Unknown option: {}", value)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::ParseError(e.to_string())
    }
}
