use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum MpdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse MPD response: {0}")]
    Parse(String),
    #[error("{0}")]
    Generic(String),
    #[error("Connection to MPD was closed")]
    ClientClosed,
    #[error("Expected key-value pair but got '{0}'")]
    ValueExpected(String),
    #[error("MPD returned an error: {0}")]
    Mpd(MpdFailureResponse),
}

impl From<std::num::ParseIntError> for MpdError {
    fn from(value: std::num::ParseIntError) -> Self {
        MpdError::Parse(value.to_string())
    }
}

impl From<std::num::ParseFloatError> for MpdError {
    fn from(value: std::num::ParseFloatError) -> Self {
        MpdError::Parse(value.to_string())
    }
}

/// A failure response from MPD, i.e. `ACK [50@0] {albumart} No file exists`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpdFailureResponse {
    pub code: ErrorCode,
    pub command_list_index: u8,
    pub command: String,
    pub message: String,
}

impl std::fmt::Display for MpdFailureResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' failed with error code '{:?}' at command list index {}: '{}'",
            self.command, self.code, self.command_list_index, self.message
        )
    }
}

impl FromStr for MpdFailureResponse {
    type Err = MpdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MpdError::Parse(format!("Invalid error response: '{s}'"));

        let rest = s.strip_prefix("ACK").ok_or_else(invalid)?.trim_start();
        let rest = rest.strip_prefix('[').ok_or_else(invalid)?;
        let (codes, rest) = rest.split_once(']').ok_or_else(invalid)?;
        let (code, list_index) = codes.split_once('@').ok_or_else(invalid)?;

        let rest = rest.trim_start().strip_prefix('{').ok_or_else(invalid)?;
        let (command, message) = rest.split_once('}').ok_or_else(invalid)?;

        Ok(Self {
            code: code.parse::<u8>()?.try_into()?,
            command_list_index: list_index.parse()?,
            command: command.to_string(),
            message: message.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// not a list
    NotList,
    /// bad command arguments
    Argument,
    /// invalid password
    Password,
    /// insufficient permissions
    Permission,
    /// unknown command
    UnknownCommand,
    /// object doesn't exist
    NoExist,
    /// maximum playlist size exceeded
    PlaylistMax,
    /// general system error
    System,
    /// error loading playlist
    PlaylistLoad,
    /// update database is already in progress
    UpdateAlready,
    /// player synchronization error
    PlayerSync,
    /// object already exists
    Exist,
}

impl TryFrom<u8> for ErrorCode {
    type Error = MpdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::NotList),
            2 => Ok(Self::Argument),
            3 => Ok(Self::Password),
            4 => Ok(Self::Permission),
            5 => Ok(Self::UnknownCommand),
            50 => Ok(Self::NoExist),
            51 => Ok(Self::PlaylistMax),
            52 => Ok(Self::System),
            53 => Ok(Self::PlaylistLoad),
            54 => Ok(Self::UpdateAlready),
            55 => Ok(Self::PlayerSync),
            56 => Ok(Self::Exist),
            _ => Err(MpdError::Parse(format!("Unknown error code: '{value}'"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use test_case::test_case;

    use super::{ErrorCode, MpdFailureResponse};

    #[test_case("ACK [50@0] {albumart} No file exists", ErrorCode::NoExist, 0, "albumart", "No file exists")]
    #[test_case("ACK [3@0] {password} incorrect password", ErrorCode::Password, 0, "password", "incorrect password")]
    #[test_case("ACK [2@5] {} unknown filter", ErrorCode::Argument, 5, "", "unknown filter")]
    fn parses_failure_response(
        input: &str,
        code: ErrorCode,
        index: u8,
        command: &str,
        message: &str,
    ) {
        let response: MpdFailureResponse = input.parse().unwrap();

        assert_eq!(response.code, code);
        assert_eq!(response.command_list_index, index);
        assert_eq!(response.command, command);
        assert_eq!(response.message, message);
    }

    #[test_case("ACK [50@0] No file exists")]
    #[test_case("ACK [999@0] {albumart} No file exists")]
    #[test_case("OK")]
    #[test_case("")]
    fn rejects_malformed_response(input: &str) {
        assert!(input.parse::<MpdFailureResponse>().is_err());
    }
}
