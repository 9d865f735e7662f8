use std::str::FromStr;

use crate::errors::MpdError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = MpdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let invalid = || MpdError::Parse(format!("Invalid version: '{s}'"));

        let major = parts.next().ok_or_else(invalid)?.parse()?;
        let minor = parts.next().ok_or_else(invalid)?.parse()?;
        let patch = parts.next().map(str::parse).transpose()?.unwrap_or_default();

        Ok(Self { major, minor, patch })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use test_case::test_case;

    use super::Version;

    #[test_case("0.23.5", Version::new(0, 23, 5))]
    #[test_case("0.24", Version::new(0, 24, 0))]
    #[test_case("1.0.0\n", Version::new(1, 0, 0))]
    fn parses(input: &str, expected: Version) {
        assert_eq!(input.parse::<Version>().unwrap(), expected);
    }

    #[test_case("")]
    #[test_case("0")]
    #[test_case("a.b.c")]
    fn rejects(input: &str) {
        assert!(input.parse::<Version>().is_err());
    }

    #[test]
    fn orders_by_component() {
        assert!(Version::new(0, 23, 5) < Version::new(0, 24, 0));
        assert!(Version::new(0, 23, 5) < Version::new(1, 0, 0));
    }
}
