use mpdpoke_shared::{
    env::ENV,
    paths::utils::{env_var_expand, tilde_expand},
};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MpdAddress {
    IpAndPort(String),
    SocketPath(String),
    AbstractSocket(String),
}

impl Default for MpdAddress {
    fn default() -> Self {
        Self::IpAndPort("127.0.0.1:6600".to_string())
    }
}

#[derive(Default, Clone, Eq, PartialEq)]
pub struct MpdPassword(pub String);

impl std::fmt::Debug for MpdPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "*****")
    }
}

impl From<&str> for MpdPassword {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for MpdPassword {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Decides the network kind by the address shape. A leading `/` (after tilde
/// and `$VAR` expansion) selects a unix socket, a leading `@` an abstract
/// socket, anything else is host:port over TCP.
fn parse_address(addr: &str) -> MpdAddress {
    let var_expanded = env_var_expand(addr);
    let expanded = tilde_expand(&var_expanded);

    if expanded.starts_with('/') {
        MpdAddress::SocketPath(expanded.into_owned())
    } else if let Some(name) = expanded.strip_prefix('@') {
        MpdAddress::AbstractSocket(name.to_owned())
    } else {
        MpdAddress::IpAndPort(expanded.into_owned())
    }
}

/// Resolves the address and password to use, in order of preference:
/// CLI argument, `$MPD_HOST`/`$MPD_PORT`, config file.
pub fn resolve(
    addr_from_cli: Option<String>,
    pw_from_cli: Option<String>,
    addr_from_config: &str,
    pw_from_config: Option<String>,
) -> (MpdAddress, Option<MpdPassword>) {
    if let Some(addr) = addr_from_cli {
        return (parse_address(&addr), pw_from_cli.map(MpdPassword::from));
    }

    if let Some(resolved) = resolve_env() {
        return resolved;
    }

    (parse_address(addr_from_config), pw_from_config.map(MpdPassword::from))
}

fn resolve_env() -> Option<(MpdAddress, Option<MpdPassword>)> {
    let host = ENV.var("MPD_HOST").ok().filter(|host| !host.is_empty())?;

    // MPD_HOST can carry a password as "password@host". A host starting with
    // '@' is an abstract socket, not an empty password.
    let mut password = None;
    let host = if host.starts_with('@') {
        host
    } else if let Some((pw, rest)) = host.split_once('@') {
        password = Some(MpdPassword::from(pw));
        rest.to_owned()
    } else {
        host
    };

    let addr = match parse_address(&host) {
        MpdAddress::IpAndPort(host) => {
            let port = ENV.var("MPD_PORT").unwrap_or_else(|_| "6600".to_string());
            MpdAddress::IpAndPort(format!("{host}:{port}"))
        }
        addr => addr,
    };

    Some((addr, password))
}
