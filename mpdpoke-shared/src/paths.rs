use std::path::{Path, PathBuf};

use crate::env::ENV;

const CONFIG_NAME: &str = "config.ron";
const APP_NAME: &str = "mpdpoke";

pub fn home_dir() -> Option<PathBuf> {
    ENV.var_os("HOME")
        .and_then(|home| if home.is_empty() { None } else { Some(home) })
        .map(PathBuf::from)
}

pub fn config_dir() -> Option<PathBuf> {
    ENV.var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| home_dir().map(|home| home.join(".config")))
}

/// Candidate config file locations, most specific first. A CLI override is
/// the only candidate when given.
pub fn config_paths(cli_arg_config_path: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = cli_arg_config_path {
        return vec![path.to_path_buf()];
    }

    let mut result = Vec::new();
    match config_dir() {
        Some(config_dir) => result.push(config_dir.join(APP_NAME).join(CONFIG_NAME)),
        None => log::warn!("Could not determine configuration directory"),
    }
    result.push(PathBuf::from("/etc").join(APP_NAME).join(CONFIG_NAME));

    result
}

pub mod utils {
    use std::{
        borrow::Cow,
        path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR},
    };

    use crate::env::ENV;

    pub fn tilde_expand(inp: &str) -> Cow<'_, str> {
        let Ok(home) = ENV.var("HOME") else {
            return Cow::Borrowed(inp);
        };
        let home = home.strip_suffix(MAIN_SEPARATOR).unwrap_or(home.as_ref());

        if let Some(inp) = inp.strip_prefix('~') {
            if inp.is_empty() {
                return Cow::Owned(home.to_owned());
            }

            if inp.starts_with(MAIN_SEPARATOR) {
                return Cow::Owned(format!("{home}{inp}"));
            }
        }

        Cow::Borrowed(inp)
    }

    /// Expands `$VAR` path segments. Only whole segments are expanded, a
    /// `$VAR` embedded in the middle of a segment is left alone.
    pub fn env_var_expand(inp: &str) -> String {
        inp.split(MAIN_SEPARATOR)
            .map(|part| {
                if let Some(var_key) = part.strip_prefix('$') {
                    ENV.var(var_key).unwrap_or_else(|_| part.to_string())
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(MAIN_SEPARATOR_STR)
    }
}

#[cfg(test)]
#[cfg(feature = "test-impl")]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::{
        path::PathBuf,
        sync::{LazyLock, Mutex},
    };

    use test_case::test_case;

    use super::{
        config_paths,
        utils::{env_var_expand, tilde_expand},
    };
    use crate::env::ENV;

    static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    #[test_case("~", "/home/u123")]
    #[test_case("~/socket", "/home/u123/socket")]
    #[test_case("~user/socket", "~user/socket")]
    #[test_case("mid/~/dle", "mid/~/dle")]
    #[test_case("/already/absolute", "/already/absolute")]
    fn tilde_expansion(input: &str, expected: &str) {
        let _guard = TEST_LOCK.lock().unwrap();

        ENV.clear();
        ENV.set("HOME", "/home/u123");
        assert_eq!(tilde_expand(input), expected);
    }

    #[test_case("~", "~")]
    #[test_case("~/socket", "~/socket")]
    fn tilde_expansion_without_home(input: &str, expected: &str) {
        let _guard = TEST_LOCK.lock().unwrap();

        ENV.clear();
        assert_eq!(tilde_expand(input), expected);
    }

    #[test_case("$HOME/socket", "/home/u123/socket")]
    #[test_case("pre/$RUN/post", "pre/dir/post")]
    #[test_case("$NOT_SET/socket", "$NOT_SET/socket")]
    #[test_case("plain/path", "plain/path")]
    fn env_var_expansion(input: &str, expected: &str) {
        let _guard = TEST_LOCK.lock().unwrap();

        ENV.clear();
        ENV.set("HOME", "/home/u123");
        ENV.set("RUN", "dir");
        assert_eq!(env_var_expand(input), expected);
    }

    #[test]
    fn cli_override_is_the_only_candidate() {
        let _guard = TEST_LOCK.lock().unwrap();

        ENV.clear();
        ENV.set("HOME", "/home/u123");

        let paths = config_paths(Some(PathBuf::from("/tmp/custom.ron").as_path()));
        assert_eq!(paths, vec![PathBuf::from("/tmp/custom.ron")]);
    }

    #[test]
    fn xdg_config_home_is_preferred() {
        let _guard = TEST_LOCK.lock().unwrap();

        ENV.clear();
        ENV.set("HOME", "/home/u123");
        ENV.set("XDG_CONFIG_HOME", "/home/u123/.cfg");

        let paths = config_paths(None);
        assert_eq!(paths, vec![
            PathBuf::from("/home/u123/.cfg/mpdpoke/config.ron"),
            PathBuf::from("/etc/mpdpoke/config.ron"),
        ]);
    }

    #[test]
    fn falls_back_to_dot_config_and_etc() {
        let _guard = TEST_LOCK.lock().unwrap();

        ENV.clear();
        ENV.set("HOME", "/home/u123");

        let paths = config_paths(None);
        assert_eq!(paths, vec![
            PathBuf::from("/home/u123/.config/mpdpoke/config.ron"),
            PathBuf::from("/etc/mpdpoke/config.ron"),
        ]);
    }
}
