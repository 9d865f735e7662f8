use crate::{
    commands::{IdleEvent, IdleEvents, Song, Status},
    errors::MpdError,
    proto_client::{ProtoClient, SocketClient},
};

type MpdResult<T> = Result<T, MpdError>;

/// One `send_*` per wire command. Writing and reading are split so a caller
/// can park a connection inside `idle` without committing to a blocking read
/// right away.
pub trait MpdCommand {
    fn send_password(&mut self, password: &str) -> MpdResult<()>;
    fn send_binary_limit(&mut self, limit: u64) -> MpdResult<()>;
    fn send_ping(&mut self) -> MpdResult<()>;
    fn send_get_current_song(&mut self) -> MpdResult<()>;
    fn send_get_status(&mut self) -> MpdResult<()>;
    fn send_idle(&mut self, subsystem: Option<IdleEvent>) -> MpdResult<()>;
    fn send_noidle(&mut self) -> MpdResult<()>;
    fn send_albumart(&mut self, path: &str) -> MpdResult<String>;
    fn send_read_picture(&mut self, path: &str) -> MpdResult<String>;
}

impl<T: SocketClient> MpdCommand for T {
    fn send_password(&mut self, password: &str) -> MpdResult<()> {
        self.execute(&format!("password {}", password.quote_and_escape()))
    }

    fn send_binary_limit(&mut self, limit: u64) -> MpdResult<()> {
        self.execute(&format!("binarylimit {limit}"))
    }

    fn send_ping(&mut self) -> MpdResult<()> {
        self.execute("ping")
    }

    fn send_get_current_song(&mut self) -> MpdResult<()> {
        self.execute("currentsong")
    }

    fn send_get_status(&mut self) -> MpdResult<()> {
        self.execute("status")
    }

    fn send_idle(&mut self, subsystem: Option<IdleEvent>) -> MpdResult<()> {
        if let Some(subsystem) = subsystem {
            self.execute(&format!("idle {subsystem}"))
        } else {
            self.execute("idle")
        }
    }

    fn send_noidle(&mut self) -> MpdResult<()> {
        self.execute("noidle")
    }

    fn send_albumart(&mut self, path: &str) -> MpdResult<String> {
        let cmd = format!("albumart {}", path.quote_and_escape());
        self.execute(&format!("{cmd} 0"))?;
        Ok(cmd)
    }

    fn send_read_picture(&mut self, path: &str) -> MpdResult<String> {
        let cmd = format!("readpicture {}", path.quote_and_escape());
        self.execute(&format!("{cmd} 0"))?;
        Ok(cmd)
    }
}

pub trait MpdClient: Sized {
    fn password(&mut self, password: &str) -> MpdResult<()>;
    fn binary_limit(&mut self, limit: u64) -> MpdResult<()>;
    fn ping(&mut self) -> MpdResult<()>;
    fn get_current_song(&mut self) -> MpdResult<Option<Song>>;
    fn get_status(&mut self) -> MpdResult<Status>;
    /// Blocks until any of the watched subsystems changes.
    fn idle(&mut self, subsystem: Option<IdleEvent>) -> MpdResult<Vec<IdleEvent>>;
    fn noidle(&mut self) -> MpdResult<()>;
    /// Art stored next to the song file (`cover.jpg` and friends).
    fn albumart(&mut self, path: &str) -> MpdResult<Option<Vec<u8>>>;
    /// Art embedded in the song file's tags.
    fn read_picture(&mut self, path: &str) -> MpdResult<Option<Vec<u8>>>;
}

impl<T: SocketClient> MpdClient for T {
    fn password(&mut self, password: &str) -> MpdResult<()> {
        self.send_password(password).and_then(|()| self.read_ok())
    }

    fn binary_limit(&mut self, limit: u64) -> MpdResult<()> {
        self.send_binary_limit(limit).and_then(|()| self.read_ok())
    }

    fn ping(&mut self) -> MpdResult<()> {
        self.send_ping().and_then(|()| self.read_ok())
    }

    fn get_current_song(&mut self) -> MpdResult<Option<Song>> {
        self.send_get_current_song().and_then(|()| self.read_opt_response())
    }

    fn get_status(&mut self) -> MpdResult<Status> {
        self.send_get_status().and_then(|()| self.read_response())
    }

    fn idle(&mut self, subsystem: Option<IdleEvent>) -> MpdResult<Vec<IdleEvent>> {
        self.send_idle(subsystem)
            .and_then(|()| self.read_response::<IdleEvents>())
            .map(|events| events.0)
    }

    fn noidle(&mut self) -> MpdResult<()> {
        self.send_noidle().and_then(|()| self.read_ok())
    }

    fn albumart(&mut self, path: &str) -> MpdResult<Option<Vec<u8>>> {
        self.send_albumart(path).and_then(|cmd| self.read_bin(&cmd))
    }

    fn read_picture(&mut self, path: &str) -> MpdResult<Option<Vec<u8>>> {
        self.send_read_picture(path).and_then(|cmd| self.read_bin(&cmd))
    }
}

pub(crate) trait StrExt {
    fn quote_and_escape(self) -> String;
}

impl StrExt for &str {
    fn quote_and_escape(self) -> String {
        // reserve at least the input len + 2 for surrounding double quotes
        let mut result = String::with_capacity(self.len() + 2);

        result.push('"');
        for c in self.chars() {
            if c == '"' || c == '\\' {
                result.push('\\');
            }
            result.push(c);
        }
        result.push('"');

        result
    }
}
