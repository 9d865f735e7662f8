use std::io::{BufRead, Read};

use crate::{errors::MpdError, from_mpd::FromMpd};

type MpdResult<T> = Result<T, MpdError>;

/// Raw socket access the protocol layer is built on. Implemented by
/// [`crate::client::Client`] for both transports.
pub trait SocketClient {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<()>;
    fn read(&mut self) -> &mut impl BufRead;
}

pub trait ProtoClient: SocketClient + Sized {
    fn execute(&mut self, command: &str) -> MpdResult<()>;
    fn read_ok(&mut self) -> MpdResult<()>;
    fn read_response<V: FromMpd>(&mut self) -> MpdResult<V>;
    fn read_opt_response<V: FromMpd>(&mut self) -> MpdResult<Option<V>>;
    fn read_bin(&mut self, command: &str) -> MpdResult<Option<Vec<u8>>>;
}

impl<T: SocketClient> ProtoClient for T {
    fn execute(&mut self, command: &str) -> MpdResult<()> {
        log::trace!(command; "Executing command");
        Ok(self.write([command, "\n"].concat().as_bytes())?)
    }

    fn read_ok(&mut self) -> MpdResult<()> {
        match self.read_line()?.as_str() {
            "OK" => Ok(()),
            line if line.starts_with("ACK") => Err(MpdError::Mpd(line.parse()?)),
            line => Err(MpdError::Generic(format!("Expected 'OK' but got '{line}'"))),
        }
    }

    fn read_response<V: FromMpd>(&mut self) -> MpdResult<V> {
        let mut result = V::default();

        loop {
            let line = self.read_line()?;
            match line.as_str() {
                "OK" => return Ok(result),
                line if line.starts_with("ACK") => return Err(MpdError::Mpd(line.parse()?)),
                line => result.next(line)?,
            }
        }
    }

    fn read_opt_response<V: FromMpd>(&mut self) -> MpdResult<Option<V>> {
        let mut result = V::default();
        let mut has_content = false;

        loop {
            let line = self.read_line()?;
            match line.as_str() {
                "OK" => return Ok(has_content.then_some(result)),
                line if line.starts_with("ACK") => return Err(MpdError::Mpd(line.parse()?)),
                line => {
                    result.next(line)?;
                    has_content = true;
                }
            }
        }
    }

    /// Collects a chunked binary response. MPD caps every response at the
    /// negotiated binary limit, so the command is re-issued with an
    /// increasing offset until the advertised total size is gathered.
    fn read_bin(&mut self, command: &str) -> MpdResult<Option<Vec<u8>>> {
        let mut data = Vec::new();
        let mut total: Option<usize> = None;

        loop {
            let mut chunk_len: Option<usize> = None;
            loop {
                let line = self.read_line()?;
                match line.as_str() {
                    // response carried no binary payload at all
                    "OK" if data.is_empty() => return Ok(None),
                    "OK" => return Ok(Some(data)),
                    line if line.starts_with("ACK") => return Err(MpdError::Mpd(line.parse()?)),
                    line => match line.split_once(": ") {
                        Some(("size", value)) => total = Some(value.parse()?),
                        Some(("type", _)) => {}
                        Some(("binary", value)) => {
                            chunk_len = Some(value.parse()?);
                            break;
                        }
                        _ => {
                            return Err(MpdError::Parse(format!(
                                "Unexpected line in binary response: '{line}'"
                            )));
                        }
                    },
                }
            }

            let Some(chunk_len) = chunk_len else {
                return Err(MpdError::Generic("Binary response without chunk".to_string()));
            };

            // payload plus the trailing newline before the closing OK
            let mut chunk = vec![0; chunk_len + 1];
            self.read().read_exact(&mut chunk)?;
            chunk.pop();
            data.extend_from_slice(&chunk);
            self.read_ok()?;

            match total {
                Some(size) if data.len() < size && chunk_len > 0 => {
                    self.execute(&format!("{command} {}", data.len()))?;
                }
                _ => break,
            }
        }

        Ok(Some(data))
    }
}

trait SocketClientExt: SocketClient {
    fn read_line(&mut self) -> MpdResult<String>;
}

impl<T: SocketClient> SocketClientExt for T {
    fn read_line(&mut self) -> MpdResult<String> {
        let mut line = String::new();

        if self.read().read_line(&mut line)? == 0 {
            return Err(MpdError::ClientClosed);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        log::trace!(line = line.as_str(); "Read line");

        Ok(line)
    }
}
