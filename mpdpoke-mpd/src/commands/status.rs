use std::time::Duration;

use crate::{
    errors::MpdError,
    from_mpd::{FromMpd, LineHandled},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    pub state: State,
    pub volume: Option<i8>,
    pub elapsed: Duration,
    pub duration: Duration,
    pub playlist_length: u32,
    pub song_position: Option<u32>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum State {
    Play,
    Pause,
    #[default]
    Stop,
}

impl FromMpd for Status {
    fn next_internal(&mut self, key: &str, value: String) -> Result<LineHandled, MpdError> {
        match key {
            "state" => {
                self.state = value
                    .parse()
                    .map_err(|_| MpdError::Parse(format!("Invalid playback state: '{value}'")))?;
            }
            "volume" => self.volume = Some(value.parse()?),
            "elapsed" => self.elapsed = Duration::from_secs_f64(value.parse()?),
            "duration" => self.duration = Duration::from_secs_f64(value.parse()?),
            "playlistlength" => self.playlist_length = value.parse()?,
            "song" => self.song_position = Some(value.parse()?),
            _ => return Ok(LineHandled::No { value }),
        }
        Ok(LineHandled::Yes)
    }
}
