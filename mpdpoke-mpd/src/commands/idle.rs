use crate::{
    errors::MpdError,
    from_mpd::{FromMpd, LineHandled},
};

/// A subsystem reported by `idle`. Foreign or future subsystem names land in
/// [`IdleEvent::Unknown`] so the caller can skip them instead of failing the
/// subscription.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum IdleEvent {
    Player,
    Mixer,
    Playlist,
    Options,
    Database,
    Update,
    StoredPlaylist,
    Output,
    Partition,
    Sticker,
    Subscription,
    Message,
    Neighbor,
    Mount,
    #[strum(default)]
    #[strum(to_string = "{0}")]
    Unknown(String),
}

#[derive(Debug, Default)]
pub struct IdleEvents(pub Vec<IdleEvent>);

impl FromMpd for IdleEvents {
    fn next_internal(&mut self, key: &str, value: String) -> Result<LineHandled, MpdError> {
        match key {
            "changed" => self
                .0
                .push(value.parse().map_err(|_| MpdError::Parse(format!("Invalid subsystem: '{value}'")))?),
            _ => return Ok(LineHandled::No { value }),
        }
        Ok(LineHandled::Yes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use test_case::test_case;

    use super::{FromMpd, IdleEvent, IdleEvents};

    #[test_case("player", IdleEvent::Player)]
    #[test_case("mixer", IdleEvent::Mixer)]
    #[test_case("stored_playlist", IdleEvent::StoredPlaylist)]
    #[test_case("shiny_new_subsystem", IdleEvent::Unknown("shiny_new_subsystem".to_string()))]
    fn parses_subsystem_name(input: &str, expected: IdleEvent) {
        assert_eq!(input.parse::<IdleEvent>().unwrap(), expected);
    }

    #[test]
    fn round_trips_names() {
        assert_eq!(IdleEvent::StoredPlaylist.to_string(), "stored_playlist");
        assert_eq!(IdleEvent::Unknown("whatever".to_string()).to_string(), "whatever");
    }

    #[test]
    fn accumulates_changed_lines() {
        let mut events = IdleEvents::default();
        events.next("changed: player").unwrap();
        events.next("changed: mixer").unwrap();

        assert_eq!(events.0, vec![IdleEvent::Player, IdleEvent::Mixer]);
    }
}
