use std::collections::HashMap;

use anyhow::Result;
use image::{DynamicImage, RgbaImage};
use mpdpoke_mpd::commands::{Song, State, Status};
use mpdpoke_shared::string_ext::StringExt;
use tracing::debug;
use zbus::{
    Connection, proxy,
    zvariant::{StructureBuilder, Value},
};

use crate::{
    config::Config,
    watch::{HandlerOutcome, TrackHandler},
};

const APP_NAME: &str = "mpdpoke";

#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Raw pixel descriptor for the `image-data` hint, `(iiibiiay)` on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: i32,
    pub height: i32,
    pub rowstride: i32,
    pub has_alpha: bool,
    pub bits_per_sample: i32,
    pub channels: i32,
    pub data: Vec<u8>,
}

impl ImageData {
    fn from_rgba(image: &RgbaImage) -> Option<Self> {
        let width = i32::try_from(image.width()).ok()?;
        let height = i32::try_from(image.height()).ok()?;

        Some(Self {
            width,
            height,
            rowstride: width.checked_mul(4)?,
            has_alpha: true,
            bits_per_sample: 8,
            channels: 4,
            data: image.as_raw().clone(),
        })
    }
}

impl From<ImageData> for Value<'static> {
    fn from(image: ImageData) -> Self {
        Value::Structure(
            StructureBuilder::new()
                .add_field(image.width)
                .add_field(image.height)
                .add_field(image.rowstride)
                .add_field(image.has_alpha)
                .add_field(image.bits_per_sample)
                .add_field(image.channels)
                .add_field(image.data)
                .build()
                .expect("image-data hint structure has a valid signature"),
        )
    }
}

pub struct TrackNotification {
    pub summary: String,
    pub body: String,
    pub image: Option<ImageData>,
}

/// Decides whether and what to notify for one player event. A track without
/// a title (stopped playback, bare streams) produces nothing.
pub fn build_notification(
    song: &Song,
    status: &Status,
    art: Option<&DynamicImage>,
    config: &Config,
) -> Option<TrackNotification> {
    let title = song.title()?;

    let glyph = match status.state {
        State::Play => Some(config.playing_glyph.as_str()),
        State::Pause => Some(config.paused_glyph.as_str()),
        State::Stop => None,
    };
    let summary = match glyph.filter(|glyph| !glyph.is_empty()) {
        Some(glyph) => format!("{glyph} {title}"),
        None => title.to_string(),
    };

    let mut body = Vec::new();
    if let Some(artist) = song.artist() {
        body.push(artist.escape_markup());
    }
    if let Some(album) = song.album() {
        body.push(format!("<i>{}</i>", album.escape_markup()));
    }

    // Only straight-alpha RGBA maps onto the image-data hint. Other pixel
    // layouts are dropped, not converted.
    let image = art.and_then(|art| match art {
        DynamicImage::ImageRgba8(rgba) => ImageData::from_rgba(rgba),
        _ => {
            debug!("Dropping album art with unsupported pixel format");
            None
        }
    });

    Some(TrackNotification { summary, body: body.join("\n"), image })
}

/// The process-wide notification slot. The first emission creates a bubble,
/// every later one replaces it instead of stacking a new one.
#[derive(Debug, Default)]
pub struct NotificationSlot {
    last_id: Option<u32>,
}

impl NotificationSlot {
    pub fn replaces_id(&self) -> u32 {
        self.last_id.unwrap_or(0)
    }

    pub fn record(&mut self, id: u32) {
        self.last_id = Some(id);
    }
}

pub struct Notifier {
    proxy: NotificationsProxy<'static>,
    slot: NotificationSlot,
    config: Config,
}

impl Notifier {
    pub async fn new(config: Config) -> zbus::Result<Self> {
        let connection = Connection::session().await?;
        let proxy = NotificationsProxy::new(&connection).await?;

        Ok(Self { proxy, slot: NotificationSlot::default(), config })
    }

    pub async fn send(&mut self, notification: &TrackNotification) -> zbus::Result<u32> {
        let mut hints = HashMap::new();
        if let Some(image) = &notification.image {
            hints.insert("image-data", Value::from(image.clone()));
        }

        let expire_timeout =
            i32::try_from(self.config.notification_timeout.as_millis()).unwrap_or(i32::MAX);
        let id = self
            .proxy
            .notify(
                APP_NAME,
                self.slot.replaces_id(),
                &self.config.notification_icon,
                &notification.summary,
                &notification.body,
                Vec::new(),
                hints,
                expire_timeout,
            )
            .await?;
        self.slot.record(id);

        Ok(id)
    }
}

pub struct NotifyHandler {
    notifier: Notifier,
    config: Config,
}

impl NotifyHandler {
    pub fn new(notifier: Notifier, config: Config) -> Self {
        Self { notifier, config }
    }
}

impl TrackHandler for NotifyHandler {
    async fn on_track(
        &mut self,
        song: &Song,
        status: &Status,
        art: Option<&DynamicImage>,
    ) -> Result<HandlerOutcome> {
        let Some(notification) = build_notification(song, status, art, &self.config) else {
            debug!("Current track has no title, nothing to notify");
            return Ok(HandlerOutcome::Continue);
        };

        let id = self.notifier.send(&notification).await?;
        debug!(id, summary = notification.summary.as_str(), "Notification sent");

        Ok(HandlerOutcome::Continue)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use image::{DynamicImage, RgbaImage};
    use mpdpoke_mpd::{
        address::MpdAddress,
        commands::{Song, State, Status},
    };
    use rstest::{fixture, rstest};

    use super::{NotificationSlot, build_notification};
    use crate::config::Config;

    #[fixture]
    fn config() -> Config {
        Config {
            address: MpdAddress::default(),
            password: None,
            keepalive_interval: Duration::from_secs(60),
            notification_timeout: Duration::from_secs(5),
            playing_glyph: "▶".to_string(),
            paused_glyph: "⏸".to_string(),
            notification_icon: "audio-x-generic".to_string(),
        }
    }

    #[fixture]
    fn song() -> Song {
        let mut song = Song { file: "music/track.flac".to_string(), ..Song::default() };
        song.metadata.insert("title".to_string(), "Winter".to_string());
        song.metadata.insert("artist".to_string(), "A & B".to_string());
        song.metadata.insert("album".to_string(), "Seasons <3".to_string());
        song
    }

    fn status(state: State) -> Status {
        Status { state, ..Status::default() }
    }

    #[rstest]
    fn no_title_means_no_notification(config: Config) {
        let song = Song { file: "http://radio.example/stream".to_string(), ..Song::default() };

        assert!(build_notification(&song, &status(State::Play), None, &config).is_none());
    }

    #[rstest]
    fn summary_is_prefixed_with_play_glyph(config: Config, song: Song) {
        let n = build_notification(&song, &status(State::Play), None, &config).unwrap();

        assert_eq!(n.summary, "▶ Winter");
    }

    #[rstest]
    fn summary_is_prefixed_with_pause_glyph(config: Config, song: Song) {
        let n = build_notification(&song, &status(State::Pause), None, &config).unwrap();

        assert_eq!(n.summary, "⏸ Winter");
    }

    #[rstest]
    fn stopped_state_has_no_glyph(config: Config, song: Song) {
        let n = build_notification(&song, &status(State::Stop), None, &config).unwrap();

        assert_eq!(n.summary, "Winter");
    }

    #[rstest]
    fn empty_glyph_falls_back_to_bare_title(mut config: Config, song: Song) {
        config.playing_glyph = String::new();

        let n = build_notification(&song, &status(State::Play), None, &config).unwrap();

        assert_eq!(n.summary, "Winter");
    }

    #[rstest]
    fn body_escapes_artist_and_emphasizes_album(config: Config, song: Song) {
        let n = build_notification(&song, &status(State::Play), None, &config).unwrap();

        assert_eq!(n.body, "A &amp; B\n<i>Seasons &lt;3</i>");
    }

    #[rstest]
    fn body_lines_are_omitted_when_tags_are_absent(config: Config) {
        let mut song = Song::default();
        song.metadata.insert("title".to_string(), "Winter".to_string());
        song.metadata.insert("album".to_string(), "Seasons".to_string());

        let n = build_notification(&song, &status(State::Play), None, &config).unwrap();

        assert_eq!(n.body, "<i>Seasons</i>");
    }

    #[rstest]
    fn rgba_art_becomes_an_image_descriptor(config: Config, song: Song) {
        let art = DynamicImage::ImageRgba8(RgbaImage::new(7, 5));

        let n = build_notification(&song, &status(State::Play), Some(&art), &config).unwrap();
        let image = n.image.unwrap();

        assert_eq!(image.width, 7);
        assert_eq!(image.height, 5);
        assert_eq!(image.rowstride, 28);
        assert_eq!(image.bits_per_sample, 8);
        assert_eq!(image.channels, 4);
        assert!(image.has_alpha);
        assert_eq!(image.data.len(), 7 * 5 * 4);
    }

    #[rstest]
    fn non_rgba_art_is_dropped(config: Config, song: Song) {
        let art = DynamicImage::ImageRgb8(image::RgbImage::new(7, 5));

        let n = build_notification(&song, &status(State::Play), Some(&art), &config).unwrap();

        assert!(n.image.is_none());
    }

    #[test]
    fn slot_creates_then_replaces() {
        let mut slot = NotificationSlot::default();
        assert_eq!(slot.replaces_id(), 0);

        slot.record(42);
        assert_eq!(slot.replaces_id(), 42);

        slot.record(43);
        assert_eq!(slot.replaces_id(), 43);
    }

    #[test]
    fn image_data_serializes_as_structure() {
        let image = super::ImageData {
            width: 2,
            height: 1,
            rowstride: 8,
            has_alpha: true,
            bits_per_sample: 8,
            channels: 4,
            data: vec![0; 8],
        };

        let value = zbus::zvariant::Value::from(image);
        assert_eq!(value.value_signature().to_string(), "(iiibiiay)");
    }
}
