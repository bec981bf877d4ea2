//! Audio playback: the single owned handle behind the play control.
//!
//! [`Player`] holds at most one [`Track`] at a time. Preparing a new track
//! drops the previous one, and dropping a track's sink stops its playback,
//! so "replace the handle" is the only teardown path the controller needs.
//!
//! The output device sits behind the [`AudioOutput`] trait: production code
//! uses [`RodioOutput`], tests use a fake, and `--mute` runs with no output
//! at all (tracks still carry their URL so selection state stays coherent).

use std::io::Cursor;

use thiserror::Error;

/// Errors from the audio output device or decoder.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// No usable output device, or the device rejected a new sink
    #[error("Audio device unavailable: {0}")]
    Device(String),
    /// Downloaded bytes were not a decodable audio stream
    #[error("Could not decode audio stream: {0}")]
    Decode(String),
}

/// One loaded, playable audio resource. Dropping it stops playback.
pub trait Sound {
    fn play(&mut self);
    fn pause(&mut self);
}

/// An audio device that turns downloaded bytes into a paused [`Sound`].
pub trait AudioOutput {
    fn load(&mut self, bytes: Vec<u8>) -> Result<Box<dyn Sound>, PlayerError>;
}

/// `rodio`-backed output. Keeps the OS stream alive for the session.
pub struct RodioOutput {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

impl RodioOutput {
    pub fn new() -> Result<Self, PlayerError> {
        let (stream, handle) =
            rodio::OutputStream::try_default().map_err(|e| PlayerError::Device(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

struct RodioSound {
    sink: rodio::Sink,
}

impl Sound for RodioSound {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, bytes: Vec<u8>) -> Result<Box<dyn Sound>, PlayerError> {
        let sink =
            rodio::Sink::try_new(&self.handle).map_err(|e| PlayerError::Device(e.to_string()))?;
        let source =
            rodio::Decoder::new(Cursor::new(bytes)).map_err(|e| PlayerError::Decode(e.to_string()))?;
        sink.append(source);
        // Prepared, not started — playback begins on the explicit play call
        sink.pause();
        Ok(Box::new(RodioSound { sink }))
    }
}

/// A prepared episode: its enclosure URL, plus the decoded sound once the
/// download has completed and been attached.
pub struct Track {
    url: String,
    sound: Option<Box<dyn Sound>>,
}

/// Owns the at-most-one active audio handle.
pub struct Player {
    output: Option<Box<dyn AudioOutput>>,
    track: Option<Track>,
}

impl Player {
    /// `output = None` runs the player in UI-only mode: tracks are still
    /// prepared and replaced, but nothing is ever audible.
    pub fn new(output: Option<Box<dyn AudioOutput>>) -> Self {
        Self {
            output,
            track: None,
        }
    }

    /// Replaces the current track with a fresh, unattached one bound to
    /// `url`. The previous track (and its sink) is dropped, which stops any
    /// playback in progress.
    pub fn prepare(&mut self, url: &str) {
        if let Some(old) = self.track.take() {
            tracing::debug!(url = %old.url, "Discarding previous track");
        }
        self.track = Some(Track {
            url: url.to_string(),
            sound: None,
        });
    }

    /// Drops the current track without preparing a replacement. Used when
    /// the selected episode has nothing playable.
    pub fn clear(&mut self) {
        self.track = None;
    }

    /// Attaches downloaded audio bytes to the current track.
    ///
    /// Returns `Ok(false)` when there is nothing to attach to — no track
    /// prepared, or no output device. The sound starts paused either way.
    pub fn attach(&mut self, bytes: Vec<u8>) -> Result<bool, PlayerError> {
        let (Some(track), Some(output)) = (self.track.as_mut(), self.output.as_mut()) else {
            return Ok(false);
        };
        track.sound = Some(output.load(bytes)?);
        Ok(true)
    }

    /// Starts the attached sound. No-op when nothing is attached yet; the
    /// controller re-issues play on attach if the play flag is set.
    pub fn play(&mut self) {
        if let Some(sound) = self.track.as_mut().and_then(|t| t.sound.as_mut()) {
            sound.play();
        }
    }

    /// Pauses the attached sound. No-op when nothing is attached.
    pub fn pause(&mut self) {
        if let Some(sound) = self.track.as_mut().and_then(|t| t.sound.as_mut()) {
            sound.pause();
        }
    }

    /// URL of the currently prepared track, if any.
    pub fn current_url(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.url.as_str())
    }

    /// Whether the current track has decoded audio attached.
    pub fn is_attached(&self) -> bool {
        self.track.as_ref().is_some_and(|t| t.sound.is_some())
    }

    /// Whether the player has no output device (`--mute` or device failure).
    pub fn is_muted(&self) -> bool {
        self.output.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fake sound that records play/pause calls and counts drops.
    struct FakeSound {
        log: Arc<Mutex<Vec<&'static str>>>,
        drops: Arc<AtomicUsize>,
    }

    impl Sound for FakeSound {
        fn play(&mut self) {
            self.log.lock().unwrap().push("play");
        }
        fn pause(&mut self) {
            self.log.lock().unwrap().push("pause");
        }
    }

    impl Drop for FakeSound {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeOutput {
        log: Arc<Mutex<Vec<&'static str>>>,
        drops: Arc<AtomicUsize>,
    }

    impl AudioOutput for FakeOutput {
        fn load(&mut self, _bytes: Vec<u8>) -> Result<Box<dyn Sound>, PlayerError> {
            Ok(Box::new(FakeSound {
                log: Arc::clone(&self.log),
                drops: Arc::clone(&self.drops),
            }))
        }
    }

    fn fake_player() -> (Player, Arc<Mutex<Vec<&'static str>>>, Arc<AtomicUsize>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let drops = Arc::new(AtomicUsize::new(0));
        let output = FakeOutput {
            log: Arc::clone(&log),
            drops: Arc::clone(&drops),
        };
        (Player::new(Some(Box::new(output))), log, drops)
    }

    #[test]
    fn test_prepare_binds_url() {
        let (mut player, _, _) = fake_player();
        assert_eq!(player.current_url(), None);

        player.prepare("https://cdn.example.com/ep1.mp3");
        assert_eq!(player.current_url(), Some("https://cdn.example.com/ep1.mp3"));
        assert!(!player.is_attached());
    }

    #[test]
    fn test_prepare_replaces_and_drops_previous_sound() {
        let (mut player, _, drops) = fake_player();

        player.prepare("https://cdn.example.com/ep1.mp3");
        player.attach(vec![0u8; 4]).unwrap();
        assert!(player.is_attached());
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        // Replacing tears down the old sound before the new one exists
        player.prepare("https://cdn.example.com/ep2.mp3");
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert_eq!(player.current_url(), Some("https://cdn.example.com/ep2.mp3"));
        assert!(!player.is_attached());
    }

    #[test]
    fn test_play_pause_reach_attached_sound() {
        let (mut player, log, _) = fake_player();
        player.prepare("url");
        player.attach(Vec::new()).unwrap();

        player.play();
        player.pause();
        assert_eq!(*log.lock().unwrap(), vec!["play", "pause"]);
    }

    #[test]
    fn test_play_without_sound_is_noop() {
        let (mut player, log, _) = fake_player();
        player.play();
        player.pause();
        player.prepare("url");
        player.play(); // prepared but not attached
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_attach_without_track_or_output() {
        let (mut player, _, _) = fake_player();
        assert!(!player.attach(Vec::new()).unwrap());

        let mut muted = Player::new(None);
        muted.prepare("url");
        assert!(!muted.attach(Vec::new()).unwrap());
        assert!(muted.is_muted());
        assert_eq!(muted.current_url(), Some("url"));
    }
}
