//! Audio cues: synthesized background melody and lock sound
//!
//! Everything is generated from sine sources, no asset files. The background
//! melody is an eight-note loop pulsed every 500ms by [`AudioManager::tick`];
//! the pulse only runs while the melody is started, so pausing or ending the
//! game tears the cue down by simply stopping the tick. Audio failures are
//! contained here and never reach engine state.

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::time::{Duration, Instant};

/// The looping background melody: C-D-E-F-G-E-D-C
const MELODY: [f32; 8] = [
    523.25, 587.33, 659.25, 698.46, 783.99, 659.25, 587.33, 523.25,
];

/// Interval between melody notes
const NOTE_INTERVAL: Duration = Duration::from_millis(500);
/// Audible length of one melody note
const NOTE_LENGTH: Duration = Duration::from_millis(400);
/// Lock blip pitch and length
const LOCK_FREQ: f32 = 220.0;
const LOCK_LENGTH: Duration = Duration::from_millis(90);

/// Audio manager for all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_volume: f32,
    sfx_volume: f32,
    bgm_running: bool,
    melody_index: usize,
    last_note: Option<Instant>,
}

impl AudioManager {
    /// Create a new audio manager; None when no output device exists
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_volume: 0.25,
            sfx_volume: 0.5,
            bgm_running: false,
            melody_index: 0,
            last_note: None,
        })
    }

    /// Set BGM volume (0.0 to 1.0)
    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.bgm_volume = volume.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Start the background melody; the first note plays immediately
    pub fn start_bgm(&mut self) {
        if self.bgm_running {
            return;
        }
        self.bgm_running = true;
        self.last_note = None;
    }

    /// Stop the background melody
    pub fn stop_bgm(&mut self) {
        self.bgm_running = false;
        self.last_note = None;
    }

    pub fn bgm_running(&self) -> bool {
        self.bgm_running
    }

    /// Advance the melody; call once per frame
    pub fn tick(&mut self) {
        if !self.bgm_running {
            return;
        }
        let due = self
            .last_note
            .is_none_or(|last| last.elapsed() >= NOTE_INTERVAL);
        if due {
            let freq = MELODY[self.melody_index];
            self.melody_index = (self.melody_index + 1) % MELODY.len();
            self.last_note = Some(Instant::now());
            self.play_tone(freq, NOTE_LENGTH, self.bgm_volume * 0.16);
        }
    }

    /// Play the piece-lock blip
    pub fn play_lock(&self) {
        self.play_tone(LOCK_FREQ, LOCK_LENGTH, self.sfx_volume * 0.3);
    }

    /// Fire-and-forget one enveloped tone on a detached sink
    fn play_tone(&self, freq: f32, length: Duration, gain: f32) {
        if gain <= 0.0 {
            return;
        }
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            return;
        };
        let mut tone = SineWave::new(freq).take_duration(length);
        tone.set_filter_fadeout();
        sink.append(tone.fade_in(Duration::from_millis(50)).amplify(gain));
        sink.detach();
    }
}
