//! Animation controller
//!
//! Tracks which clip is playing, its local time, loop mode and any
//! cross-fade in progress. The renderer samples the real skeletal clips
//! from this state; the core only needs play/stop/reset/cross-fade and a
//! notification when a one-shot clip reaches its end.

use serde::{Deserialize, Serialize};

/// Clips the player rig provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clip {
    Running,
    Jumping,
    Sliding,
    Stumbling,
}

impl Clip {
    /// The slide clip moves the root forward; that track is stripped so the
    /// avatar does not self-propel.
    pub fn strips_root_motion(self) -> bool {
        matches!(self, Clip::Sliding)
    }
}

/// Clip durations in seconds, as reported by the asset provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipLengths {
    pub running: f32,
    pub jumping: f32,
    pub sliding: f32,
    pub stumbling: f32,
}

impl Default for ClipLengths {
    fn default() -> Self {
        Self {
            running: 0.73,
            jumping: 1.1,
            sliding: 1.2,
            stumbling: 1.6,
        }
    }
}

impl ClipLengths {
    pub fn of(&self, clip: Clip) -> f32 {
        match clip {
            Clip::Running => self.running,
            Clip::Jumping => self.jumping,
            Clip::Sliding => self.sliding,
            Clip::Stumbling => self.stumbling,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let all = [self.running, self.jumping, self.sliding, self.stumbling];
        if all.iter().all(|d| *d > 0.0) {
            Ok(())
        } else {
            Err("clip lengths must be positive")
        }
    }
}

/// How a clip behaves at its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    Repeat,
    /// Play once; `clamp` holds the last frame instead of going to rest
    Once { clamp: bool },
}

/// One clip's playback cursor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub clip: Clip,
    pub time: f32,
    pub mode: LoopMode,
    pub playing: bool,
    pub finished: bool,
}

impl Playback {
    fn start(clip: Clip, mode: LoopMode) -> Self {
        Self {
            clip,
            time: 0.0,
            mode,
            playing: true,
            finished: false,
        }
    }

    /// Returns true on the step the one-shot clip finishes
    fn advance(&mut self, dt: f32, length: f32) -> bool {
        if !self.playing || self.finished {
            return false;
        }
        self.time += dt;
        match self.mode {
            LoopMode::Repeat => {
                if self.time >= length {
                    self.time %= length;
                }
                false
            }
            LoopMode::Once { clamp } => {
                if self.time >= length {
                    self.finished = true;
                    self.time = if clamp { length } else { 0.0 };
                    if !clamp {
                        self.playing = false;
                    }
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Fade {
    from: Playback,
    duration: f32,
    elapsed: f32,
}

/// Animation state for one rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    lengths: ClipLengths,
    active: Playback,
    fade: Option<Fade>,
}

impl Animator {
    /// New controller already looping the running clip
    pub fn new(lengths: ClipLengths) -> Self {
        Self {
            lengths,
            active: Playback::start(Clip::Running, LoopMode::Repeat),
            fade: None,
        }
    }

    /// Clip currently fading in or fully playing
    pub fn current(&self) -> Clip {
        self.active.clip
    }

    pub fn playback(&self) -> &Playback {
        &self.active
    }

    /// Clip being faded out, if a cross-fade is in progress
    pub fn fading_out(&self) -> Option<Clip> {
        self.fade.map(|f| f.from.clip)
    }

    /// Blend weight of the current clip (1.0 once any fade completes)
    pub fn weight(&self) -> f32 {
        match self.fade {
            Some(f) if f.duration > 0.0 => (f.elapsed / f.duration).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Reset and play `clip` immediately, dropping any fade
    pub fn play(&mut self, clip: Clip, mode: LoopMode) {
        self.fade = None;
        self.active = Playback::start(clip, mode);
    }

    /// Stop the current clip where it is
    pub fn stop(&mut self) {
        self.active.playing = false;
        self.fade = None;
    }

    /// Reset `clip` and blend it in over `duration` seconds while the
    /// current clip blends out
    pub fn cross_fade_to(&mut self, clip: Clip, duration: f32, mode: LoopMode) {
        let from = self.active;
        self.active = Playback::start(clip, mode);
        self.fade = if duration > 0.0 {
            Some(Fade {
                from,
                duration,
                elapsed: 0.0,
            })
        } else {
            None
        };
    }

    /// Advance playback; returns the clip whose one-shot play just finished
    pub fn advance(&mut self, dt: f32) -> Option<Clip> {
        if let Some(fade) = self.fade.as_mut() {
            fade.from.advance(dt, self.lengths.of(fade.from.clip));
            fade.elapsed += dt;
            if fade.elapsed >= fade.duration {
                self.fade = None;
            }
        }
        let length = self.lengths.of(self.active.clip);
        if self.active.advance(dt, length) {
            Some(self.active.clip)
        } else {
            None
        }
    }
}
