//! Master volume and playback bookkeeping.
//!
//! The [`Mixer`] resource holds the process-wide volume level (1.0 until
//! changed). Audio handles stay owned by the host (often inside a
//! [`Pool`]); the mixer only reads and writes them through the [`Playback`]
//! trait, so whichever audio backend the host uses stays outside this crate.
//!
//! Changing the level never reaches handles implicitly: callers pass every
//! live handle to [`Mixer::set_volume_level`] so they are resynced in one go.

use bevy_ecs::prelude::Resource;
use log::debug;

use crate::pool::Pool;

pub const DEFAULT_VOLUME_LEVEL: f32 = 1.0;

/// Control surface of one playable audio handle.
pub trait Playback {
    /// Playback position in seconds; `0.0` means never started or rewound.
    fn current_time(&self) -> f32;
    fn ended(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Seek back to the start without playing.
    fn rewind(&mut self);
    /// Per-handle volume before the master level. `None` counts as `1.0`;
    /// `Some(0.0)` mutes the handle.
    fn base_volume(&self) -> Option<f32>;
    fn set_volume(&mut self, volume: f32);
    /// Whether [`Mixer::pause_all`] paused this handle.
    fn paused_by_game(&self) -> bool;
    fn set_paused_by_game(&mut self, paused: bool);
}

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Mixer {
    volume_level: f32,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            volume_level: DEFAULT_VOLUME_LEVEL,
        }
    }
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(volume_level: f32) -> Self {
        Self { volume_level }
    }

    pub fn volume_level(&self) -> f32 {
        self.volume_level
    }

    /// Volume a handle with `base` volume should play at.
    pub fn effective_volume(&self, base: Option<f32>) -> f32 {
        base.unwrap_or(1.0) * self.volume_level
    }

    pub fn sync_volume<T: Playback + ?Sized>(&self, handle: &mut T) {
        handle.set_volume(self.effective_volume(handle.base_volume()));
    }

    /// Change the master level and resync every handle in `handles`.
    pub fn set_volume_level<'a, T, I>(&mut self, level: f32, handles: I)
    where
        T: Playback + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        self.volume_level = level;
        let mut count = 0;
        for handle in handles {
            self.sync_volume(handle);
            count += 1;
        }
        debug!("Volume level set to {} ({} handles resynced)", level, count);
    }

    /// Pause every handle that is mid-playback and remember it was us.
    ///
    /// Handles that never started (`current_time == 0`) or already ended are
    /// left alone.
    pub fn pause_all<'a, T, I>(&self, handles: I)
    where
        T: Playback + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        for handle in handles {
            if handle.current_time() == 0.0 || handle.ended() {
                continue;
            }
            handle.pause();
            handle.set_paused_by_game(true);
        }
    }

    /// Resume only the handles paused by [`Mixer::pause_all`].
    pub fn unpause_all<'a, T, I>(&self, handles: I)
    where
        T: Playback + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        for handle in handles {
            if !handle.paused_by_game() {
                continue;
            }
            handle.play();
            handle.set_paused_by_game(false);
        }
    }

    /// Restart `handle` from the beginning at the current volume.
    pub fn replay<T: Playback + ?Sized>(&self, handle: &mut T) {
        self.replay_with(handle, |_| {});
    }

    /// Like [`Mixer::replay`], but `overrides` runs on the rewound handle
    /// first, so a changed base volume is picked up by the resync.
    pub fn replay_with<T, F>(&self, handle: &mut T, overrides: F)
    where
        T: Playback + ?Sized,
        F: FnOnce(&mut T),
    {
        handle.rewind();
        overrides(handle);
        self.sync_volume(handle);
        handle.play();
    }
}

/// Pool of `n` clones of `prototype`, for sounds that may overlap.
///
/// # Panics
///
/// Panics if `n == 0`.
pub fn audio_pool<T: Playback + Clone>(n: usize, prototype: &T) -> Pool<T> {
    Pool::new(n, || prototype.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[derive(Clone, Debug, Default)]
    struct FakeClip {
        time: f32,
        ended: bool,
        playing: bool,
        base: Option<f32>,
        volume: f32,
        paused_by_game: bool,
        plays: u32,
    }

    impl Playback for FakeClip {
        fn current_time(&self) -> f32 {
            self.time
        }
        fn ended(&self) -> bool {
            self.ended
        }
        fn play(&mut self) {
            self.playing = true;
            self.plays += 1;
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn rewind(&mut self) {
            self.time = 0.0;
            self.ended = false;
        }
        fn base_volume(&self) -> Option<f32> {
            self.base
        }
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn paused_by_game(&self) -> bool {
            self.paused_by_game
        }
        fn set_paused_by_game(&mut self, paused: bool) {
            self.paused_by_game = paused;
        }
    }

    #[test]
    fn test_default_level_is_one() {
        assert!(approx_eq(Mixer::new().volume_level(), 1.0));
    }

    #[test]
    fn test_effective_volume_missing_base_counts_as_one() {
        let mixer = Mixer::with_level(0.5);
        assert!(approx_eq(mixer.effective_volume(None), 0.5));
        assert!(approx_eq(mixer.effective_volume(Some(0.4)), 0.2));
    }

    #[test]
    fn test_set_volume_level_resyncs_all_handles() {
        let mut mixer = Mixer::new();
        let mut clips = vec![
            FakeClip::default(),
            FakeClip {
                base: Some(0.5),
                ..Default::default()
            },
        ];
        mixer.set_volume_level(0.8, clips.iter_mut());
        assert!(approx_eq(mixer.volume_level(), 0.8));
        assert!(approx_eq(clips[0].volume, 0.8));
        assert!(approx_eq(clips[1].volume, 0.4));
    }

    #[test]
    fn test_pause_all_skips_idle_and_ended() {
        let mixer = Mixer::new();
        let mut clips = vec![
            FakeClip {
                time: 1.5,
                playing: true,
                ..Default::default()
            },
            FakeClip::default(),
            FakeClip {
                time: 3.0,
                ended: true,
                ..Default::default()
            },
        ];
        mixer.pause_all(clips.iter_mut());
        assert!(!clips[0].playing);
        assert!(clips[0].paused_by_game);
        assert!(!clips[1].paused_by_game);
        assert!(!clips[2].paused_by_game);
    }

    #[test]
    fn test_unpause_all_resumes_only_game_paused() {
        let mixer = Mixer::new();
        let mut clips = vec![
            FakeClip {
                time: 1.5,
                playing: true,
                ..Default::default()
            },
            FakeClip {
                time: 2.0,
                ..Default::default()
            },
        ];
        mixer.pause_all(clips.iter_mut().take(1));
        mixer.unpause_all(clips.iter_mut());
        assert!(clips[0].playing);
        assert!(!clips[0].paused_by_game);
        assert!(!clips[1].playing, "user-paused clip must stay paused");
    }

    #[test]
    fn test_replay_rewinds_syncs_and_plays() {
        let mixer = Mixer::with_level(0.5);
        let mut clip = FakeClip {
            time: 4.0,
            ended: true,
            base: Some(0.6),
            ..Default::default()
        };
        mixer.replay(&mut clip);
        assert!(approx_eq(clip.time, 0.0));
        assert!(approx_eq(clip.volume, 0.3));
        assert!(clip.playing);
        assert_eq!(clip.plays, 1);
    }

    #[test]
    fn test_effective_volume_zero_base_stays_silent() {
        let mixer = Mixer::with_level(0.8);
        assert!(approx_eq(mixer.effective_volume(Some(0.0)), 0.0));
    }

    #[test]
    fn test_replay_with_applies_overrides_before_resync() {
        let mixer = Mixer::with_level(0.5);
        let mut clip = FakeClip {
            time: 2.0,
            base: Some(1.0),
            volume: 0.5,
            ..Default::default()
        };
        mixer.replay_with(&mut clip, |c| {
            assert!(approx_eq(c.time, 0.0), "overrides run after rewind");
            c.base = Some(0.2);
        });
        assert!(approx_eq(clip.volume, 0.1));
        assert!(clip.playing);
        assert_eq!(clip.plays, 1);
        assert_eq!(clip.base, Some(0.2));
    }

    #[test]
    fn test_audio_pool_clones_prototype() {
        let proto = FakeClip {
            base: Some(0.7),
            ..Default::default()
        };
        let mut mixer = Mixer::new();
        let mut pool = audio_pool(3, &proto);
        assert_eq!(pool.len(), 3);
        mixer.set_volume_level(0.5, &mut pool);
        assert!(pool.iter().all(|clip| approx_eq(clip.volume, 0.35)));
        mixer.replay(pool.next());
        assert_eq!(pool.get(0).map(|clip| clip.plays), Some(1));
        assert_eq!(pool.get(1).map(|clip| clip.plays), Some(0));
    }
}
