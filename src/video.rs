//! Frame adapter: presents a playing video as a periodically refreshed bitmap.
//!
//! [`LiveBitmap`] is a wrapper around one video-backed scene object. It
//! holds the object id, a [`VideoSource`], the scratch buffer frames are
//! copied into, and the handle of the pending per-frame callback. It knows
//! nothing about the DOM: the browser host supplies an `HtmlVideoElement`
//! source and `requestAnimationFrame` handles, tests supply fakes.
//!
//! The refresh loop is driven from outside. Each time the host's frame
//! callback fires it calls [`LiveBitmap::on_frame`], which swaps in a new
//! bitmap at most once per refresh interval and registers the next callback
//! while playback continues. Pending callbacks are cancelled by dropping
//! their handle, so pausing or disposing can never leave one behind.

#[cfg(test)]
#[path = "video_test.rs"]
mod video_test;

use crate::doc::ObjectId;
use crate::error::CanvasError;

/// A decoded, seekable video plus the surfaces its frames are drawn to.
pub trait VideoSource {
    /// Off-screen buffer a frame is copied into before it is presented.
    type Buffer;

    /// Natural `(width, height)` of the video in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Start or resume playback.
    ///
    /// # Errors
    ///
    /// [`CanvasError::Playback`] if the source refuses to play.
    fn play(&mut self) -> Result<(), CanvasError>;

    fn pause(&mut self);

    fn volume(&self) -> f64;

    /// Set the volume; callers pass values already clamped to `[0, 1]`.
    fn set_volume(&mut self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    /// Allocate the scratch buffer.
    ///
    /// # Errors
    ///
    /// [`CanvasError::ContextUnavailable`] if no buffer can be acquired.
    fn create_buffer(&self) -> Result<Self::Buffer, CanvasError>;

    /// Copy the frame currently on screen into `buffer`.
    ///
    /// # Errors
    ///
    /// Propagates drawing failures from the underlying surface.
    fn copy_frame(&self, buffer: &mut Self::Buffer) -> Result<(), CanvasError>;

    /// Make `buffer` the object's visible bitmap.
    ///
    /// # Errors
    ///
    /// Propagates drawing failures from the underlying surface.
    fn present(&mut self, buffer: &Self::Buffer) -> Result<(), CanvasError>;

    /// Release the element, decoded data, and any temporary URL.
    fn release(&mut self);
}

/// Playback lifecycle of a live bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Paused,
    Playing,
    /// Resources released; every further call is a no-op.
    Disposed,
}

/// What a single frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A new bitmap was presented; the object is dirty.
    Swapped,
    /// Too soon since the last swap; nothing changed.
    Skipped,
    /// Playback is not running; the loop has ended.
    Stopped,
}

/// A video-backed bitmap and its refresh loop.
///
/// `H` is the handle of a pending frame callback. Dropping it must cancel
/// the callback.
pub struct LiveBitmap<S: VideoSource, H> {
    id: ObjectId,
    source: S,
    scratch: Option<S::Buffer>,
    frame: Option<H>,
    state: PlaybackState,
    interval_ms: f64,
    last_swap_ms: Option<f64>,
    swaps: u64,
}

impl<S: VideoSource, H> LiveBitmap<S, H> {
    /// Wrap `source` for scene object `id` and present its first frame.
    ///
    /// # Errors
    ///
    /// [`CanvasError::Decode`] if the source reports an empty frame size;
    /// buffer and drawing errors from the source.
    pub fn create(id: ObjectId, mut source: S, interval_ms: f64) -> Result<Self, CanvasError> {
        let (width, height) = source.dimensions();
        if width < 1 || height < 1 {
            source.release();
            return Err(CanvasError::Decode(format!("video reports {width}x{height} frames")));
        }
        let mut scratch = match source.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                source.release();
                return Err(e);
            }
        };
        if let Err(e) = source.copy_frame(&mut scratch).and_then(|()| source.present(&scratch)) {
            source.release();
            return Err(e);
        }
        Ok(Self {
            id,
            source,
            scratch: Some(scratch),
            frame: None,
            state: PlaybackState::Paused,
            interval_ms,
            last_swap_ms: None,
            swaps: 0,
        })
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Number of bitmaps swapped in by the refresh loop.
    #[must_use]
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Whether a frame callback is currently registered.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Start playback and the refresh loop. `request_frame` registers the
    /// first frame callback.
    ///
    /// # Errors
    ///
    /// Playback or scheduling failures; the bitmap stays paused.
    pub fn play(&mut self, request_frame: impl FnOnce() -> Result<H, CanvasError>) -> Result<(), CanvasError> {
        if self.state != PlaybackState::Paused {
            return Ok(());
        }
        self.source.play()?;
        match request_frame() {
            Ok(handle) => {
                self.frame = Some(handle);
                self.state = PlaybackState::Playing;
                Ok(())
            }
            Err(e) => {
                self.source.pause();
                Err(e)
            }
        }
    }

    /// Pause playback and cancel the pending frame callback.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.source.pause();
        self.frame = None;
        self.state = PlaybackState::Paused;
    }

    /// Flip between playing and paused. Returns whether it is now playing.
    ///
    /// # Errors
    ///
    /// See [`play`](Self::play).
    pub fn toggle(&mut self, request_frame: impl FnOnce() -> Result<H, CanvasError>) -> Result<bool, CanvasError> {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(request_frame)?;
        }
        Ok(self.is_playing())
    }

    /// Handle one display-frame callback.
    ///
    /// The fired handle is consumed. While playing, the next callback is
    /// registered through `request_frame`, and a new bitmap is presented if
    /// at least one refresh interval has passed since the previous swap.
    ///
    /// # Errors
    ///
    /// Scheduling failures pause playback. Frame-copy failures are returned
    /// but leave the loop running so the next frame can retry.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        request_frame: impl FnOnce() -> Result<H, CanvasError>,
    ) -> Result<FrameOutcome, CanvasError> {
        self.frame = None;
        if self.state != PlaybackState::Playing {
            return Ok(FrameOutcome::Stopped);
        }
        match request_frame() {
            Ok(handle) => self.frame = Some(handle),
            Err(e) => {
                self.pause();
                return Err(e);
            }
        }
        let due = self.last_swap_ms.map_or(true, |last| now_ms - last >= self.interval_ms);
        if !due {
            return Ok(FrameOutcome::Skipped);
        }
        let Some(scratch) = self.scratch.as_mut() else {
            return Err(CanvasError::ContextUnavailable("video scratch buffer"));
        };
        self.source.copy_frame(scratch)?;
        self.source.present(scratch)?;
        self.last_swap_ms = Some(now_ms);
        self.swaps += 1;
        Ok(FrameOutcome::Swapped)
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.source.volume()
    }

    /// Set the volume, clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            log::warn!("ignoring non-finite volume for video {}", self.id);
            return;
        }
        self.source.set_volume(volume.clamp(0.0, 1.0));
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.source.muted()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.source.set_muted(muted);
    }

    /// Stop playback, cancel the refresh loop, and release the source and
    /// scratch buffer. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.state == PlaybackState::Disposed {
            return;
        }
        self.pause();
        self.frame = None;
        self.source.release();
        self.scratch = None;
        self.state = PlaybackState::Disposed;
        log::debug!("disposed video {} after {} swaps", self.id, self.swaps);
    }
}

impl<S: VideoSource, H> Drop for LiveBitmap<S, H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
