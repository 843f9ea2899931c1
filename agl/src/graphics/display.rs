/// Display-surface collaborator
///
/// Windowing and screen setup live outside the graphics layer. A backend asks
/// the surface for a screen of a given size and gets back the raw framebuffer
/// memory (software backend) or a format descriptor for an already-current
/// hardware context (hardware backend).

use crate::error::Result;
use super::PixelBuffer;

/// Platform display surface provider
pub trait DisplaySurface: Send {
    /// Create (or resize) the screen.
    ///
    /// Returns a pixel buffer of `width * height` pixels in the negotiated
    /// format. Must fail with `Error::SurfaceUnavailable` when the requested
    /// size/format cannot be provided; callers never retry.
    fn setup_screen(
        &mut self,
        width: u32,
        height: u32,
        fullscreen: bool,
        accelerated: bool,
    ) -> Result<PixelBuffer>;

    /// Present a finished frame.
    ///
    /// Software backends pass their framebuffer; hardware backends pass
    /// `None` and the surface swaps its GL buffers.
    fn present(&mut self, frame: Option<&PixelBuffer>) -> Result<()>;
}
