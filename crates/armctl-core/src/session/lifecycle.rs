//! Scoped ownership of the controller connection.

use tracing::{info, warn};

use crate::error::Result;
use crate::motion::MotionBackend;

/// A connected (and optionally enabled) backend.
///
/// Teardown (`disable` then `disconnect`) runs exactly once: either through
/// [`release`](Self::release) or, failing that, when the guard is dropped.
pub struct ConnectedSession<B: MotionBackend> {
    backend: B,
    enabled: bool,
    released: bool,
}

impl<B: MotionBackend> ConnectedSession<B> {
    /// Connects and, if `enable` is set, powers up the arm.
    ///
    /// A failed enable disconnects before returning the error.
    pub fn open(mut backend: B, enable: bool) -> Result<Self> {
        backend.connect()?;
        if enable {
            if let Err(err) = backend.enable() {
                if let Err(disconnect_err) = backend.disconnect() {
                    warn!("disconnect after failed enable also failed: {}", disconnect_err);
                }
                return Err(err);
            }
        }
        info!(enabled = enable, "controller session opened");
        Ok(Self {
            backend,
            enabled: enable,
            released: false,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Disables and disconnects. Later calls are no-ops.
    ///
    /// Both steps are attempted even if disabling fails; the first error wins.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let disabled = if self.enabled {
            self.backend.disable()
        } else {
            Ok(())
        };
        let disconnected = self.backend.disconnect();
        info!("controller session released");
        disabled.and(disconnected)
    }
}

impl<B: MotionBackend> Drop for ConnectedSession<B> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("controller teardown failed: {}", err);
        }
    }
}
