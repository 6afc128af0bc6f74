//! Lifecycle hooks for pooled resources

use crate::Result;

/// A value that can live in a resource pool
///
/// Both hooks are optional. A type that needs neither simply writes
/// `impl Resource for MyType {}`.
pub trait Resource: Send + 'static {
    /// Reset per-use state before the instance goes back to the idle queue.
    ///
    /// A failure here is logged by the pool; the instance is still pooled.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }

    /// Dispose of the instance when its pool shuts down.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<R: Resource + ?Sized> Resource for Box<R> {
    fn release(&mut self) -> Result<()> {
        (**self).release()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
