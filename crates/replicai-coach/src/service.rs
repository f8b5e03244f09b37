//! Advisory service contract

use futures::future::BoxFuture;

use crate::AdvisoryResult;

/// External text-generation service that looks at a frame and answers
/// with freeform coaching text
///
/// The returned future must own everything it needs: it is moved onto a
/// background task and may outlive the frame that triggered it.
pub trait AdvisoryService: Send + Sync {
    /// Whether the service is configured well enough to be called
    fn is_available(&self) -> bool {
        true
    }

    fn generate(
        &self,
        image: Vec<u8>,
        prompt: String,
    ) -> BoxFuture<'static, AdvisoryResult<String>>;
}
