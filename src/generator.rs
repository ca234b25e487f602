//! Remote-first icon generation with a procedural fallback.
//!
//! Two generators share one contract, [`IconGenerator`]. The remote one is
//! consulted first; when it fails for a reason the user cannot act on, the
//! procedural renderer answers instead. Rate-limit and quota errors are the
//! user's to see and are returned unchanged.

use std::future::Future;

use log::{info, warn};

use crate::error::GenerationError;
use crate::icon::{IconSpec, RasterImage};
use crate::renderer::IconRenderer;

/// Produces a working-resolution raster for a spec.
pub trait IconGenerator {
    fn generate(
        &self,
        spec: &IconSpec,
    ) -> impl Future<Output = Result<RasterImage, GenerationError>> + Send;
}

/// Which generator produced an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Remote,
    Procedural,
}

/// A generated raster and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub image: RasterImage,
    pub source: GenerationSource,
}

// ============================================================================
// Procedural
// ============================================================================

/// The local renderer behind the [`IconGenerator`] contract. Never fails.
#[derive(Default)]
pub struct ProceduralGenerator {
    pub renderer: IconRenderer,
}

impl ProceduralGenerator {
    pub fn new(renderer: IconRenderer) -> Self {
        Self { renderer }
    }
}

impl IconGenerator for ProceduralGenerator {
    async fn generate(&self, spec: &IconSpec) -> Result<RasterImage, GenerationError> {
        Ok(self.renderer.render(spec))
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// Maps a non-success HTTP status from the remote service to an error.
pub fn classify_status(status: u16, message: impl Into<String>) -> GenerationError {
    let message = message.into();
    match status {
        429 => GenerationError::RateLimited(message),
        402 => GenerationError::QuotaExceeded(message),
        _ => GenerationError::RemoteGenerationFailed(format!("HTTP {status}: {message}")),
    }
}

/// Tries `remote` (when present), falling back to `procedural`.
///
/// Recoverable remote failures are logged and swallowed. Rate-limit and
/// quota errors propagate without a fallback render.
pub async fn generate_with_fallback<R: IconGenerator>(
    remote: Option<&R>,
    procedural: &ProceduralGenerator,
    spec: &IconSpec,
) -> Result<Generated, GenerationError> {
    if let Some(remote) = remote {
        match remote.generate(spec).await {
            Ok(image) => {
                info!("remote generator answered for {:?}", spec.description);
                return Ok(Generated {
                    image,
                    source: GenerationSource::Remote,
                });
            }
            Err(err) if err.is_recoverable() => {
                warn!("{err}; falling back to the procedural renderer");
            }
            Err(err) => return Err(err),
        }
    }

    let image = procedural.generate(spec).await?;
    Ok(Generated {
        image,
        source: GenerationSource::Procedural,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(Result<RasterImage, GenerationError>);

    impl IconGenerator for Stub {
        async fn generate(&self, _spec: &IconSpec) -> Result<RasterImage, GenerationError> {
            self.0.clone()
        }
    }

    fn spec() -> IconSpec {
        IconSpec::from_hex("heart", "#ef4444", "#ffffff", 64).unwrap()
    }

    #[test]
    fn statuses_are_classified() {
        assert!(matches!(classify_status(429, "slow down"), GenerationError::RateLimited(_)));
        assert!(matches!(classify_status(402, "pay"), GenerationError::QuotaExceeded(_)));
        let other = classify_status(500, "boom");
        assert!(other.is_recoverable());
        assert_eq!(other.to_string(), "remote generation failed: HTTP 500: boom");
    }

    #[tokio::test]
    async fn remote_success_is_used() {
        let remote = Stub(Ok(RasterImage::filled(512, [1, 2, 3, 255]).unwrap()));
        let out = generate_with_fallback(Some(&remote), &ProceduralGenerator::default(), &spec())
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Remote);
        assert_eq!(out.image.pixel(0, 0), [1, 2, 3, 255]);
    }

    #[tokio::test]
    async fn recoverable_failure_falls_back() {
        let remote = Stub(Err(GenerationError::RemoteGenerationFailed("timeout".into())));
        let procedural = ProceduralGenerator::default();
        let out = generate_with_fallback(Some(&remote), &procedural, &spec())
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Procedural);
        assert_eq!(out.image, procedural.renderer.render(&spec()));
    }

    #[tokio::test]
    async fn rate_limit_propagates() {
        let remote = Stub(Err(classify_status(429, "too many requests")));
        let err = generate_with_fallback(Some(&remote), &ProceduralGenerator::default(), &spec())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::RateLimited(_)));
        assert!(err.to_string().starts_with("Rate limit exceeded."));
    }

    #[tokio::test]
    async fn quota_propagates() {
        let remote = Stub(Err(classify_status(402, "no credits")));
        let err = generate_with_fallback(Some(&remote), &ProceduralGenerator::default(), &spec())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn no_remote_renders_locally() {
        let out = generate_with_fallback::<Stub>(None, &ProceduralGenerator::default(), &spec())
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Procedural);
        assert_eq!(out.image.size(), 512);
    }
}
