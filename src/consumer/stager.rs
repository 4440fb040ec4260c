//! Asset staging.
//!
//! Resolves an icon handle off the notification path, decodes and scales
//! the bytes, and hands the result back to the render context. A failed
//! stage leaves the previously rendered icon untouched.

use image::imageops::FilterType;
use thiserror::Error;

use crate::consumer::state::StagedIcon;
use crate::transport::{AssetHandle, SessionHandle};

/// Errors that can occur while staging an icon.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The handle did not resolve to a payload.
    #[error("asset could not be resolved")]
    Unresolvable,

    /// The payload was not a decodable image.
    #[error("icon bytes failed to decode: {0}")]
    Decode(#[from] image::ImageError),
}

/// Fetch, decode, and scale one icon.
///
/// Runs entirely off the render context; callers marshal the returned
/// icon back before touching render state. Multiple stages may be in
/// flight at once; the last one to complete wins.
pub async fn stage(
    session: &SessionHandle,
    handle: AssetHandle,
    icon_size: u32,
) -> Result<StagedIcon, AssetError> {
    let bytes = session
        .fetch_asset(handle)
        .await
        .map_err(|_| AssetError::Unresolvable)?;
    let decoded = image::load_from_memory(&bytes)?;
    let scaled = decoded
        .resize_exact(icon_size, icon_size, FilterType::Triangle)
        .to_rgba8();
    Ok(StagedIcon::new(scaled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{encode_png, render_icon, IconKind};
    use crate::transport::pair;

    #[tokio::test]
    async fn staged_icon_is_scaled_to_the_display_size() {
        let (_, (producer, _producer_events), (consumer, _consumer_events)) =
            pair("phone", "watch");
        producer.connect().await.expect("connect");
        let png = encode_png(&render_icon(IconKind::Clear)).expect("encode");
        let handle = producer.create_asset(png).await;

        let icon = stage(&consumer, handle, 48).await.expect("stage");
        assert_eq!(icon.image().dimensions(), (48, 48));
    }

    #[tokio::test]
    async fn unresolvable_handle_fails_without_panicking() {
        let (_, _, (consumer, _consumer_events)) = pair("phone", "watch");
        let err = stage(&consumer, AssetHandle::dangling(), 48)
            .await
            .expect_err("dangling handle must fail");
        assert!(matches!(err, AssetError::Unresolvable));
    }

    #[tokio::test]
    async fn undecodable_bytes_fail_with_decode_error() {
        let (_, (producer, _producer_events), (consumer, _consumer_events)) =
            pair("phone", "watch");
        producer.connect().await.expect("connect");
        let handle = producer.create_asset(b"not a png".to_vec()).await;

        let err = stage(&consumer, handle, 48)
            .await
            .expect_err("garbage bytes must fail");
        assert!(matches!(err, AssetError::Decode(_)));
    }
}
