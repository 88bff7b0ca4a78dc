use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::ApiError;

/// Run a usecase on the blocking pool.
///
/// The usecase gets a fresh cancellation token. If the request future is
/// dropped while waiting (client went away, server shutting down), the token
/// is cancelled and the in-flight storage call is interrupted.
pub async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce(&CancellationToken) -> Result<T, qna_core::Error> + Send + 'static,
    T: Send + 'static,
{
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let joined = tokio::task::spawn_blocking(move || f(&cancel)).await;
    guard.disarm();

    match joined {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            Err(ApiError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn returns_usecase_result() {
        let value = run_blocking(|_| Ok(7)).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn maps_usecase_errors() {
        let err = run_blocking(|_| Err::<(), _>(qna_core::Error::Forbidden))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[tokio::test]
    async fn dropping_the_future_cancels_the_token() {
        let observed = Arc::new(AtomicBool::new(false));
        let seen = observed.clone();

        let fut = run_blocking(move |cancel| {
            for _ in 0..200 {
                if cancel.is_cancelled() {
                    seen.store(true, Ordering::SeqCst);
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Ok(())
        });

        // Give the blocking task time to start, then abandon the request.
        let _ = tokio::time::timeout(Duration::from_millis(50), fut).await;

        for _ in 0..200 {
            if observed.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(observed.load(Ordering::SeqCst));
    }
}
