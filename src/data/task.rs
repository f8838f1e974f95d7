use std::future::Future;

use anyhow::Result;
use poll_promise::Promise;

#[cfg(not(target_arch = "wasm32"))]
use {anyhow::Context, std::thread, tokio::runtime::Runtime};

/// Runs one network request off the UI thread. The UI polls the promise each frame.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_request<T, F>(future: F) -> Promise<Result<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let (sender, promise) = Promise::new();
    thread::spawn(move || {
        let result = Runtime::new()
            .context("Failed to create runtime")
            .and_then(|rt| rt.block_on(future));
        sender.send(result);
    });
    promise
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_request<T, F>(future: F) -> Promise<Result<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + 'static,
{
    let (sender, promise) = Promise::new();
    wasm_bindgen_futures::spawn_local(async move {
        sender.send(future.await);
    });
    promise
}

/// Takes the value out of a finished promise, putting a pending one back.
pub fn take_ready<T: Send + 'static>(slot: &mut Option<Promise<T>>) -> Option<T> {
    let promise = slot.take()?;
    match promise.try_take() {
        Ok(value) => Some(value),
        Err(pending) => {
            *slot = Some(pending);
            None
        }
    }
}
