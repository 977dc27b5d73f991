// executor/common.rs

use tokio::runtime::{Handle, RuntimeFlavor};

use crate::domain::error::{EngineError, EngineResult};

/// Drive `fut` to completion from synchronous code.
///
/// Works outside any runtime and from inside either runtime flavor. A
/// current-thread runtime cannot `block_in_place`, so the future runs on a
/// fresh runtime owned by a scoped thread instead.
pub fn run_on_current_thread<F, T>(fut: F) -> EngineResult<T>
where
  F: std::future::Future<Output = EngineResult<T>> + Send,
  T: Send,
{
  match Handle::try_current() {
    Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
      tokio::task::block_in_place(|| handle.block_on(fut))
    }
    Ok(_) => std::thread::scope(|s| {
      s.spawn(move || block_on_fresh_runtime(fut))
        .join()
        .map_err(|_| EngineError::Panic("runtime thread panicked".into()))?
    }),
    Err(_) => block_on_fresh_runtime(fut),
  }
}

fn block_on_fresh_runtime<F, T>(fut: F) -> EngineResult<T>
where
  F: std::future::Future<Output = EngineResult<T>>,
{
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(|e| EngineError::Config(format!("failed to create tokio runtime: {}", e)))?;
  rt.block_on(fut)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_on_current_thread_outside_runtime() {
    let res: EngineResult<()> = run_on_current_thread(async { Ok(()) });
    assert!(res.is_ok());
  }

  #[test]
  fn run_on_current_thread_inside_multithread_runtime() {
    let rt = tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()
      .expect("build rt");
    let res: EngineResult<u8> = rt.block_on(async {
      run_on_current_thread(async { Ok(7) })
    });
    assert_eq!(res.unwrap(), 7);
  }

  #[test]
  fn run_on_current_thread_inside_current_thread_runtime() {
    let rt = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .expect("build rt");
    let res: EngineResult<u8> = rt.block_on(async {
      run_on_current_thread(async {
        let joined = tokio::task::spawn_blocking(|| 7u8).await;
        joined.map_err(|e| EngineError::Panic(e.to_string()))
      })
    });
    assert_eq!(res.unwrap(), 7);
  }
}
