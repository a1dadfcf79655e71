use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

/// Cooperative cancellation handle for in-flight builds. Watch-style callers
/// cancel the current build before starting the next one; worker tasks check
/// at module boundaries and the pipeline checks between stages, so an
/// abandoned build never emits output.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }

  pub fn reset(&self) {
    self.0.store(false, Ordering::SeqCst);
  }
}

#[test]
fn test_cancel_token() {
  let token = CancelToken::new();
  assert!(!token.is_cancelled());
  token.cancel();
  assert!(token.is_cancelled());
  token.reset();
  assert!(!token.is_cancelled());
}
