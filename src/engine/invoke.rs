//! Invocation layer: every constructor, hook and test body runs through [`guarded`].
//!
//! Returned errors and panics both come back as an [`InvocationError`]. While a call is guarded
//! the process panic hook records the panic site for the current thread instead of printing it;
//! outside of a guarded call it delegates to whatever hook was installed before.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use testcraft_core::{BoxError, InvocationError, MethodDescriptor, Panicked};

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

struct PanicSite {
    location: Option<String>,
    backtrace: Option<String>,
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING.try_with(Cell::get).unwrap_or(false) {
                previous(info);
                return;
            }
            let backtrace = Backtrace::capture();
            let site = PanicSite {
                location: info.location().map(ToString::to_string),
                backtrace: (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string()),
            };
            let _ = LAST_PANIC.try_with(|slot| *slot.borrow_mut() = Some(site));
        }));
    });
}

/// Marks the current thread as capturing for the guard's lifetime.
struct CaptureGuard {
    previous: bool,
}

impl CaptureGuard {
    fn enter() -> Self {
        LAST_PANIC.with(|slot| slot.borrow_mut().take());
        Self {
            previous: CAPTURING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURING.with(|flag| flag.set(self.previous));
    }
}

/// Runs `call`, converting an `Err` or a panic into an [`InvocationError`] for `target`.
pub fn guarded<T>(target: &'static str, call: impl FnOnce() -> Result<T, BoxError>) -> Result<T, InvocationError> {
    install_hook();
    let _capture = CaptureGuard::enter();

    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(InvocationError::new(target, err)),
        Err(payload) => {
            let mut panicked = Panicked::from_payload(payload.as_ref());
            if let Some(site) = LAST_PANIC.with(|slot| slot.borrow_mut().take()) {
                panicked = panicked.with_location(site.location).with_backtrace(site.backtrace);
            }
            Err(InvocationError::new(target, Box::new(panicked)))
        }
    }
}

/// Calls one registered method on a fixture instance.
pub fn invoke(instance: &mut dyn Any, method: &MethodDescriptor) -> Result<(), InvocationError> {
    guarded(method.name, || (method.invoke)(instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use testcraft_core::MethodKind;

    fn bump(instance: &mut dyn Any) -> Result<(), BoxError> {
        let counter = testcraft_core::downcast_fixture::<u32>(instance)?;
        *counter += 1;
        Ok(())
    }

    #[test]
    fn test_guarded_passes_values_through() {
        let value = guarded("answer", || Ok(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_guarded_wraps_returned_errors() {
        let err = guarded::<()>("reader", || Err(io::Error::other("disk gone").into())).unwrap_err();
        assert_eq!(err.target(), "reader");
        assert!(err.root_cause().is::<io::Error>());
        assert_eq!(err.root_cause().to_string(), "disk gone");
    }

    #[test]
    fn test_guarded_converts_panics() {
        let line = line!() + 1;
        let err = guarded::<()>("panicker", || panic!("went {} ways", 2)).unwrap_err();

        let panicked = err.root_cause().downcast_ref::<Panicked>().unwrap();
        assert_eq!(panicked.message(), "went 2 ways");
        let location = panicked.location().unwrap();
        assert!(location.contains("invoke.rs"), "{location}");
        assert!(location.contains(&format!(":{line}:")), "{location}");
    }

    #[test]
    fn test_capture_flag_is_restored() {
        let _ = guarded::<()>("outer", || {
            let _ = guarded::<()>("inner", || panic!("inner"));
            assert!(CAPTURING.with(Cell::get));
            Ok(())
        });
        assert!(!CAPTURING.with(Cell::get));
    }

    #[test]
    fn test_invoke_calls_the_descriptor() {
        let method = MethodDescriptor::new("bump", MethodKind::Test, bump);
        let mut counter = 0_u32;
        invoke(&mut counter, &method).unwrap();
        invoke(&mut counter, &method).unwrap();
        assert_eq!(counter, 2);

        let mut wrong = String::new();
        let err = invoke(&mut wrong, &method).unwrap_err();
        assert_eq!(err.target(), "bump");
        assert!(err.root_cause().is::<testcraft_core::FixtureMismatch>());
    }
}
