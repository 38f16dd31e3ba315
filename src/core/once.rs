//! The memoized once-value and the future returned by `Notifier::once`.

use crate::error::{NotifierError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Truthiness used when recording the once-value.
///
/// An emission whose payload is falsy is remembered as [`OnceValue::Flag`]
/// rather than as the payload itself. Falsy values are `false`, numeric zero,
/// NaN, the empty string, `()`, `None` and JSON `null`. Collections are
/// always truthy, even when empty.
///
/// For tuple payloads only the first element decides.
pub trait Truthy {
    /// Whether this value counts as a real payload.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_int {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

impl_truthy_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_truthy_float {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != 0.0 && !self.is_nan()
            }
        })*
    };
}

impl_truthy_float!(f32, f64);

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for () {
    fn is_truthy(&self) -> bool {
        false
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for std::sync::Arc<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl Truthy for serde_json::Value {
    fn is_truthy(&self) -> bool {
        use serde_json::Value;
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.is_truthy()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

macro_rules! impl_truthy_tuple {
    ($($name:ident),+) => {
        impl<A: Truthy, $($name),+> Truthy for (A, $($name),+) {
            fn is_truthy(&self) -> bool {
                self.0.is_truthy()
            }
        }
    };
}

impl<A: Truthy> Truthy for (A,) {
    fn is_truthy(&self) -> bool {
        self.0.is_truthy()
    }
}

impl_truthy_tuple!(B);
impl_truthy_tuple!(B, C);
impl_truthy_tuple!(B, C, D);

/// The memoized first value of a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnceValue<T> {
    /// A truthy payload, stored as emitted.
    Value(T),
    /// Something was emitted or seeded, but without a truthy payload.
    Flag,
}

impl<T> OnceValue<T> {
    /// Record a payload, collapsing falsy payloads to [`OnceValue::Flag`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use observer_lite::core::OnceValue;
    ///
    /// assert_eq!(OnceValue::coalesce(&5), OnceValue::Value(5));
    /// assert_eq!(OnceValue::coalesce(&0), OnceValue::Flag);
    /// assert_eq!(OnceValue::<()>::coalesce(&()), OnceValue::Flag);
    /// ```
    pub fn coalesce(payload: &T) -> Self
    where
        T: Truthy + Clone,
    {
        if payload.is_truthy() {
            Self::Value(payload.clone())
        } else {
            Self::Flag
        }
    }

    /// Owned variant of [`coalesce`](Self::coalesce).
    pub fn from_payload(payload: T) -> Self
    where
        T: Truthy,
    {
        if payload.is_truthy() {
            Self::Value(payload)
        } else {
            Self::Flag
        }
    }

    /// The stored payload, if it was truthy.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Flag => None,
        }
    }

    /// Consume and return the stored payload, if it was truthy.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Flag => None,
        }
    }

    /// Whether this is the coalesced `true` marker.
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

enum State<T> {
    Ready(Option<OnceValue<T>>),
    Waiting(oneshot::Receiver<OnceValue<T>>),
}

/// Future returned by [`Notifier::once`](crate::core::Notifier::once).
///
/// Resolves at most once: immediately when the notifier already holds a
/// once-value, otherwise on the next emission. If the listener is removed
/// first (for example by `unsubscribe_all`), it resolves to
/// [`NotifierError::OnceCancelled`].
#[must_use = "futures do nothing unless awaited"]
pub struct OnceFuture<T> {
    state: State<T>,
}

impl<T> OnceFuture<T> {
    pub(crate) fn ready(value: OnceValue<T>) -> Self {
        Self {
            state: State::Ready(Some(value)),
        }
    }

    pub(crate) fn waiting(rx: oneshot::Receiver<OnceValue<T>>) -> Self {
        Self {
            state: State::Waiting(rx),
        }
    }
}

// No pinned projection of `T` is ever created.
impl<T> Unpin for OnceFuture<T> {}

impl<T> Future for OnceFuture<T> {
    type Output = Result<OnceValue<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            State::Ready(value) => match value.take() {
                Some(value) => Poll::Ready(Ok(value)),
                None => panic!("OnceFuture polled after completion"),
            },
            State::Waiting(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(value)) => Poll::Ready(Ok(value)),
                Poll::Ready(Err(_closed)) => Poll::Ready(Err(NotifierError::OnceCancelled)),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
