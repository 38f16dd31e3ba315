//! Core notifier types.

mod notifier;
mod once;
mod settings;
mod subscription;

pub use notifier::Notifier;
pub use once::{OnceFuture, OnceValue, Truthy};
pub use settings::NotifierSettings;
pub use subscription::{NotifierId, Subscription, SubscriptionId};
