use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;

pub const MAX_KEY_LENGTH: usize = 512;

/// Read-only access to the shell's secure key-value store. Credentials live
/// with the shell (keychain on iOS, keystore on Android); the core asks for
/// them at the moment of use and drops them after.
pub struct Store<E> {
    context: CapabilityContext<StoreOperation, E>,
}

impl<Ev> Capability<Ev> for Store<Ev> {
    type Operation = StoreOperation;
    type MappedSelf<MappedEv> = Store<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Store::new(self.context.map_event(f))
    }
}

impl<E> Store<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<StoreOperation, E>) -> Self {
        Self { context }
    }

    pub fn read<F>(&self, key: impl Into<String>, make_event: F)
    where
        F: FnOnce(StoreResult) -> E + Send + 'static,
        E: Send,
    {
        let key = key.into();
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = match validate_key(&key) {
                Ok(()) => context.request_from_shell(StoreOperation::Read { key }).await,
                Err(e) => Err(e),
            };
            context.update_app(make_event(result));
        });
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidKey {
            reason: "key cannot be empty".to_string(),
        });
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError::InvalidKey {
            reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
        });
    }
    if key.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey {
            reason: "key contains control characters".to_string(),
        });
    }
    Ok(())
}

pub type StoreCapability = Store<Event>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreOperation {
    Read { key: String },
}

impl Operation for StoreOperation {
    type Output = StoreResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreOutput {
    /// `None` when the key has never been written.
    Value(Option<String>),
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid store key: {reason}")]
    InvalidKey { reason: String },

    #[error("store read failed: {reason}")]
    ReadFailed { reason: String },
}

pub type StoreResult = Result<StoreOutput, StoreError>;
