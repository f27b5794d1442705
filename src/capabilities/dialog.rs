use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Modal alert capability. The shell shows a native dialog and reports back
/// once the user dismisses it, so the core can sequence on the dismissal.
pub struct Dialog<E> {
    context: CapabilityContext<DialogOperation, E>,
}

impl<Ev> Capability<Ev> for Dialog<Ev> {
    type Operation = DialogOperation;
    type MappedSelf<MappedEv> = Dialog<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Dialog::new(self.context.map_event(f))
    }
}

impl<E> Dialog<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<DialogOperation, E>) -> Self {
        Self { context }
    }

    pub fn alert<F>(
        &self,
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
        make_event: F,
    ) where
        F: FnOnce(DialogOutput) -> E + Send + 'static,
        E: Send,
    {
        let operation = DialogOperation::Alert {
            kind,
            title: title.into(),
            message: message.into(),
        };
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context.request_from_shell(operation).await;
            context.update_app(make_event(output));
        });
    }
}

pub type DialogCapability = Dialog<Event>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DialogOperation {
    Alert {
        kind: AlertKind,
        title: String,
        message: String,
    },
}

impl Operation for DialogOperation {
    type Output = DialogOutput;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DialogOutput {
    Dismissed,
}
