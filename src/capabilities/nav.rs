use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Navigation requests to the shell. Fire-and-forget: the shell does not
/// report back.
pub struct Nav<E> {
    context: CapabilityContext<NavOperation, E>,
}

impl<Ev> Capability<Ev> for Nav<Ev> {
    type Operation = NavOperation;
    type MappedSelf<MappedEv> = Nav<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Nav::new(self.context.map_event(f))
    }
}

impl<E> Nav<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<NavOperation, E>) -> Self {
        Self { context }
    }

    /// Leave the current screen.
    pub fn pop(&self) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(NavOperation::Pop).await;
        });
    }
}

pub type NavCapability = Nav<Event>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavOperation {
    Pop,
}

impl Operation for NavOperation {
    type Output = ();
}
