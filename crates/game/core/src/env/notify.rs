//! Combat notifications and the listener registry that consumes them.

use std::fmt;

use tracing::warn;

use crate::combat::AttackContext;
use crate::error::ListenerError;

/// Which notification a listener subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CombatEventKind {
    /// Before an attack executes. Listeners may modify it.
    Attack,
    /// After an attack left one of its participants dead.
    Death,
}

/// A notification with its payload.
#[derive(Debug)]
pub enum CombatEvent<'a> {
    Attack(&'a mut AttackContext),
    Death(&'a AttackContext),
}

impl CombatEvent<'_> {
    pub fn kind(&self) -> CombatEventKind {
        match self {
            Self::Attack(_) => CombatEventKind::Attack,
            Self::Death(_) => CombatEventKind::Death,
        }
    }
}

/// Where encounters send their notifications.
///
/// Implementations must not let one subscriber's failure stop delivery to the
/// others, and must never fail the attack that raised the event.
pub trait NotificationSink {
    fn notify(&mut self, event: CombatEvent<'_>);
}

/// Sink that drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _event: CombatEvent<'_>) {}
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

pub type AttackListener = Box<dyn FnMut(&mut AttackContext) -> Result<(), ListenerError>>;
pub type DeathListener = Box<dyn FnMut(&AttackContext) -> Result<(), ListenerError>>;

enum Listener {
    Attack(AttackListener),
    Death(DeathListener),
}

impl Listener {
    fn kind(&self) -> CombatEventKind {
        match self {
            Self::Attack(_) => CombatEventKind::Attack,
            Self::Death(_) => CombatEventKind::Death,
        }
    }
}

struct Subscription {
    id: ListenerId,
    label: String,
    listener: Listener,
}

/// Listener registry implementing [`NotificationSink`].
///
/// Listeners run in subscription order. A listener that returns an error is
/// logged and skipped; the remaining listeners still run.
#[derive(Default)]
pub struct EventDispatcher {
    subscriptions: Vec<Subscription>,
    next_id: u32,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to attacks before they execute.
    pub fn on_attack(
        &mut self,
        label: impl Into<String>,
        listener: impl FnMut(&mut AttackContext) -> Result<(), ListenerError> + 'static,
    ) -> ListenerId {
        self.subscribe(label.into(), Listener::Attack(Box::new(listener)))
    }

    /// Subscribe to deaths.
    pub fn on_death(
        &mut self,
        label: impl Into<String>,
        listener: impl FnMut(&AttackContext) -> Result<(), ListenerError> + 'static,
    ) -> ListenerId {
        self.subscribe(label.into(), Listener::Death(Box::new(listener)))
    }

    /// Returns true if the listener was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    pub fn listener_count(&self, kind: CombatEventKind) -> usize {
        self.subscriptions
            .iter()
            .filter(|sub| sub.listener.kind() == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Labels of registered listeners, in dispatch order (for debugging).
    pub fn labels(&self) -> impl Iterator<Item = (ListenerId, &str)> + '_ {
        self.subscriptions
            .iter()
            .map(|sub| (sub.id, sub.label.as_str()))
    }

    fn subscribe(&mut self, label: String, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            label,
            listener,
        });
        id
    }
}

impl NotificationSink for EventDispatcher {
    fn notify(&mut self, event: CombatEvent<'_>) {
        let kind = event.kind();
        match event {
            CombatEvent::Attack(ctx) => {
                for sub in &mut self.subscriptions {
                    if let Listener::Attack(listener) = &mut sub.listener {
                        if let Err(error) = listener(&mut *ctx) {
                            report_failure(kind, sub.id, &sub.label, &error);
                        }
                    }
                }
            }
            CombatEvent::Death(ctx) => {
                for sub in &mut self.subscriptions {
                    if let Listener::Death(listener) = &mut sub.listener {
                        if let Err(error) = listener(ctx) {
                            report_failure(kind, sub.id, &sub.label, &error);
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

fn report_failure(kind: CombatEventKind, id: ListenerId, label: &str, error: &ListenerError) {
    warn!(
        target: "lair::notify",
        event = %kind,
        listener = %id,
        label,
        error = %error,
        "Listener failed, continuing"
    );
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::combat::AttackId;
    use crate::engine::EncounterId;
    use crate::state::UnitId;

    fn attack() -> AttackContext {
        let id = AttackId {
            encounter: EncounterId(0),
            seq: 0,
        };
        AttackContext::with_base_damage(id, UnitId(0), UnitId(1), 10)
    }

    #[test]
    fn failing_listener_does_not_stop_dispatch() {
        let mut dispatcher = EventDispatcher::new();
        let calls = Rc::new(Cell::new(0));

        dispatcher.on_attack("broken", |_| Err(ListenerError::new("boom")));
        let seen = Rc::clone(&calls);
        dispatcher.on_attack("counter", move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        let mut ctx = attack();
        dispatcher.notify(CombatEvent::Attack(&mut ctx));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn attack_listeners_can_modify_the_attack() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_attack("double", |ctx| {
            ctx.scale_damage(1.0)
                .map_err(|err| ListenerError::new(err.to_string()))
        });
        dispatcher.on_attack("shield", |ctx| {
            ctx.set_fail(true);
            Ok(())
        });

        let mut ctx = attack();
        dispatcher.notify(CombatEvent::Attack(&mut ctx));
        assert!(ctx.is_failed());
        ctx.set_fail(false);
        assert_eq!(ctx.damage(), 20);
    }

    #[test]
    fn events_reach_only_matching_listeners() {
        let mut dispatcher = EventDispatcher::new();
        let deaths = Rc::new(Cell::new(0));
        let seen = Rc::clone(&deaths);
        dispatcher.on_death("obituary", move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });
        dispatcher.on_attack("noop", |_| Ok(()));

        let mut ctx = attack();
        dispatcher.notify(CombatEvent::Attack(&mut ctx));
        assert_eq!(deaths.get(), 0);
        dispatcher.notify(CombatEvent::Death(&ctx));
        assert_eq!(deaths.get(), 1);
        assert_eq!(dispatcher.listener_count(CombatEventKind::Death), 1);
        assert_eq!(dispatcher.listener_count(CombatEventKind::Attack), 1);
    }

    #[test]
    fn unsubscribe_removes_listener() {
        let mut dispatcher = EventDispatcher::new();
        let id = dispatcher.on_death("once", |_| Ok(()));
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn labels_follow_subscription_order() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_attack("first", |_| Ok(()));
        dispatcher.on_death("second", |_| Ok(()));
        let labels: Vec<&str> = dispatcher.labels().map(|(_, label)| label).collect();
        assert_eq!(labels, ["first", "second"]);
    }
}
