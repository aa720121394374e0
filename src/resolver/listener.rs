//! Locale change notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::catalog::Catalog;
use crate::locale::Locale;

/// Broadcast to every listener.
#[derive(Debug, Clone)]
pub enum LocaleEvent {
    /// Startup finished; `locale` is the first active locale.
    Ready { locale: Locale },
    /// A switch was applied.
    Changed { locale: Locale, catalog: Arc<Catalog> },
}

impl LocaleEvent {
    pub fn locale(&self) -> &Locale {
        match self {
            Self::Ready { locale } | Self::Changed { locale, .. } => locale,
        }
    }
}

/// Receives locale events synchronously, on the task that caused them.
pub trait LocaleListener: Send + Sync {
    fn on_locale_event(&self, event: &LocaleEvent);
}

impl<F> LocaleListener for F
where
    F: Fn(&LocaleEvent) + Send + Sync,
{
    fn on_locale_event(&self, event: &LocaleEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: RwLock<Vec<(SubscriptionId, Arc<dyn LocaleListener>)>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self, listener: Arc<dyn LocaleListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Deliver in subscription order. The list is snapshotted first so a
    /// listener may subscribe or unsubscribe from inside its callback.
    pub(crate) fn notify(&self, event: &LocaleEvent) {
        let snapshot: Vec<Arc<dyn LocaleListener>> = self
            .entries
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.on_locale_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_delivery_order_and_unsubscribe() {
        let listeners = Listeners::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            listeners.subscribe(Arc::new(move |e: &LocaleEvent| {
                seen.lock().push(format!("first:{}", e.locale()));
            }))
        };
        {
            let seen = Arc::clone(&seen);
            listeners.subscribe(Arc::new(move |e: &LocaleEvent| {
                seen.lock().push(format!("second:{}", e.locale()));
            }));
        }

        listeners.notify(&LocaleEvent::Ready {
            locale: Locale::new("en"),
        });
        assert!(listeners.unsubscribe(first));
        assert!(!listeners.unsubscribe(first));
        listeners.notify(&LocaleEvent::Ready {
            locale: Locale::new("es"),
        });

        assert_eq!(
            *seen.lock(),
            vec!["first:en", "second:en", "second:es"]
        );
        assert_eq!(listeners.len(), 1);
    }
}
