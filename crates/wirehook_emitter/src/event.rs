//! Registered hook records.

use core::fmt;

use crate::callback::Callback;
use crate::emitter::{Emitter, EmitterId, WeakEmitter};
use crate::params::Params;

/// Fields used to construct an [`Event`].
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// Hook name the callback is registered under.
    pub hook: String,
    /// Callback invoked when the hook fires.
    pub callback: Callback,
    /// Emitter owning the registration.
    pub source: WeakEmitter,
    /// Parameters attached at registration time.
    pub params: Params,
}

/// One registration: a hook name, its callback and the emitter that owns it.
///
/// Events are created by registration ([`Emitter::on`], [`Emitter::once`] and
/// the static forms in [`dispatch`](crate::dispatch)) and never change
/// afterwards. The source is held weakly, so an event never keeps its emitter
/// alive.
pub struct Event {
    hook: String,
    callback: Callback,
    source: WeakEmitter,
    params: Params,
}

impl Event {
    /// Creates an event from its configuration. No validation is performed.
    #[must_use]
    pub fn new(config: EventConfig) -> Self {
        let EventConfig {
            hook,
            callback,
            source,
            params,
        } = config;
        Self {
            hook,
            callback,
            source,
            params,
        }
    }

    /// Returns the hook name.
    #[must_use]
    pub fn hook(&self) -> &str {
        &self.hook
    }

    /// Returns the registered callback.
    #[must_use]
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Returns the owning emitter, or `None` if it has been dropped.
    #[must_use]
    pub fn source(&self) -> Option<Emitter> {
        self.source.upgrade()
    }

    /// Returns the owning emitter's id.
    #[must_use]
    pub fn source_id(&self) -> &EmitterId {
        self.source.id()
    }

    /// Returns the parameters attached at registration time.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.hook == other.hook
            && self.callback == other.callback
            && self.source.id() == other.source.id()
            && self.params == other.params
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("hook", &self.hook)
            .field("callback", &self.callback)
            .field("source", self.source.id())
            .field("params", &self.params)
            .finish()
    }
}
