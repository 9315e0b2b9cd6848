/// The grouping core: one host, its settings, and the coordination state
///
/// Behaviour is spread over `router`, `bulk` and `events`, each adding an
/// `impl` block for the part of the job it owns.
use crate::coordination::CoordinationState;
use crate::domain::{GroupKey, grouping_key};
use crate::host::TabHost;
use crate::settings::{PinnedTabPolicy, Settings};
use crate::tab_data::Tab;
use std::rc::Rc;

pub struct Organizer<H> {
    pub(crate) host: H,
    pub(crate) settings: Settings,
    pub(crate) state: Rc<CoordinationState>,
}

impl<H: TabHost> Organizer<H> {
    pub fn new(host: H, settings: Settings) -> Self {
        Self::with_state(host, settings, Rc::new(CoordinationState::new()))
    }

    /// Share coordination state with the caller, e.g. to inspect it in tests
    pub fn with_state(host: H, settings: Settings, state: Rc<CoordinationState>) -> Self {
        Organizer {
            host,
            settings,
            state,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> &CoordinationState {
        &self.state
    }

    /// The key `tab` groups under, or `None` if it is left alone
    pub fn key_for(&self, tab: &Tab) -> Option<GroupKey> {
        if tab.pinned && self.settings.pinned_tabs == PinnedTabPolicy::Skip {
            return None;
        }
        grouping_key(tab.effective_url(), &self.settings.new_tab_title)
    }
}
