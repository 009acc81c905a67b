use fleet_api::CarDetail;
use forms::{FieldDefinition, FormMode, WireValue};
use strum::Display;

use crate::notify::Notice;
use crate::store::StoreEvent;

/// Where the console can navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Cars,
    CarCreate,
    CarEdit(String),
}

/// Outcome of a modal popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupResult {
    Confirmed,
    Cancelled,
}

/// Async results of one form session. Every variant carries the session
/// generation; responses for a replaced session are dropped on arrival.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    SchemaLoaded {
        generation: u64,
        fields: Vec<FieldDefinition>,
    },
    DetailLoaded {
        generation: u64,
        detail: CarDetail,
    },
    LoadFailed {
        generation: u64,
        message: String,
    },
    /// Emitted by the form page once local validation passed; the app runs
    /// the matching persistence call.
    SubmitRequested {
        generation: u64,
        mode: FormMode,
        payload: Vec<WireValue>,
    },
    SubmitDone {
        generation: u64,
        result: Result<(), String>,
    },
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    /// Local UI state changed; nothing to do beyond the next frame.
    Update,
    /// Re-run the active page's fetches.
    Refresh,
    /// A rendering failure; swaps in the error view.
    Error(String),
    Navigate(Route),
    /// Ask for confirmation before soft-deleting the given record.
    ConfirmDelete(String),
    ClosePopup,
    PopupResult(PopupResult),
    Notify(Notice),
    Store(StoreEvent),
    Form(FormEvent),
}
