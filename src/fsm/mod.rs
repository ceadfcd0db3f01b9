//! Visibility / ambient-mode state machine.
//!
//! ```text
//!                 Show                    EnterAmbient
//!   ┌────────┐ ─────────▶ ┌───────────────────┐ ─────────▶ ┌────────────────┐
//!   │ Hidden │            │ VisibleInteractive │            │ VisibleAmbient │
//!   └────────┘ ◀───────── └───────────────────┘ ◀───────── └────────────────┘
//!        ▲        Hide                            ExitAmbient        │
//!        └───────────────────────────── Hide ────────────────────────┘
//! ```
//!
//! The face state is derived from two independent inputs held in
//! [`RenderState`]: visibility and display mode.  The platform may flip the
//! mode while the face is hidden; that is recorded and takes effect when the
//! face becomes visible again.  `low_bit_ambient` is an orthogonal rendering
//! flag and never changes the face state.

pub mod context;

use context::{DisplayMode, RenderState};
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all face states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceState {
    Hidden = 0,
    VisibleInteractive = 1,
    VisibleAmbient = 2,
}

impl FaceState {
    /// Total number of states.
    pub const COUNT: usize = 3;

    /// Derive the face state from render state.
    pub fn of(state: &RenderState) -> Self {
        match (state.visible, state.mode) {
            (false, _) => Self::Hidden,
            (true, DisplayMode::Interactive) => Self::VisibleInteractive,
            (true, DisplayMode::Ambient) => Self::VisibleAmbient,
        }
    }

    /// The interactive redraw timer runs only in this state.
    pub fn timer_should_run(self) -> bool {
        self == Self::VisibleInteractive
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Lifecycle inputs delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceInput {
    Show,
    Hide,
    EnterAmbient,
    ExitAmbient,
}

impl FaceInput {
    pub fn visibility(visible: bool) -> Self {
        if visible { Self::Show } else { Self::Hide }
    }

    pub fn ambient(in_ambient: bool) -> Self {
        if in_ambient {
            Self::EnterAmbient
        } else {
            Self::ExitAmbient
        }
    }
}

/// A change of face state caused by one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: FaceState,
    pub to: FaceState,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Apply `input` to `state`.
///
/// Returns `Some` only when the derived [`FaceState`] changed.  Repeating an
/// input is a no-op.
pub fn apply(state: &mut RenderState, input: FaceInput) -> Option<Transition> {
    let from = FaceState::of(state);

    match input {
        FaceInput::Show => state.visible = true,
        FaceInput::Hide => state.visible = false,
        FaceInput::EnterAmbient => state.mode = DisplayMode::Ambient,
        FaceInput::ExitAmbient => state.mode = DisplayMode::Interactive,
    }

    let to = FaceState::of(state);
    if from == to {
        return None;
    }
    info!("Face transition: {:?} -> {:?}", from, to);
    Some(Transition { from, to })
}
