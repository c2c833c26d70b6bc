//! Events delivered to the controllers.

/// Keys the controllers react to. Everything else is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One discrete input, already stripped of backend-specific detail.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<E> {
    /// A click that landed on `target`.
    Click { target: E },
    /// A key press whose event target is `target`.
    KeyDown { key: Key, shift: bool, target: E },
    /// Submission intent on `form`.
    Submit { form: E },
    /// The viewport scrolled to this vertical offset.
    Scroll { offset: f64 },
    /// The observed `target` is now intersecting the viewport by `ratio`.
    Intersection { target: E, ratio: f64 },
    /// Periodic tick for timer-driven behaviors.
    Tick,
}

/// Whether the platform default for the event should still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Proceed,
    PreventDefault,
}

impl Outcome {
    pub fn merge(self, other: Outcome) -> Outcome {
        if self == Outcome::PreventDefault || other == Outcome::PreventDefault {
            Outcome::PreventDefault
        } else {
            Outcome::Proceed
        }
    }

    pub fn is_prevented(self) -> bool {
        self == Outcome::PreventDefault
    }
}
