use std::fmt;

/// Deployment-generation lifecycle. Transitions only move forward:
/// `installing -> installed -> activating -> active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    #[default]
    Installing,
    Installed,
    Activating,
    Active,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Active => "active",
        }
    }

    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        matches!(
            (self, next),
            (Self::Installing, Self::Installed)
                | (Self::Installed, Self::Activating)
                | (Self::Activating, Self::Active)
        )
    }

    /// Requests are only intercepted once the generation is active.
    pub fn intercepts(&self) -> bool {
        *self == Self::Active
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
