//! Panel focus

/// Which panel receives list/editor key routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPanel {
    /// The invoice list on the left.
    #[default]
    List,
    /// The edit view on the right.
    Editor,
}

impl FocusPanel {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::List => Self::Editor,
            Self::Editor => Self::List,
        };
    }

    pub fn is_list(self) -> bool {
        matches!(self, Self::List)
    }

    pub fn is_editor(self) -> bool {
        matches!(self, Self::Editor)
    }
}
