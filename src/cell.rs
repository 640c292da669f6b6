use std::fmt::{Display, Formatter};

/// Per-cell tag on the mask of a [`WorkBoard`](crate::board::WorkBoard).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Mark {
    #[default]
    Unmarked,
    /// Tentatively assigned. At most one per row and one per column.
    Starred,
    /// Candidate zero found while looking for an augmenting path.
    Primed,
}

impl Mark {
    /// Flips a cell on an augmenting path: stars become unmarked, everything else becomes a star.
    pub(crate) fn flipped(self) -> Self {
        match self {
            Self::Starred => Self::Unmarked,
            _ => Self::Starred,
        }
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmarked => write!(f, " "),
            Self::Starred => write!(f, "*"),
            Self::Primed => write!(f, "'"),
        }
    }
}
