//! Fixer ordering.
//!
//! Higher priorities run first. Rules from the wider PHP fixer ecosystem that tidyphp does not ship are still
//! ordered against, through the [`PeerFixer`] table, so a rule's priority stays comparable with theirs.

use std::fmt;

/// Execution priority. Higher runs earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Run before every peer: one above the highest peer priority.
    pub fn before(peers: &[PeerFixer]) -> Self {
        peers
            .iter()
            .map(|peer| peer.priority().0)
            .max()
            .map_or(Priority::default(), |max| Priority(max.saturating_add(1)))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// External fixers that rules order themselves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerFixer {
    /// Spacing between class members.
    ClassAttributesSeparation,
    /// Removal of empty doc blocks.
    NoEmptyPhpdoc,
    /// Collapsing of blank lines.
    NoExtraBlankLines,
}

struct PeerInfo {
    id: PeerFixer,
    name: &'static str,
    priority: i32,
}

const PEERS: &[PeerInfo] = &[
    PeerInfo {
        id: PeerFixer::ClassAttributesSeparation,
        name: "class_attributes_separation",
        priority: 55,
    },
    PeerInfo {
        id: PeerFixer::NoEmptyPhpdoc,
        name: "no_empty_phpdoc",
        priority: 3,
    },
    PeerInfo {
        id: PeerFixer::NoExtraBlankLines,
        name: "no_extra_blank_lines",
        priority: -20,
    },
];

impl PeerFixer {
    fn info(self) -> &'static PeerInfo {
        PEERS
            .iter()
            .find(|p| p.id == self)
            .expect("INVARIANT: every peer fixer has a table entry")
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn priority(self) -> Priority {
        Priority(self.info().priority)
    }
}
