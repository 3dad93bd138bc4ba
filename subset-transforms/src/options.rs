//! Subset options and where the subset is placed

use serde::{Deserialize, Serialize};
use subset_core::{DatasetId, Error, Result};

use crate::host::OptionInput;

/// User options of the extended transform
///
/// The default matches the option prompt's initial state: children excluded,
/// subset created as a separate dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsetOptions {
    /// Propagate the subset to dependent point tables and partitions
    pub include_children: bool,

    /// Attach the subset under its source instead of as a separate dataset
    pub create_subset_as_child: bool,
}

impl SubsetOptions {
    /// Options of the simple transform: no children, subset under its source
    pub const fn simple() -> Self {
        Self {
            include_children: false,
            create_subset_as_child: true,
        }
    }

    /// Including children forces a separate subset
    #[must_use]
    pub const fn normalized(self) -> Self {
        if self.include_children {
            Self {
                include_children: true,
                create_subset_as_child: false,
            }
        } else {
            self
        }
    }

    /// Placement of a subset of `source` under these options
    pub fn placement(&self, source: DatasetId) -> Placement {
        if self.create_subset_as_child {
            Placement::ChildOf(source)
        } else {
            Placement::Separate
        }
    }
}

/// Where a new subset is attached in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Under the given dataset
    ChildOf(DatasetId),

    /// As a new top-level dataset
    Separate,
}

impl Placement {
    /// Parent handle, if any
    pub fn parent(&self) -> Option<DatasetId> {
        match *self {
            Placement::ChildOf(id) => Some(id),
            Placement::Separate => None,
        }
    }
}

/// Ask `input` for options and normalize the answer
///
/// A cancelled request becomes [`Error::UserCancelled`].
pub fn collect_options<O: OptionInput + ?Sized>(input: &mut O) -> Result<SubsetOptions> {
    input
        .request_options()
        .map(SubsetOptions::normalized)
        .ok_or(Error::UserCancelled)
}
