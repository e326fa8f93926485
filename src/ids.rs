//! Identifiers tying handles to the model that created them.
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one live native model. A new id is drawn whenever a model is
/// created or replaced by an import, which invalidates every older handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    pub(crate) fn fresh() -> Self {
        ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the inner value.
    pub fn inner(self) -> u64 {
        self.0
    }
}

macro_rules! define_ref_type {
    ($name:ident, $what:literal) => {
        #[doc = concat!("Reference to a ", $what, " of a specific model.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            model: ModelId,
            index: usize,
        }

        impl $name {
            pub(crate) fn new(model: ModelId, index: usize) -> Self {
                Self { model, index }
            }

            /// The model this reference belongs to.
            pub fn model(self) -> ModelId {
                self.model
            }

            #[doc = concat!("Position of the ", $what, " in the native model.")]
            pub fn index(self) -> usize {
                self.index
            }
        }
    };
}

define_ref_type!(VarRef, "column");
define_ref_type!(ConstrRef, "row");
