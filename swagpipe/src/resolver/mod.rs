use anyhow::Result;

pub use dereferencer::Dereferencer;
pub use reference::Reference;

use crate::model::Document;

mod dereferencer;
pub mod reference;

/// Which references a [Resolver] replaces with their targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Policy {
    /// When false, `#/...` references into the same document are left in place and only
    /// references to other documents are followed.
    pub follow_internal: bool,
}

impl Policy {
    pub const EXTERNAL: Policy = Policy {
        follow_internal: false,
    };
    pub const ALL: Policy = Policy {
        follow_internal: true,
    };
}

/// Replaces references within a [Document] with the values they point to.
///
/// After resolving with [Policy::EXTERNAL], no reference in the result may cross a document
/// boundary. After resolving with [Policy::ALL], no reference may remain at all.
pub trait Resolver {
    fn resolve(&self, document: Document, policy: Policy) -> Result<Document>;
}
