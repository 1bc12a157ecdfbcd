pub mod reference;
pub mod role;
pub mod rule;
pub mod skeleton;

pub use reference::SerializedBoneReference;
pub use role::{CanonicalRole, RoleMap};
pub use rule::{PathRemapRule, RemapMode};
pub use skeleton::{BoneKind, BoneNode, Skeleton};
