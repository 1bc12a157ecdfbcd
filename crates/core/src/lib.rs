pub mod error;
pub mod model;
pub mod resolver;
pub mod validation;

pub use error::{CoreError, Result};
pub use model::{
    BoneKind, BoneNode, CanonicalRole, PathRemapRule, RemapMode, RoleMap, SerializedBoneReference,
    Skeleton,
};
pub use resolver::diagnostics::{CorrespondenceMap, HelperRequest, MappingResult, MatchStrategy};
pub use resolver::mapper::{build_map, build_map_with_rules};
pub use resolver::scale::compute_scale_factor;
pub use resolver::serialized::{resolve_reference, resolve_reference_with_rules, resolve_references};
