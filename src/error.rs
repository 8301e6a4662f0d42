use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no role found for bone '{bone}'")]
    NoRoleFound { bone: String },

    #[error("bone '{bone}' matches more than one role: '{first}' and '{second}'")]
    AmbiguousRole {
        bone: String,
        first: String,
        second: String,
    },

    #[error("no source bone found for role '{role}' (pattern '{pattern}')")]
    NoSourceBoneFound { role: String, pattern: String },

    #[error("role '{role}' matches more than one source bone: {candidates:?}")]
    AmbiguousSourceBone {
        role: String,
        candidates: Vec<String>,
    },

    #[error("skeleton '{skeleton}' already has a bone named '{name}'")]
    DuplicateBoneName { skeleton: String, name: String },

    #[error("unknown bone '{name}' in skeleton '{skeleton}'")]
    UnknownBone { skeleton: String, name: String },

    #[error("stale bone index {index} in skeleton '{skeleton}'")]
    StaleBone { skeleton: String, index: usize },

    #[error("parenting bone '{bone}' to '{parent}' would create a cycle")]
    CyclicParent { bone: String, parent: String },

    #[error("skeleton '{skeleton}' is not in edit mode")]
    NotEditing { skeleton: String },

    #[error("skeleton '{skeleton}' must be at rest to be read as an alignment source")]
    NotAtRest { skeleton: String },

    #[error("generated bone '{bone}' is expected to deform but has deform disabled")]
    DeformDisabled { bone: String },

    #[error("skeleton '{skeleton}' has no bones")]
    EmptySkeleton { skeleton: String },

    #[error("'{name}' is not a generated rig")]
    NotAGeneratedRig { name: String },

    #[error("rig generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
