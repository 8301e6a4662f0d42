//! Pattern tables driving classification, pruning, and parameter fixes.
//!
//! All tables are plain ordered data. Matching is regex *search*: a pattern
//! hits anywhere in the bone name unless it anchors itself. The built-in
//! tables target VRoid-convention sources and the standard human meta-rig
//! template; callers can substitute their own [`RoleTable`] variants.

use crate::Error;
use regex::Regex;
use std::sync::LazyLock;

/// One row of the role table: a canonical role, the pattern locating it in
/// the template skeleton, and the pattern locating it in a source skeleton.
#[derive(Clone, Debug)]
pub struct RoleEntry {
    pub role: &'static str,
    pub template: Regex,
    pub source: Regex,
}

impl RoleEntry {
    pub fn new(role: &'static str, template: &str, source: &str) -> Result<RoleEntry, Error> {
        Ok(RoleEntry {
            role,
            template: compile(template)?,
            source: compile(source)?,
        })
    }
}

/// Priority-ordered role table; earlier entries win, so more specific
/// patterns go before catch-alls.
#[derive(Clone, Debug)]
pub struct RoleTable {
    entries: Vec<RoleEntry>,
}

impl RoleTable {
    pub fn new(entries: Vec<RoleEntry>) -> RoleTable {
        RoleTable { entries }
    }

    pub fn entries(&self) -> &[RoleEntry] {
        &self.entries
    }

    /// The built-in table mapping the human meta-rig template onto
    /// VRoid-convention bone names (post name simplification).
    pub fn vroid() -> &'static RoleTable {
        &VROID
    }
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|err| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

fn builtin(pattern: &str) -> Regex {
    compile(pattern).expect("invalid built-in pattern")
}

fn builtins(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|pattern| builtin(pattern)).collect()
}

// (role, template pattern, source pattern)
const VROID_ROLES: &[(&str, &str, &str)] = &[
    ("upper_arm", "upper_arm", "^UpperArm_[LR]$"),
    ("forearm", "forearm", "^LowerArm_[LR]$"),
    ("shoulder", "shoulder", "^Shoulder"),
    ("thigh", "thigh", "^UpperLeg_[LR]$"),
    ("shin", "shin", "^LowerLeg_[LR]$"),
    // Bust2 is an extension of Bust1 and is attached afterwards instead.
    ("breast", "breast", "^Bust1"),
    ("foot", "foot", "^Foot"),
    ("toe", "toe", "^ToeBase_[LR]$"),
    ("hand", "hand", "^Hand"),
    ("eye", "eye", "^FaceEye_"),
    // Thumb chain; Thumb1 has no template counterpart.
    ("thumb.01", "thumb.01", "^Thumb2"),
    ("thumb.02", "thumb.02", "^Thumb3_[LR]$"),
    ("thumb.03", "thumb.03", "^Thumb3_end"),
    // Index finger.
    ("palm.01", "palm.01", "^Index1"),
    ("index.01", "index.01", "^Index2"),
    ("index.02", "index.02", "^Index3_[LR]$"),
    ("index.03", "index.03", "^Index3_end"),
    // Middle finger.
    ("palm.02", "palm.02", "^Middle1"),
    ("middle.01", "middle.01", "^Middle2"),
    ("middle.02", "middle.02", "^Middle3_[LR]$"),
    ("middle.03", "middle.03", "^Middle3_end"),
    // Ring finger.
    ("palm.03", "palm.03", "^Ring1"),
    ("ring.01", "ring.01", "^Ring2"),
    ("ring.02", "ring.02", "^Ring3_[LR]$"),
    ("ring.03", "ring.03", "^Ring3_end"),
    // Little finger.
    ("palm.04", "palm.04", "^Little1"),
    ("pinky.01", "pinky.01", "^Little2"),
    ("pinky.02", "pinky.02", "^Little3_[LR]$"),
    ("pinky.03", "pinky.03", "^Little3_end"),
    // Spine chain.
    ("spine", "spine$", "^Hips"),
    ("spine.001", "spine.001", "^Spine"),
    ("spine.002", "spine.002", "^Chest"),
    ("spine.003", "spine.003", "^UpperChest"),
    ("spine.004", "spine.004", "^Neck"),
    ("spine.006", "spine.006", "^Head"),
];

static VROID: LazyLock<RoleTable> = LazyLock::new(|| {
    RoleTable::new(
        VROID_ROLES
            .iter()
            .map(|&(role, template, source)| RoleEntry {
                role,
                template: builtin(template),
                source: builtin(source),
            })
            .collect(),
    )
});

// Facial clusters are driven by shape keys instead of bones and are removed
// together with their whole subtrees.
const FACIAL: &[&str] = &[
    "forehead", "temple", "brow", "lid", r"ear\.", "tongue", "chin", "jaw", "cheek", "nose", "lip",
];

/// Template bones excluded from mapping altogether.
pub fn meta_ignored() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        let mut all = FACIAL.to_vec();
        // heel.02 is assumed to sit in the right position by default.
        all.extend(["spine.005", "pelvis", "heel.02", "face", "teeth"]);
        builtins(&all)
    });
    &PATTERNS
}

/// Generated-rig bones removed together with their subtrees.
pub fn gen_subtree_ignored() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        let mut all = FACIAL.to_vec();
        all.push("teeth");
        builtins(&all)
    });
    &PATTERNS
}

/// Generated-rig bones removed individually, keeping their children.
pub fn gen_direct_ignored() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> =
        LazyLock::new(|| builtins(&["spine.005", "pelvis", "face"]));
    &PATTERNS
}

/// Template bones structurally replaced elsewhere, deleted before mapping.
pub fn bones_delete() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> =
        LazyLock::new(|| builtins(&["pelvis", "palm.01", "palm.02", "palm.03", "palm.04"]));
    &PATTERNS
}

/// Limb roots whose generation parameters are amended.
pub fn limb_bones() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| builtins(&["upper_arm", "thigh"]));
    &PATTERNS
}

/// Finger roots whose primary bend axis is amended.
pub fn finger_bones() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        builtins(&[
            "f_pinky.01",
            "f_ring.01",
            "f_middle.01",
            "f_index.01",
            "thumb.01",
        ])
    });
    &PATTERNS
}

/// Spine-chain children re-welded after alignment.
pub fn spine_connect() -> &'static [Regex] {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| builtins(&[r"^spine\."]));
    &PATTERNS
}

/// Generated eye bones carry an organizational prefix and deform only after
/// being force-enabled.
pub fn generated_eye() -> &'static Regex {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| builtin("ORG-eye"));
    &PATTERN
}

/// Prefix of generated bones that deform by convention.
pub const DEFORM_PREFIX: &str = "DEF-";

/// Roles allowed to be absent from a source skeleton; their template bones
/// are dropped instead of warned about.
pub const OPTIONAL_ROLES: &[&str] = &["spine.003", "breast"];

/// Organization layers hidden on a humanized rig.
pub const TWEAK_LAYERS: &[u32] = &[
    4,  // Torso
    9,  // Arm.L
    12, // Arm.R
    15, // Leg.L
    18, // Leg.R
];
