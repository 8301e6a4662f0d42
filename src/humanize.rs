//! Final presentation and animation-safety tweaks for a generated rig.

use crate::skeleton::{BoneId, Skeleton};
use crate::tables::TWEAK_LAYERS;
use log::debug;

/// Hides the tweak organization layers and disables elastic stretching.
/// Idempotent; missing data is skipped silently.
pub fn humanize(rig: &mut Skeleton) {
    for &layer in TWEAK_LAYERS {
        rig.visible_layers.set(layer, false);
    }
    disable_stretch(rig);
}

/// Zeroes the stretch parameter on every bone that defines one. Elastic IK
/// stretching is wrong for rigid avatar limbs.
pub fn disable_stretch(rig: &mut Skeleton) {
    let stretchy: Vec<BoneId> = rig
        .bones()
        .filter(|(_, bone)| bone.ik_stretch.is_some())
        .map(|(id, _)| id)
        .collect();
    for id in stretchy {
        if let Some(bone) = rig.bone_mut(id) {
            debug!("disabling stretching for '{}'", bone.name());
            bone.ik_stretch = Some(0.0);
        }
    }
}
