//! Geometric alignment of the template skeleton onto a source skeleton.

use crate::classify::{matches_any, split_direction};
use crate::mapping::BoneMapping;
use crate::skeleton::{Axis, BoneId, Mode, Side, SignedAxis, Skeleton};
use crate::tables::{finger_bones, limb_bones, spine_connect};
use crate::Error;
use log::debug;

/// Copies the source's world transform and mapped rest geometry onto the
/// template, inside one scoped edit acquisition.
///
/// The source must be at rest: posed or transform-applied geometry yields a
/// misaligned template. After placement, connected spine-chain bones are
/// re-welded by toggling their connectivity so a child's head lands on its
/// parent's aligned tail. The whole operation is idempotent for an unchanged
/// source.
pub fn align(template: &mut Skeleton, source: &Skeleton, mapping: &BoneMapping) -> Result<(), Error> {
    if source.mode() != Mode::Posed {
        return Err(Error::NotAtRest {
            skeleton: source.name().to_string(),
        });
    }
    template.world_transform = source.world_transform;
    template.editing(|template| {
        for (template_name, source_name) in &mapping.pairs {
            let template_id = find(template, template_name)?;
            let source_id = find(source, source_name)?;
            let (head, tail) = match source.bone(source_id) {
                Some(bone) => (bone.head(), bone.tail()),
                None => continue,
            };
            debug!("positioning '{template_name}' onto '{source_name}'");
            template.set_head(template_id, head)?;
            template.set_tail(template_id, tail)?;
        }
        reconnect_spine(template)
    })
}

fn find(skeleton: &Skeleton, name: &str) -> Result<BoneId, Error> {
    skeleton.find_bone(name).ok_or_else(|| Error::UnknownBone {
        skeleton: skeleton.name().to_string(),
        name: name.to_string(),
    })
}

// Toggling off and back on makes the weld recompute against the parent's
// new tail. Bones that were never connected are left alone.
fn reconnect_spine(template: &mut Skeleton) -> Result<(), Error> {
    let connected: Vec<BoneId> = template
        .bones()
        .filter(|(_, bone)| bone.connected() && matches_any(bone.name(), spine_connect()))
        .map(|(id, _)| id)
        .collect();
    for id in connected {
        template.set_connected(id, false)?;
        template.set_connected(id, true)?;
    }
    Ok(())
}

/// Amends generation parameters so limbs and fingers bend the right way.
///
/// Limb roots are reduced to a single segment with an `X` bend axis; finger
/// roots get a `Z` primary bend axis, negated on the right side so the bend
/// mirrors anatomically.
pub fn amend_limb_parameters(template: &mut Skeleton) {
    let limbs: Vec<BoneId> = template
        .bones()
        .filter(|(_, bone)| matches_any(bone.name(), limb_bones()))
        .map(|(id, _)| id)
        .collect();
    for id in limbs {
        if let Some(bone) = template.bone_mut(id) {
            debug!("amending limb parameters for '{}'", bone.name());
            bone.params.segments = Some(1);
            bone.params.rotation_axis = Some(Axis::X);
        }
    }

    let fingers: Vec<BoneId> = template
        .bones()
        .filter(|(_, bone)| matches_any(bone.name(), finger_bones()))
        .map(|(id, _)| id)
        .collect();
    for id in fingers {
        if let Some(bone) = template.bone_mut(id) {
            let (_, side) = split_direction(bone.name());
            debug!("amending finger parameters for '{}'", bone.name());
            bone.params.primary_rotation_axis = Some(SignedAxis {
                axis: Axis::Z,
                negative: side == Some(Side::Right),
            });
        }
    }
}
