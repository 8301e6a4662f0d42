//! Shared test fixtures: a VRoid-convention source skeleton, a reduced human
//! template, and stub implementations of the external seams.

use crate::pipeline::{AvatarAddon, RigGenerator};
use crate::skeleton::{BoneId, ExpressionSet, LayerMask, Skeleton};
use crate::Error;
use glam::Vec3;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// A VRoid-like source skeleton after bone-name simplification. No
/// UpperChest and no Bust bones, so the optional-role pruning paths run.
pub(crate) fn vroid_source() -> Skeleton {
    let mut source = Skeleton::new("Armature");
    source.world_transform.translation = v(0.0, 0.5, 0.0);
    source.expressions = Some(Arc::new(ExpressionSet {
        name: "Expressions".to_string(),
        presets: vec!["joy".to_string(), "angry".to_string(), "sorrow".to_string()],
    }));

    source
        .editing(|s| {
            let hips = s.add_bone("Hips", v(0.0, 0.0, 1.0), v(0.0, 0.0, 1.15), None)?;
            let spine = s.add_bone("Spine", v(0.0, 0.0, 1.15), v(0.0, 0.0, 1.3), Some(hips))?;
            let chest = s.add_bone("Chest", v(0.0, 0.0, 1.3), v(0.0, 0.0, 1.45), Some(spine))?;
            let neck = s.add_bone("Neck", v(0.0, 0.0, 1.45), v(0.0, 0.0, 1.55), Some(chest))?;
            let head = s.add_bone("Head", v(0.0, 0.0, 1.55), v(0.0, 0.0, 1.75), Some(neck))?;

            for (suffix, sx) in [("_L", 1.0f32), ("_R", -1.0f32)] {
                let shoulder = s.add_bone(
                    format!("Shoulder{suffix}"),
                    v(0.05 * sx, 0.0, 1.4),
                    v(0.15 * sx, 0.0, 1.4),
                    Some(chest),
                )?;
                let upper_arm = s.add_bone(
                    format!("UpperArm{suffix}"),
                    v(0.15 * sx, 0.0, 1.4),
                    v(0.4 * sx, 0.0, 1.4),
                    Some(shoulder),
                )?;
                let lower_arm = s.add_bone(
                    format!("LowerArm{suffix}"),
                    v(0.4 * sx, 0.0, 1.4),
                    v(0.65 * sx, 0.0, 1.4),
                    Some(upper_arm),
                )?;
                let hand = s.add_bone(
                    format!("Hand{suffix}"),
                    v(0.65 * sx, 0.0, 1.4),
                    v(0.75 * sx, 0.0, 1.4),
                    Some(lower_arm),
                )?;
                let thumb1 = s.add_bone(
                    format!("Thumb1{suffix}"),
                    v(0.67 * sx, 0.02, 1.4),
                    v(0.7 * sx, 0.04, 1.4),
                    Some(hand),
                )?;
                s.add_bone(
                    format!("Thumb2{suffix}"),
                    v(0.7 * sx, 0.04, 1.4),
                    v(0.73 * sx, 0.06, 1.4),
                    Some(thumb1),
                )?;
                let index1 = s.add_bone(
                    format!("Index1{suffix}"),
                    v(0.7 * sx, 0.01, 1.4),
                    v(0.75 * sx, 0.01, 1.4),
                    Some(hand),
                )?;
                s.add_bone(
                    format!("Index2{suffix}"),
                    v(0.75 * sx, 0.01, 1.4),
                    v(0.79 * sx, 0.01, 1.4),
                    Some(index1),
                )?;

                let upper_leg = s.add_bone(
                    format!("UpperLeg{suffix}"),
                    v(0.09 * sx, 0.0, 1.0),
                    v(0.09 * sx, 0.0, 0.55),
                    Some(hips),
                )?;
                let lower_leg = s.add_bone(
                    format!("LowerLeg{suffix}"),
                    v(0.09 * sx, 0.0, 0.55),
                    v(0.09 * sx, 0.0, 0.1),
                    Some(upper_leg),
                )?;
                let foot = s.add_bone(
                    format!("Foot{suffix}"),
                    v(0.09 * sx, 0.0, 0.1),
                    v(0.09 * sx, -0.08, 0.02),
                    Some(lower_leg),
                )?;
                s.add_bone(
                    format!("ToeBase{suffix}"),
                    v(0.09 * sx, -0.08, 0.02),
                    v(0.09 * sx, -0.14, 0.02),
                    Some(foot),
                )?;

                s.add_bone(
                    format!("FaceEye{suffix}"),
                    v(0.03 * sx, -0.05, 1.68),
                    v(0.03 * sx, -0.08, 1.68),
                    Some(head),
                )?;
            }

            let hair1 = s.add_bone(
                "HairJoint_1",
                v(0.0, 0.05, 1.75),
                v(0.0, 0.08, 1.85),
                Some(head),
            )?;
            s.add_bone(
                "HairJoint_2",
                v(0.0, 0.08, 1.85),
                v(0.0, 0.1, 1.95),
                Some(hair1),
            )?;
            Ok(())
        })
        .expect("source fixture");

    let ids: Vec<BoneId> = source.bones().map(|(id, _)| id).collect();
    for id in ids {
        if let Some(bone) = source.bone_mut(id) {
            bone.deform = true;
        }
    }
    source
}

/// A reduced human meta-rig template with default (unaligned) geometry:
/// connected spine chain, arms with one finger pair per hand, legs, eyes,
/// breast/pelvis/palm bones, and a facial cluster.
pub(crate) fn meta_template() -> Skeleton {
    let mut template = Skeleton::new("metarig");
    template
        .editing(|s| {
            let spine = s.add_bone("spine", v(0.0, 0.0, 0.9), v(0.0, 0.0, 1.0), None)?;
            let mut prev = spine;
            for (index, name) in [
                "spine.001",
                "spine.002",
                "spine.003",
                "spine.004",
                "spine.005",
                "spine.006",
            ]
            .iter()
            .enumerate()
            {
                let z = 1.0 + 0.1 * index as f32;
                let id = s.add_bone(*name, v(0.0, 0.0, z), v(0.0, 0.0, z + 0.1), Some(prev))?;
                s.set_connected(id, true)?;
                prev = id;
            }
            let chest = s.find_bone("spine.002").expect("chest");
            let head = s.find_bone("spine.006").expect("head");

            s.add_bone("pelvis.L", v(0.0, 0.0, 0.9), v(0.1, 0.1, 0.95), Some(spine))?;
            s.add_bone("pelvis.R", v(0.0, 0.0, 0.9), v(-0.1, 0.1, 0.95), Some(spine))?;

            for (suffix, sx) in [(".L", 1.0f32), (".R", -1.0f32)] {
                let shoulder = s.add_bone(
                    format!("shoulder{suffix}"),
                    v(0.03 * sx, 0.0, 1.2),
                    v(0.12 * sx, 0.0, 1.2),
                    Some(chest),
                )?;
                let upper_arm = s.add_bone(
                    format!("upper_arm{suffix}"),
                    v(0.12 * sx, 0.0, 1.2),
                    v(0.3 * sx, 0.0, 1.2),
                    Some(shoulder),
                )?;
                let forearm = s.add_bone(
                    format!("forearm{suffix}"),
                    v(0.3 * sx, 0.0, 1.2),
                    v(0.5 * sx, 0.0, 1.2),
                    Some(upper_arm),
                )?;
                s.set_connected(forearm, true)?;
                let hand = s.add_bone(
                    format!("hand{suffix}"),
                    v(0.5 * sx, 0.0, 1.2),
                    v(0.58 * sx, 0.0, 1.2),
                    Some(forearm),
                )?;
                s.set_connected(hand, true)?;
                let palm = s.add_bone(
                    format!("palm.01{suffix}"),
                    v(0.52 * sx, 0.01, 1.2),
                    v(0.56 * sx, 0.01, 1.2),
                    Some(hand),
                )?;
                s.add_bone(
                    format!("f_index.01{suffix}"),
                    v(0.56 * sx, 0.01, 1.2),
                    v(0.6 * sx, 0.01, 1.2),
                    Some(palm),
                )?;
                s.add_bone(
                    format!("thumb.01{suffix}"),
                    v(0.52 * sx, 0.02, 1.2),
                    v(0.55 * sx, 0.04, 1.2),
                    Some(hand),
                )?;

                s.add_bone(
                    format!("breast{suffix}"),
                    v(0.08 * sx, -0.05, 1.15),
                    v(0.08 * sx, -0.12, 1.15),
                    Some(chest),
                )?;

                let thigh = s.add_bone(
                    format!("thigh{suffix}"),
                    v(0.08 * sx, 0.0, 0.9),
                    v(0.08 * sx, 0.0, 0.5),
                    Some(spine),
                )?;
                let shin = s.add_bone(
                    format!("shin{suffix}"),
                    v(0.08 * sx, 0.0, 0.5),
                    v(0.08 * sx, 0.0, 0.08),
                    Some(thigh),
                )?;
                s.set_connected(shin, true)?;
                let foot = s.add_bone(
                    format!("foot{suffix}"),
                    v(0.08 * sx, 0.0, 0.08),
                    v(0.08 * sx, -0.07, 0.01),
                    Some(shin),
                )?;
                s.set_connected(foot, true)?;
                let toe = s.add_bone(
                    format!("toe{suffix}"),
                    v(0.08 * sx, -0.07, 0.01),
                    v(0.08 * sx, -0.12, 0.01),
                    Some(foot),
                )?;
                s.set_connected(toe, true)?;

                s.add_bone(
                    format!("eye{suffix}"),
                    v(0.03 * sx, -0.04, 1.62),
                    v(0.03 * sx, -0.06, 1.62),
                    Some(head),
                )?;
            }

            let face = s.add_bone("face", v(0.0, -0.04, 1.6), v(0.0, -0.04, 1.7), Some(head))?;
            let nose = s.add_bone("nose", v(0.0, -0.06, 1.64), v(0.0, -0.07, 1.63), Some(face))?;
            s.add_bone(
                "nose.001",
                v(0.0, -0.07, 1.63),
                v(0.0, -0.07, 1.62),
                Some(nose),
            )?;
            Ok(())
        })
        .expect("template fixture");
    template
}

#[derive(Default)]
pub(crate) struct StubAddon {
    pub calls: usize,
}

impl AvatarAddon for StubAddon {
    fn simplify_bone_names(&mut self, _skeleton: &mut Skeleton) -> Result<(), Error> {
        self.calls += 1;
        Ok(())
    }
}

/// Generator double: spawns the fixture template and generates a rig with
/// `DEF-` copies of every template bone (`ORG-` for eyes, left
/// non-deforming), plus a few control bones carrying stretch parameters.
pub(crate) struct StubGenerator;

impl RigGenerator for StubGenerator {
    fn spawn_template(&mut self) -> Result<Skeleton, Error> {
        Ok(meta_template())
    }

    fn generate(&mut self, template: &Skeleton) -> Result<Skeleton, Error> {
        let mut rig = Skeleton::new("rig");
        rig.world_transform = template.world_transform;
        rig.editing(|rig| {
            let mut generated: HashMap<BoneId, BoneId> = HashMap::new();
            for (id, bone) in template.bones() {
                let eye = bone.name().starts_with("eye");
                let name = if eye {
                    format!("ORG-{}", bone.name())
                } else {
                    format!("DEF-{}", bone.name())
                };
                let parent = bone.parent().and_then(|parent| generated.get(&parent).copied());
                let new = rig.add_bone(name, bone.head(), bone.tail(), parent)?;
                generated.insert(id, new);
                if let Some(new_bone) = rig.bone_mut(new) {
                    new_bone.deform = !eye;
                    new_bone.layers = LayerMask::single(29);
                }
            }

            for name in ["upper_arm_parent.L", "upper_arm_parent.R", "thigh_parent.L"] {
                let id = rig.add_bone(name, v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.1), None)?;
                if let Some(bone) = rig.bone_mut(id) {
                    bone.ik_stretch = Some(1.0);
                }
            }
            rig.add_bone("torso", v(0.0, 0.2, 0.9), v(0.0, 0.2, 1.0), None)?;
            Ok(())
        })?;
        Ok(rig)
    }
}

/// Generator double that always rejects the template.
pub(crate) struct FailingGenerator;

impl RigGenerator for FailingGenerator {
    fn spawn_template(&mut self) -> Result<Skeleton, Error> {
        Ok(meta_template())
    }

    fn generate(&mut self, _template: &Skeleton) -> Result<Skeleton, Error> {
        Err(Error::GenerationFailed {
            message: "bone 'spine.004' is disconnected".to_string(),
        })
    }
}
