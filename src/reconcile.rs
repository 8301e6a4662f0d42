//! Post-generation reconciliation: makes the generated rig compatible with
//! the source skeleton's naming, hierarchy, and attachments.

use crate::humanize::disable_stretch;
use crate::mapping::{map_bones, MissingSource};
use crate::prune::{remove_matching, remove_subtrees};
use crate::skeleton::Skeleton;
use crate::tables::{gen_direct_ignored, gen_subtree_ignored, generated_eye, RoleTable, DEFORM_PREFIX};
use crate::Error;
use log::info;

/// Reconciles a freshly generated rig with its source skeleton.
///
/// Steps run in a fixed order: facial and leftover bones are removed first
/// (so removal patterns can never hit renamed bones), deform bones are
/// renamed to the source naming, source bones absent from the rig are
/// attached, the expression block is shared, and stretch is disabled.
/// Idempotent: re-running on an already reconciled rig is a no-op.
pub fn setup_bones(source: &Skeleton, generated: &mut Skeleton, table: &RoleTable) -> Result<(), Error> {
    remove_subtrees(generated, gen_subtree_ignored())?;
    remove_matching(generated, gen_direct_ignored())?;
    rename_deform_bones(source, generated, table)?;
    attach_remaining_bones(source, generated)?;
    if source.expressions.is_some() {
        generated.expressions = source.expressions.clone();
    }
    disable_stretch(generated);
    info!("amended generated rig");
    Ok(())
}

// Deform bones carry a prefixed variant of their template bone's name. Eye
// bones use the organizational prefix and deform only once force-enabled;
// everything else must already be deforming.
fn rename_deform_bones(
    source: &Skeleton,
    generated: &mut Skeleton,
    table: &RoleTable,
) -> Result<(), Error> {
    let candidates: Vec<String> = generated
        .bones()
        .filter(|(_, bone)| {
            bone.name().starts_with(DEFORM_PREFIX) || generated_eye().is_match(bone.name())
        })
        .map(|(_, bone)| bone.name().to_string())
        .collect();

    let mapping = map_bones(&candidates, source, table, MissingSource::Fail)?;
    generated.editing(|generated| {
        for (generated_name, source_name) in &mapping.pairs {
            let id = match generated.find_bone(generated_name) {
                Some(id) => id,
                None => continue,
            };
            if generated_eye().is_match(generated_name) {
                if let Some(bone) = generated.bone_mut(id) {
                    bone.deform = true;
                }
            } else if !generated.bone(id).is_some_and(|bone| bone.deform) {
                return Err(Error::DeformDisabled {
                    bone: generated_name.clone(),
                });
            }
            info!("renaming bone '{generated_name}' to '{source_name}'");
            generated.rename(id, source_name)?;
        }
        Ok(())
    })
}

// Attaches source bones the generator knows nothing about (hair and other
// accessory joints). The source iterates parent before child, so one pass
// carries whole branches over: each bone attaches as soon as its parent is
// present, and roots already in the rig anchor the rest.
fn attach_remaining_bones(source: &Skeleton, generated: &mut Skeleton) -> Result<(), Error> {
    generated.editing(|generated| {
        for (_, source_bone) in source.bones() {
            if generated.has_bone(source_bone.name()) {
                continue;
            }
            let Some(parent_id) = source_bone.parent() else {
                continue;
            };
            let Some(parent_name) = source.bone(parent_id).map(|bone| bone.name()) else {
                continue;
            };
            let Some(generated_parent) = generated.find_bone(parent_name) else {
                continue;
            };

            info!(
                "generating bone '{}' as child of '{parent_name}'",
                source_bone.name()
            );
            let layers = generated
                .bone(generated_parent)
                .map(|bone| bone.layers)
                .unwrap_or_default();
            let id = generated.add_bone(
                source_bone.name(),
                source_bone.head(),
                source_bone.tail(),
                Some(generated_parent),
            )?;
            if let Some(bone) = generated.bone_mut(id) {
                bone.layers = layers;
                bone.deform = source_bone.deform;
            }
        }
        Ok(())
    })
}
