//! The user-facing operations and the seams to the external collaborators.

use crate::align::{align, amend_limb_parameters};
use crate::classify::matches_any;
use crate::humanize::humanize;
use crate::mapping::{map_bones, MissingSource};
use crate::prune::{prune_unmapped, remove_matching};
use crate::reconcile::setup_bones;
use crate::skeleton::{Mode, Skeleton};
use crate::tables::{bones_delete, meta_ignored, RoleTable};
use crate::Error;
use log::{debug, info};

/// Bone-name simplification service of the avatar-format addon, applied to
/// the source before mapping so the role table's source patterns line up.
pub trait AvatarAddon {
    fn simplify_bone_names(&mut self, skeleton: &mut Skeleton) -> Result<(), Error>;
}

/// The external rig-generation engine, treated as a black box. It spawns the
/// canonical human template and turns an aligned, parameter-annotated
/// template into a full control rig. Generation failures propagate
/// unchanged.
pub trait RigGenerator {
    fn spawn_template(&mut self) -> Result<Skeleton, Error>;
    fn generate(&mut self, template: &Skeleton) -> Result<Skeleton, Error>;
}

/// Output of the full pipeline: the aligned template and the reconciled rig.
#[derive(Debug)]
pub struct GeneratedRig {
    pub template: Skeleton,
    pub rig: Skeleton,
}

/// Builds the aligned template for a source skeleton: spawns the canonical
/// template, deletes structurally replaced bones, maps and aligns the rest,
/// prunes what stayed unmapped, and amends limb parameters.
pub fn build_template(
    source: &mut Skeleton,
    addon: &mut impl AvatarAddon,
    generator: &mut impl RigGenerator,
    table: &RoleTable,
) -> Result<Skeleton, Error> {
    check_source(source)?;

    info!("simplifying source bone names");
    addon.simplify_bone_names(source)?;

    info!("creating and positioning template");
    let mut template = generator.spawn_template()?;
    template.set_name(format!("{}.metarig", source.name()));
    remove_matching(&mut template, bones_delete())?;

    let base_bones: Vec<String> = template
        .bones()
        .filter(|(_, bone)| {
            if matches_any(bone.name(), meta_ignored()) {
                debug!("ignoring bone '{}'", bone.name());
                false
            } else {
                true
            }
        })
        .map(|(_, bone)| bone.name().to_string())
        .collect();
    let mapping = map_bones(&base_bones, source, table, MissingSource::Collect)?;

    align(&mut template, source, &mapping)?;
    prune_unmapped(&mut template, table, &mapping.unmapped)?;
    amend_limb_parameters(&mut template);
    info!("template generated");
    Ok(template)
}

/// The full pipeline: template build, external generation, reconciliation,
/// humanization. The generated rig keeps the source's world transform and is
/// named `{source}.rig`.
pub fn generate_rig(
    source: &mut Skeleton,
    addon: &mut impl AvatarAddon,
    generator: &mut impl RigGenerator,
    table: &RoleTable,
) -> Result<GeneratedRig, Error> {
    let template = build_template(source, addon, generator, table)?;
    let mut rig = generator.generate(&template)?;
    rig.set_name(format!("{}.rig", source.name()));
    rig.world_transform = source.world_transform;
    setup_bones(source, &mut rig, table)?;
    humanize(&mut rig);
    Ok(GeneratedRig { template, rig })
}

/// Re-runs reconciliation on an existing generated rig and its source.
/// Idempotent; requires the rig to follow the `.rig` naming convention.
pub fn amend_bones(
    source: &Skeleton,
    generated: &mut Skeleton,
    table: &RoleTable,
) -> Result<(), Error> {
    if !generated.name().ends_with(".rig") {
        return Err(Error::NotAGeneratedRig {
            name: generated.name().to_string(),
        });
    }
    check_source(source)?;
    setup_bones(source, generated, table)
}

fn check_source(source: &Skeleton) -> Result<(), Error> {
    if source.is_empty() {
        return Err(Error::EmptySkeleton {
            skeleton: source.name().to_string(),
        });
    }
    if source.mode() != Mode::Posed {
        return Err(Error::NotAtRest {
            skeleton: source.name().to_string(),
        });
    }
    Ok(())
}
