//! Role-driven correspondence between a template skeleton and a source
//! skeleton.

use crate::classify::{classify, split_direction};
use crate::skeleton::Skeleton;
use crate::tables::RoleTable;
use crate::Error;
use log::debug;

/// Policy for template bones whose role matches no source bone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MissingSource {
    /// Abort the whole mapping (post-generation renaming).
    Fail,
    /// Record the template bone as unmapped and continue (pre-generation
    /// alignment, where the pruner decides what happens to it).
    Collect,
}

/// Ordered (template bone, source bone) correspondences. Each template name
/// appears at most once; `unmapped` lists template bones whose role had no
/// source counterpart under [`MissingSource::Collect`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoneMapping {
    pub pairs: Vec<(String, String)>,
    pub unmapped: Vec<String>,
}

/// Maps each template bone name onto exactly one source bone.
///
/// Every template bone is classified, a left/right direction is derived from
/// its name suffix, and source bones matching the role's source pattern
/// (restricted to the same side) are collected. More than one candidate is
/// always fatal; zero candidates follow the `missing` policy. No partial
/// mapping is returned on failure.
pub fn map_bones<I, S>(
    template_names: I,
    source: &Skeleton,
    table: &RoleTable,
    missing: MissingSource,
) -> Result<BoneMapping, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mapping = BoneMapping::default();
    for template_name in template_names {
        let template_name = template_name.as_ref();
        let entry = classify(table, template_name)?;
        let (_, side) = split_direction(template_name);

        let mut candidates: Vec<&str> = source
            .bones()
            .filter(|(_, bone)| entry.source.is_match(bone.name()))
            .map(|(_, bone)| bone.name())
            .collect();
        if let Some(side) = side {
            candidates.retain(|name| name.contains(side.suffix()));
        }

        match candidates.as_slice() {
            [source_name] => {
                mapping
                    .pairs
                    .push((template_name.to_string(), source_name.to_string()));
            }
            [] => match missing {
                MissingSource::Fail => {
                    return Err(Error::NoSourceBoneFound {
                        role: entry.role.to_string(),
                        pattern: entry.source.as_str().to_string(),
                    });
                }
                MissingSource::Collect => {
                    debug!("no source bone for '{template_name}'");
                    mapping.unmapped.push(template_name.to_string());
                }
            },
            _ => {
                return Err(Error::AmbiguousSourceBone {
                    role: entry.role.to_string(),
                    candidates: candidates.iter().map(|name| name.to_string()).collect(),
                });
            }
        }
    }
    Ok(mapping)
}
