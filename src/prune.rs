//! Removal of ignored, replaced, and optional bones.

use crate::classify::{classify, matches_any};
use crate::skeleton::{BoneId, Skeleton};
use crate::tables::{RoleTable, OPTIONAL_ROLES};
use crate::Error;
use log::{debug, warn};
use regex::Regex;

/// Removes every bone matching any pattern. Children of a removed bone
/// survive, reparented to its parent. Returns the removed names.
pub fn remove_matching(skeleton: &mut Skeleton, patterns: &[Regex]) -> Result<Vec<String>, Error> {
    skeleton.editing(|skeleton| {
        let matched: Vec<BoneId> = skeleton
            .bones()
            .filter(|(_, bone)| matches_any(bone.name(), patterns))
            .map(|(id, _)| id)
            .collect();
        let mut removed = Vec::with_capacity(matched.len());
        for id in matched {
            if let Some(bone) = skeleton.bone(id) {
                let name = bone.name().to_string();
                debug!("deleting bone '{name}'");
                skeleton.remove(id)?;
                removed.push(name);
            }
        }
        Ok(removed)
    })
}

/// Removes every bone matching any pattern together with its whole subtree.
/// Siblings of a matched bone are never touched. Returns the removed names.
pub fn remove_subtrees(skeleton: &mut Skeleton, patterns: &[Regex]) -> Result<Vec<String>, Error> {
    skeleton.editing(|skeleton| {
        let matched: Vec<BoneId> = skeleton
            .bones()
            .filter(|(_, bone)| matches_any(bone.name(), patterns))
            .map(|(id, _)| id)
            .collect();
        let mut removed = Vec::new();
        for id in matched {
            // May already be gone as a descendant of an earlier match.
            if skeleton.bone(id).is_none() {
                continue;
            }
            for name in skeleton.remove_subtree(id)? {
                debug!("deleting bone '{name}'");
                removed.push(name);
            }
        }
        Ok(removed)
    })
}

/// Handles template bones the mapper left unmapped: optional roles are
/// dropped, anything else is kept at its default position and reported. A
/// kept bone may still make generation fail downstream.
pub fn prune_unmapped(
    skeleton: &mut Skeleton,
    table: &RoleTable,
    unmapped: &[String],
) -> Result<(), Error> {
    for name in unmapped {
        let entry = classify(table, name)?;
        if OPTIONAL_ROLES.contains(&entry.role) {
            debug!("removing optional bone '{name}'");
            skeleton.editing(|skeleton| {
                if let Some(id) = skeleton.find_bone(name) {
                    skeleton.remove(id)?;
                }
                Ok(())
            })?;
        } else {
            warn!("bone '{name}' has no source counterpart, keeping default position");
        }
    }
    Ok(())
}
