//! Pattern-based classification of bone names into canonical roles.

use crate::skeleton::Side;
use crate::tables::{RoleEntry, RoleTable};
use crate::Error;
use regex::Regex;

/// True when any pattern matches the name.
pub fn matches_any(name: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(name))
}

/// Splits a trailing left/right marker off a bone name. Handles both the
/// template convention (`hand.L`) and the source convention (`Hand_L`).
pub fn split_direction(name: &str) -> (&str, Option<Side>) {
    for (suffix, side) in [
        (".L", Side::Left),
        ("_L", Side::Left),
        (".R", Side::Right),
        ("_R", Side::Right),
    ] {
        if let Some(base) = name.strip_suffix(suffix) {
            return (base, Some(side));
        }
    }
    (name, None)
}

/// Resolves a template bone name to its role-table entry.
///
/// The direction suffix is stripped first, then the table is walked in
/// declaration order and the first matching entry wins. A name matching
/// entries of more than one distinct role is a table configuration error and
/// fails with [`Error::AmbiguousRole`].
pub fn classify<'t>(table: &'t RoleTable, bone_name: &str) -> Result<&'t RoleEntry, Error> {
    let (base, _) = split_direction(bone_name);
    let mut found: Option<&RoleEntry> = None;
    for entry in table.entries() {
        if !entry.template.is_match(base) {
            continue;
        }
        match found {
            None => found = Some(entry),
            Some(first) if first.role == entry.role => {}
            Some(first) => {
                return Err(Error::AmbiguousRole {
                    bone: bone_name.to_string(),
                    first: first.role.to_string(),
                    second: entry.role.to_string(),
                });
            }
        }
    }
    found.ok_or_else(|| Error::NoRoleFound {
        bone: bone_name.to_string(),
    })
}
