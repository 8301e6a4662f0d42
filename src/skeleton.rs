//! In-memory armature model: an arena of bone records with Blender-like
//! edit/pose mode semantics.

use crate::Error;
use glam::{Quat, Vec3};
use std::sync::Arc;

/// Stable arena index of a bone within its [`Skeleton`].
///
/// Indices are never reused; removed bones leave a tombstone behind.
pub type BoneId = usize;

/// Representation mode of a skeleton. Structural mutation is only valid in
/// [`Mode::Editing`]; geometric reads are valid in either mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    Posed,
    Editing,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Suffix used by source skeleton naming conventions (`Hand_L`).
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "_L",
            Side::Right => "_R",
        }
    }
}

/// World transform applied to a whole skeleton.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

/// Membership mask over the 32 armature layers. Indices outside `0..32`
/// address no layer: they are never contained and setting them is a no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn single(index: u32) -> LayerMask {
        LayerMask(bit(index).unwrap_or(0))
    }

    pub fn contains(self, index: u32) -> bool {
        bit(index).is_some_and(|bit| self.0 & bit != 0)
    }

    pub fn set(&mut self, index: u32, enabled: bool) {
        let Some(bit) = bit(index) else {
            return;
        };
        if enabled {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

fn bit(index: u32) -> Option<u32> {
    1u32.checked_shl(index)
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::single(0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// An axis with an optional sign flip, used for mirrored bend directions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SignedAxis {
    pub axis: Axis,
    pub negative: bool,
}

/// Generation parameters carried on a bone and consumed by the external rig
/// generator. Absent parameters keep the generator's defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RigParams {
    pub segments: Option<u32>,
    pub rotation_axis: Option<Axis>,
    pub primary_rotation_axis: Option<SignedAxis>,
}

/// Expression/shape-key control configuration, shared by reference between
/// the source skeleton and the generated rig.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionSet {
    pub name: String,
    pub presets: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Bone {
    name: String,
    head: Vec3,
    tail: Vec3,
    parent: Option<BoneId>,
    connected: bool,

    pub deform: bool,
    pub layers: LayerMask,
    pub params: RigParams,
    /// Elastic IK stretch amount; `None` when the bone does not define the
    /// parameter at all.
    pub ik_stretch: Option<f32>,
}

impl Bone {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rest-space head position, before the skeleton world transform.
    pub fn head(&self) -> Vec3 {
        self.head
    }

    /// Rest-space tail position, before the skeleton world transform.
    pub fn tail(&self) -> Vec3 {
        self.tail
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    /// Whether the head is welded to the parent's tail.
    pub fn connected(&self) -> bool {
        self.connected
    }
}

/// An ordered collection of bones plus a world transform.
///
/// Bones form a forest by construction: a parent must already be inserted
/// when a child is added, and reparenting rejects cycles. Iteration follows
/// insertion order, so skeletons built root-first iterate parent before
/// child. Bone names are unique within a skeleton.
#[derive(Clone, Debug)]
pub struct Skeleton {
    name: String,
    slots: Vec<Option<Bone>>,
    mode: Mode,
    pub world_transform: Transform,
    pub visible_layers: LayerMask,
    pub expressions: Option<Arc<ExpressionSet>>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>) -> Skeleton {
        Skeleton {
            name: name.into(),
            slots: Vec::new(),
            mode: Mode::Posed,
            world_transform: Transform::IDENTITY,
            visible_layers: LayerMask::ALL,
            expressions: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of live bones.
    pub fn bone_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.bone_count() == 0
    }

    /// Live bones in insertion order.
    pub fn bones(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|bone| (id, bone)))
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.slots.get(id).and_then(|slot| slot.as_ref())
    }

    /// Mutable access to a bone's runtime fields (deform flag, layers,
    /// generation parameters, stretch). Geometry and hierarchy go through
    /// the mode-checked skeleton methods instead.
    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.slots.get_mut(id).and_then(|slot| slot.as_mut())
    }

    pub fn find_bone(&self, name: &str) -> Option<BoneId> {
        self.bones().find(|(_, bone)| bone.name == name).map(|(id, _)| id)
    }

    pub fn has_bone(&self, name: &str) -> bool {
        self.find_bone(name).is_some()
    }

    pub fn head_world(&self, id: BoneId) -> Option<Vec3> {
        self.bone(id)
            .map(|bone| self.world_transform.transform_point(bone.head))
    }

    pub fn tail_world(&self, id: BoneId) -> Option<Vec3> {
        self.bone(id)
            .map(|bone| self.world_transform.transform_point(bone.tail))
    }

    pub fn children(&self, id: BoneId) -> Vec<BoneId> {
        self.bones()
            .filter(|(_, bone)| bone.parent == Some(id))
            .map(|(child, _)| child)
            .collect()
    }

    /// Descendants of `id` in parent-before-child order, excluding `id`.
    pub fn descendants(&self, id: BoneId) -> Vec<BoneId> {
        let mut result = Vec::new();
        let mut queue = self.children(id);
        while !queue.is_empty() {
            let next = queue.remove(0);
            queue.extend(self.children(next));
            result.push(next);
        }
        result
    }

    /// Scoped edit acquisition: enters edit mode, runs `f`, and restores the
    /// prior mode on every exit path. Structural edits made before a failure
    /// are kept; there is no rollback.
    pub fn editing<T>(
        &mut self,
        f: impl FnOnce(&mut Skeleton) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let prior = self.mode;
        self.mode = Mode::Editing;
        let result = f(self);
        self.mode = prior;
        result
    }

    fn require_editing(&self) -> Result<(), Error> {
        if self.mode != Mode::Editing {
            return Err(Error::NotEditing {
                skeleton: self.name.clone(),
            });
        }
        Ok(())
    }

    fn get(&self, id: BoneId) -> Result<&Bone, Error> {
        self.bone(id).ok_or(Error::StaleBone {
            skeleton: self.name.clone(),
            index: id,
        })
    }

    fn get_mut(&mut self, id: BoneId) -> Result<&mut Bone, Error> {
        let name = self.name.clone();
        self.bone_mut(id).ok_or(Error::StaleBone {
            skeleton: name,
            index: id,
        })
    }

    /// Adds a bone. The parent, when given, must already be live, which
    /// keeps the arena a forest.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        head: Vec3,
        tail: Vec3,
        parent: Option<BoneId>,
    ) -> Result<BoneId, Error> {
        self.require_editing()?;
        let name = name.into();
        if self.has_bone(&name) {
            return Err(Error::DuplicateBoneName {
                skeleton: self.name.clone(),
                name,
            });
        }
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        self.slots.push(Some(Bone {
            name,
            head,
            tail,
            parent,
            connected: false,
            deform: false,
            layers: LayerMask::default(),
            params: RigParams::default(),
            ik_stretch: None,
        }));
        Ok(self.slots.len() - 1)
    }

    pub fn rename(&mut self, id: BoneId, name: impl Into<String>) -> Result<(), Error> {
        self.require_editing()?;
        let name = name.into();
        if let Some(existing) = self.find_bone(&name) {
            if existing != id {
                return Err(Error::DuplicateBoneName {
                    skeleton: self.name.clone(),
                    name,
                });
            }
        }
        self.get_mut(id)?.name = name;
        Ok(())
    }

    /// Sets the head position. A connected bone shares this coordinate with
    /// its parent's tail, so the parent's tail (and the heads of any other
    /// connected siblings) move along with it.
    pub fn set_head(&mut self, id: BoneId, head: Vec3) -> Result<(), Error> {
        self.require_editing()?;
        let bone = self.get(id)?;
        let parent = if bone.connected { bone.parent } else { None };
        self.get_mut(id)?.head = head;
        if let Some(parent) = parent {
            self.get_mut(parent)?.tail = head;
            for sibling in self.children(parent) {
                if self.get(sibling)?.connected {
                    self.get_mut(sibling)?.head = head;
                }
            }
        }
        Ok(())
    }

    /// Sets the tail position, dragging the heads of connected children.
    pub fn set_tail(&mut self, id: BoneId, tail: Vec3) -> Result<(), Error> {
        self.require_editing()?;
        self.get_mut(id)?.tail = tail;
        for child in self.children(id) {
            if self.get(child)?.connected {
                self.get_mut(child)?.head = tail;
            }
        }
        Ok(())
    }

    /// Reparents a bone. Cycles are rejected, so the forest invariant holds.
    pub fn set_parent(&mut self, id: BoneId, parent: Option<BoneId>) -> Result<(), Error> {
        self.require_editing()?;
        self.get(id)?;
        if let Some(parent) = parent {
            let mut ancestor = Some(parent);
            while let Some(current) = ancestor {
                if current == id {
                    return Err(Error::CyclicParent {
                        bone: self.get(id)?.name.clone(),
                        parent: self.get(parent)?.name.clone(),
                    });
                }
                ancestor = self.get(current)?.parent;
            }
        }
        self.get_mut(id)?.parent = parent;
        Ok(())
    }

    /// Sets the connected flag. Connecting a bone welds its head to the
    /// parent's tail; a bone without a parent stays disconnected.
    pub fn set_connected(&mut self, id: BoneId, connected: bool) -> Result<(), Error> {
        self.require_editing()?;
        let parent = self.get(id)?.parent;
        match (connected, parent) {
            (true, Some(parent)) => {
                let tail = self.get(parent)?.tail;
                let bone = self.get_mut(id)?;
                bone.connected = true;
                bone.head = tail;
            }
            (true, None) => {}
            (false, _) => self.get_mut(id)?.connected = false,
        }
        Ok(())
    }

    /// Removes one bone. Its children survive, reparented to the removed
    /// bone's own parent and disconnected.
    pub fn remove(&mut self, id: BoneId) -> Result<(), Error> {
        self.require_editing()?;
        let parent = self.get(id)?.parent;
        for child in self.children(id) {
            let bone = self.get_mut(child)?;
            bone.parent = parent;
            bone.connected = false;
        }
        self.slots[id] = None;
        Ok(())
    }

    /// Removes a bone and every descendant. Returns the removed names in
    /// parent-before-child order.
    pub fn remove_subtree(&mut self, id: BoneId) -> Result<Vec<String>, Error> {
        self.require_editing()?;
        self.get(id)?;
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(bone) = self.slots[id].take() {
                removed.push(bone.name);
            }
        }
        Ok(removed)
    }
}
