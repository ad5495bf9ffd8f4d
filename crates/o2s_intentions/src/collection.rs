// o2s_intentions/collection - Arena-backed intention graph
//! Intentions live in a single arena owned by [`IntentionCollection`].
//! Parents list their children by [`IntentionId`] and every node records its
//! parent id, so removing a node always clears both directions at once.

use crate::error::IntentionError;
use crate::intention::{
    FileGenerationIntention, GlobalFunctionGenerationIntention, GlobalVariableGenerationIntention,
    InstanceVariableGenerationIntention, Intention, MethodGenerationIntention, PropertyMode,
    PropertyGenerationIntention, ProtocolInheritanceIntention, TypeGenerationIntention,
    TypealiasIntention,
};
use o2s_ast::{CompoundStatement, Expression};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// Stable handle to an intention inside one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntentionId(u32);

impl IntentionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        IntentionId(index as u32)
    }

    fn offset(self, by: usize) -> Self {
        Self::from_index(self.index() + by)
    }
}

impl fmt::Display for IntentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentionNode {
    pub parent: Option<IntentionId>,
    pub intention: Intention,
}

/// Child list of a parent intention that a given child kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildSlot {
    Types,
    Typealiases,
    GlobalFunctions,
    GlobalVariables,
    Properties,
    Methods,
    InstanceVariables,
    Protocols,
}

impl ChildSlot {
    fn of(child: &Intention) -> Option<Self> {
        match child {
            Intention::File(_) => None,
            Intention::Type(_) => Some(ChildSlot::Types),
            Intention::Typealias(_) => Some(ChildSlot::Typealiases),
            Intention::GlobalFunction(_) => Some(ChildSlot::GlobalFunctions),
            Intention::GlobalVariable(_) => Some(ChildSlot::GlobalVariables),
            Intention::Property(_) => Some(ChildSlot::Properties),
            Intention::Method(_) => Some(ChildSlot::Methods),
            Intention::InstanceVariable(_) => Some(ChildSlot::InstanceVariables),
            Intention::ProtocolConformance(_) => Some(ChildSlot::Protocols),
        }
    }

    fn fits(self, parent: &Intention) -> bool {
        match parent {
            Intention::File(_) => matches!(
                self,
                ChildSlot::Types
                    | ChildSlot::Typealiases
                    | ChildSlot::GlobalFunctions
                    | ChildSlot::GlobalVariables
            ),
            Intention::Type(_) => matches!(
                self,
                ChildSlot::Properties
                    | ChildSlot::Methods
                    | ChildSlot::InstanceVariables
                    | ChildSlot::Protocols
            ),
            _ => false,
        }
    }

    fn list_mut(self, parent: &mut Intention) -> Option<&mut Vec<IntentionId>> {
        match (parent, self) {
            (Intention::File(file), ChildSlot::Types) => Some(&mut file.types),
            (Intention::File(file), ChildSlot::Typealiases) => Some(&mut file.typealiases),
            (Intention::File(file), ChildSlot::GlobalFunctions) => Some(&mut file.global_functions),
            (Intention::File(file), ChildSlot::GlobalVariables) => Some(&mut file.global_variables),
            (Intention::Type(ty), ChildSlot::Properties) => Some(&mut ty.properties),
            (Intention::Type(ty), ChildSlot::Methods) => Some(&mut ty.methods),
            (Intention::Type(ty), ChildSlot::InstanceVariables) => Some(&mut ty.instance_variables),
            (Intention::Type(ty), ChildSlot::Protocols) => Some(&mut ty.protocols),
            _ => None,
        }
    }
}

macro_rules! typed_accessors {
    ($($get:ident, $get_mut:ident => $variant:ident($ty:ty), $expected:literal;)*) => {
        $(
            pub fn $get(&self, id: IntentionId) -> Result<&$ty, IntentionError> {
                match self.get(id) {
                    Some(Intention::$variant(value)) => Ok(value),
                    Some(other) => Err(IntentionError::UnexpectedKind {
                        id,
                        expected: $expected,
                        found: other.kind_name(),
                    }),
                    None => Err(IntentionError::Missing { id }),
                }
            }

            pub fn $get_mut(&mut self, id: IntentionId) -> Result<&mut $ty, IntentionError> {
                match self.get_mut(id) {
                    Some(Intention::$variant(value)) => Ok(value),
                    Some(other) => Err(IntentionError::UnexpectedKind {
                        id,
                        expected: $expected,
                        found: other.kind_name(),
                    }),
                    None => Err(IntentionError::Missing { id }),
                }
            }
        )*
    };
}

/// Root owner of every intention of a rewrite run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentionCollection {
    nodes: Vec<Option<IntentionNode>>,
    files: Vec<IntentionId>,
}

impl IntentionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live intentions.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[IntentionId] {
        &self.files
    }

    pub fn contains(&self, id: IntentionId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: IntentionId) -> Option<&Intention> {
        self.node(id).map(|node| &node.intention)
    }

    pub fn get_mut(&mut self, id: IntentionId) -> Option<&mut Intention> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .map(|node| &mut node.intention)
    }

    pub fn parent(&self, id: IntentionId) -> Option<IntentionId> {
        self.node(id).and_then(|node| node.parent)
    }

    fn node(&self, id: IntentionId) -> Option<&IntentionNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: IntentionId) -> Result<&mut IntentionNode, IntentionError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(IntentionError::Missing { id })
    }

    typed_accessors! {
        file, file_mut => File(FileGenerationIntention), "file";
        type_intention, type_intention_mut => Type(TypeGenerationIntention), "type";
        property, property_mut => Property(PropertyGenerationIntention), "property";
        method, method_mut => Method(MethodGenerationIntention), "method";
        instance_variable, instance_variable_mut => InstanceVariable(InstanceVariableGenerationIntention), "instance variable";
        protocol_conformance, protocol_conformance_mut => ProtocolConformance(ProtocolInheritanceIntention), "protocol conformance";
        global_function, global_function_mut => GlobalFunction(GlobalFunctionGenerationIntention), "global function";
        global_variable, global_variable_mut => GlobalVariable(GlobalVariableGenerationIntention), "global variable";
        typealias, typealias_mut => Typealias(TypealiasIntention), "typealias";
    }

    fn allocate(&mut self, parent: Option<IntentionId>, mut intention: Intention) -> IntentionId {
        // Child ids of a cloned intention belong to its original location.
        for list in intention.child_lists_mut() {
            list.clear();
        }
        let id = IntentionId::from_index(self.nodes.len());
        self.nodes.push(Some(IntentionNode { parent, intention }));
        id
    }

    pub fn add_file(&mut self, file: FileGenerationIntention) -> IntentionId {
        let id = self.allocate(None, Intention::File(file));
        self.files.push(id);
        trace!(%id, "added file intention");
        id
    }

    /// Adds `intention` as the last child of `parent` in the list matching
    /// its kind.
    pub fn add_child(
        &mut self,
        parent: IntentionId,
        intention: Intention,
    ) -> Result<IntentionId, IntentionError> {
        let slot = self.slot_under(parent, &intention)?;
        let id = self.allocate(Some(parent), intention);
        self.push_into(parent, slot, id)?;
        Ok(id)
    }

    pub fn add_type(
        &mut self,
        file: IntentionId,
        ty: TypeGenerationIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(file, Intention::Type(ty))
    }

    pub fn add_typealias(
        &mut self,
        file: IntentionId,
        alias: TypealiasIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(file, Intention::Typealias(alias))
    }

    pub fn add_global_function(
        &mut self,
        file: IntentionId,
        function: GlobalFunctionGenerationIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(file, Intention::GlobalFunction(function))
    }

    pub fn add_global_variable(
        &mut self,
        file: IntentionId,
        variable: GlobalVariableGenerationIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(file, Intention::GlobalVariable(variable))
    }

    pub fn add_property(
        &mut self,
        ty: IntentionId,
        property: PropertyGenerationIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(ty, Intention::Property(property))
    }

    pub fn add_method(
        &mut self,
        ty: IntentionId,
        method: MethodGenerationIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(ty, Intention::Method(method))
    }

    pub fn add_instance_variable(
        &mut self,
        ty: IntentionId,
        ivar: InstanceVariableGenerationIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(ty, Intention::InstanceVariable(ivar))
    }

    pub fn add_protocol_conformance(
        &mut self,
        ty: IntentionId,
        conformance: ProtocolInheritanceIntention,
    ) -> Result<IntentionId, IntentionError> {
        self.add_child(ty, Intention::ProtocolConformance(conformance))
    }

    fn slot_under(
        &self,
        parent: IntentionId,
        child: &Intention,
    ) -> Result<ChildSlot, IntentionError> {
        let parent_intention = self
            .get(parent)
            .ok_or(IntentionError::Missing { id: parent })?;
        let invalid = || IntentionError::InvalidPlacement {
            child: child.kind_name(),
            parent: parent_intention.kind_name(),
        };
        match ChildSlot::of(child) {
            Some(slot) if slot.fits(parent_intention) => Ok(slot),
            _ => Err(invalid()),
        }
    }

    fn push_into(
        &mut self,
        parent: IntentionId,
        slot: ChildSlot,
        child: IntentionId,
    ) -> Result<(), IntentionError> {
        let parent_node = self.node_mut(parent)?;
        let parent_kind = parent_node.intention.kind_name();
        let list = slot
            .list_mut(&mut parent_node.intention)
            .ok_or(IntentionError::InvalidPlacement {
                child: "child",
                parent: parent_kind,
            })?;
        list.push(child);
        Ok(())
    }

    /// Unlinks `id` from its parent's child list (or the file list) and
    /// clears its parent back-reference. The node stays allocated.
    fn unlink(&mut self, id: IntentionId) -> Result<(), IntentionError> {
        let parent = self.node(id).ok_or(IntentionError::Missing { id })?.parent;
        match parent {
            Some(parent) => {
                let parent_node = self.node_mut(parent)?;
                let mut found = false;
                for list in parent_node.intention.child_lists_mut() {
                    if let Some(position) = list.iter().position(|child| *child == id) {
                        list.remove(position);
                        found = true;
                        break;
                    }
                }
                if !found {
                    return Err(IntentionError::NotAChild { child: id, parent });
                }
            }
            None => match self.files.iter().position(|file| *file == id) {
                Some(position) => {
                    self.files.remove(position);
                }
                None => return Err(IntentionError::Orphaned { id }),
            },
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Removes `id` and its whole subtree, returning the removed intention
    /// with its child lists emptied.
    pub fn remove(&mut self, id: IntentionId) -> Result<Intention, IntentionError> {
        self.unlink(id)?;
        let mut pending = vec![id];
        let mut removed = None;
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get_mut(current.index()).and_then(Option::take) else {
                continue;
            };
            let mut intention = node.intention;
            pending.extend(intention.children());
            for list in intention.child_lists_mut() {
                list.clear();
            }
            if current == id {
                removed = Some(intention);
            }
        }
        trace!(%id, "removed intention");
        removed.ok_or(IntentionError::Missing { id })
    }

    /// Removes `child`, failing when it is not listed under `parent`.
    pub fn remove_child(
        &mut self,
        parent: IntentionId,
        child: IntentionId,
    ) -> Result<Intention, IntentionError> {
        if self.parent(child) != Some(parent)
            || !self
                .get(parent)
                .is_some_and(|intention| intention.children().contains(&child))
        {
            return Err(IntentionError::NotAChild { child, parent });
        }
        self.remove(child)
    }

    /// Moves `id` (with its subtree) to the end of the matching child list of
    /// `new_parent`.
    pub fn move_to(
        &mut self,
        id: IntentionId,
        new_parent: IntentionId,
    ) -> Result<(), IntentionError> {
        let intention = self.get(id).ok_or(IntentionError::Missing { id })?;
        let slot = self.slot_under(new_parent, intention)?;
        self.unlink(id)?;
        self.push_into(new_parent, slot, id)?;
        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    /// Walks parents upwards until a type intention is found.
    pub fn enclosing_type(&self, id: IntentionId) -> Option<IntentionId> {
        self.ancestors(id)
            .find(|ancestor| matches!(self.get(*ancestor), Some(Intention::Type(_))))
    }

    pub fn enclosing_file(&self, id: IntentionId) -> Option<IntentionId> {
        if matches!(self.get(id), Some(Intention::File(_))) {
            return Some(id);
        }
        self.ancestors(id)
            .find(|ancestor| matches!(self.get(*ancestor), Some(Intention::File(_))))
    }

    fn ancestors(&self, id: IntentionId) -> impl Iterator<Item = IntentionId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Live intentions in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (IntentionId, &Intention)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            node.as_ref()
                .map(|node| (IntentionId::from_index(index), &node.intention))
        })
    }

    /// Type intentions of every file, in file then declaration order.
    pub fn type_intentions(&self) -> Vec<IntentionId> {
        self.files
            .iter()
            .filter_map(|file| self.file(*file).ok())
            .flat_map(|file| file.types().iter().copied())
            .collect()
    }

    /// Appends every file of `other`, remapping its ids. Returns the new ids
    /// of the appended files.
    pub fn merge(&mut self, other: IntentionCollection) -> Vec<IntentionId> {
        let offset = self.nodes.len();
        for node in other.nodes {
            let node = node.map(|mut node| {
                node.parent = node.parent.map(|parent| parent.offset(offset));
                for list in node.intention.child_lists_mut() {
                    for child in list.iter_mut() {
                        *child = child.offset(offset);
                    }
                }
                node
            });
            self.nodes.push(node);
        }
        let appended: Vec<IntentionId> = other
            .files
            .into_iter()
            .map(|file| file.offset(offset))
            .collect();
        self.files.extend(appended.iter().copied());
        appended
    }

    /// Checks that back-references and child lists agree everywhere.
    pub fn verify_integrity(&self) -> Result<(), IntentionError> {
        let files: HashSet<IntentionId> = self.files.iter().copied().collect();
        for file in &self.files {
            self.file(*file)?;
        }
        for (id, intention) in self.iter() {
            match self.parent(id) {
                Some(parent) => {
                    let listed = self
                        .get(parent)
                        .is_some_and(|owner| owner.children().contains(&id));
                    if !listed {
                        return Err(IntentionError::DanglingParent { child: id, parent });
                    }
                }
                None if files.contains(&id) => {}
                None => return Err(IntentionError::Orphaned { id }),
            }

            let mut seen = HashSet::new();
            for child in intention.children() {
                if !seen.insert(child) {
                    return Err(IntentionError::DuplicateChild { parent: id, child });
                }
                match self.node(child) {
                    None => return Err(IntentionError::Missing { id: child }),
                    Some(node) if node.parent != Some(id) => {
                        return Err(IntentionError::NotAChild { child, parent: id })
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Intentions that carry statement bodies or initializer expressions.
    pub fn function_body_owners(&self) -> Vec<IntentionId> {
        self.iter()
            .filter(|(_, intention)| match intention {
                Intention::Method(method) => method.body.is_some(),
                Intention::GlobalFunction(function) => function.body.is_some(),
                Intention::Property(property) => property.mode.has_accessors(),
                Intention::GlobalVariable(variable) => variable.initial_value.is_some(),
                _ => false,
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Statement bodies owned by `id`: a method or function body, or the
    /// getter then setter of a property with accessors.
    pub fn bodies_mut(&mut self, id: IntentionId) -> Vec<&mut CompoundStatement> {
        match self.get_mut(id) {
            Some(Intention::Method(MethodGenerationIntention {
                body: Some(body), ..
            }))
            | Some(Intention::GlobalFunction(GlobalFunctionGenerationIntention {
                body: Some(body),
                ..
            })) => vec![&mut body.body],
            Some(Intention::Property(property)) => match &mut property.mode {
                PropertyMode::Field => Vec::new(),
                PropertyMode::Computed { getter, setter } => {
                    let mut bodies = vec![&mut getter.body];
                    if let Some(setter) = setter {
                        bodies.push(&mut setter.body.body);
                    }
                    bodies
                }
                PropertyMode::Property { getter, setter } => {
                    vec![&mut getter.body, &mut setter.body.body]
                }
            },
            _ => Vec::new(),
        }
    }

    /// Initial value expression of a global variable.
    pub fn initializer_mut(&mut self, id: IntentionId) -> Option<&mut Expression> {
        match self.get_mut(id) {
            Some(Intention::GlobalVariable(variable)) => variable.initial_value.as_mut(),
            _ => None,
        }
    }
}
