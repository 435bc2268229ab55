//! The document model: typed entities in an arena tree.
//!
//! An [`Entity`] is a plain struct plus a hand-written descriptor table; the
//! generic engine here derives its whole wire behavior from that table. The
//! tree is an arena: a [`Tree`] owns every entity in flat storage, and a
//! [`NodeId`] addresses one slot. Parent links are slot indices, so there is
//! never an ownership cycle, and a child has at most one parent at a time:
//! attaching an already-parented entity is an error, detaching keeps the
//! subtree alive for re-attachment elsewhere.
//!
//! Entities without a wire tag are *transparent*: they hold attributes and
//! children like any other node, but contribute no wrapping list to the
//! output, only their children's output, with the transparent node's
//! coordinate frame folded into descendants' exported positions.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::Mutex;

use lazy_static::lazy_static;
use seahash::SeaHasher;

use crate::attr::{AttrAccess, AttributeMeta, BoolKind, WireValue};
use crate::error::{CadwireError, Result};
use crate::parser;
use crate::printer;
use crate::sexpr::SExpr;
use crate::symbol::Symbol;
use crate::values::{Pos2, Uuid, Vec2};

pub type RegistryHasher = BuildHasherDefault<SeaHasher>;

/// A typed entity. Implementations supply the wire tag (`None` makes the
/// entity transparent), the descriptor table, the container allow-list, and
/// the optional validation / coordinate-frame hooks.
pub trait Entity: Any + Clone + Default + Sized {
    /// The leading symbol of the serialized list; `None` = transparent.
    const TAG: Option<&'static str>;

    /// Explicit attribute-order override; names listed here come first
    /// within their positional/named group.
    const ORDER: &'static [&'static str] = &[];

    /// Descriptor table in declaration order; the engine reorders and
    /// caches it once per type.
    fn attributes() -> Vec<AttributeMeta<Self>>;

    /// Permitted child types. Leaf entities leave this empty.
    fn child_specs() -> Vec<ChildSpec> {
        Vec::new()
    }

    /// Type-specific semantic checks, run before serialization.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Local coordinate frame this entity establishes for its descendants.
    fn frame(&self) -> Option<Pos2> {
        None
    }

    /// Sub-expressions no descriptor recognized, preserved for round trips.
    fn unknown(&self) -> &[SExpr];
    fn unknown_mut(&mut self) -> &mut Vec<SExpr>;
}

/// One permitted child type of a container: its wire tag (transparent types
/// have none and are only ever attached programmatically), concrete type,
/// and a parsing thunk.
pub struct ChildSpec {
    pub tag: Option<&'static str>,
    type_id: TypeId,
    parse: fn(&mut Tree, &SExpr) -> Result<NodeId>,
}

/// Builds the [`ChildSpec`] for a concrete child type.
pub fn child_spec<N: Entity>() -> ChildSpec {
    ChildSpec {
        tag: N::TAG,
        type_id: TypeId::of::<N>(),
        parse: |tree, expr| tree.from_sexpr_as::<N>(expr),
    }
}

fn short_type_name<N>() -> &'static str {
    let full = std::any::type_name::<N>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn static_sym(name: &'static str) -> Symbol {
    Symbol::new(name).expect("declared attribute and tag names are valid barewords")
}

// ------------- Descriptor registry -------------
// Ordered descriptor tables are computed once per type, leaked to 'static
// and kept in a process-wide registry, so every encode/decode walks the
// same immutable slice.

lazy_static! {
    static ref DESCRIPTORS: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>, RegistryHasher>> =
        Mutex::new(HashMap::default());
    static ref CHILD_SPECS: Mutex<HashMap<TypeId, &'static [ChildSpec], RegistryHasher>> =
        Mutex::new(HashMap::default());
}

/// The ordered attribute descriptors of `N`: positional attributes first,
/// both groups in declaration order unless `N::ORDER` says otherwise.
pub fn descriptors<N: Entity>() -> &'static [AttributeMeta<N>] {
    let mut registry = DESCRIPTORS.lock().unwrap();
    let entry = registry.entry(TypeId::of::<N>()).or_insert_with(|| {
        let mut attrs = N::attributes();
        let rank = |name: &str| {
            N::ORDER
                .iter()
                .position(|o| *o == name)
                .unwrap_or(usize::MAX)
        };
        // stable sort keeps declaration order within each group
        attrs.sort_by_key(|a| (a.positional.is_none(), rank(a.name)));
        let leaked: &'static [AttributeMeta<N>] = Box::leak(attrs.into_boxed_slice());
        Box::new(leaked)
    });
    entry
        .downcast_ref::<&'static [AttributeMeta<N>]>()
        .copied()
        .expect("descriptor registry holds one slice type per TypeId")
}

fn child_specs_of<N: Entity>() -> &'static [ChildSpec] {
    let mut registry = CHILD_SPECS.lock().unwrap();
    *registry
        .entry(TypeId::of::<N>())
        .or_insert_with(|| Box::leak(N::child_specs().into_boxed_slice()))
}

// ------------- Generic attribute codec -------------

fn push_encoded<N: Entity>(out: &mut Vec<SExpr>, meta: &AttributeMeta<N>, atoms: Vec<SExpr>) {
    if meta.positional.is_some() {
        out.extend(atoms);
    } else {
        let mut named = vec![SExpr::Sym(static_sym(meta.name))];
        named.extend(atoms);
        out.push(SExpr::List(named));
    }
}

/// Encodes every set attribute of `node` in descriptor order. When the node
/// lives in a tree, coordinate-transform attributes are composed through
/// its ancestor chain first.
fn encode_attrs<N: Entity>(node: &N, place: Option<(&Tree, NodeId)>) -> Result<Vec<SExpr>> {
    let mut out = Vec::new();
    for meta in descriptors::<N>() {
        match &meta.access {
            AttrAccess::Value { get, .. } => {
                if let Some(atoms) = get(node) {
                    push_encoded(&mut out, meta, atoms);
                }
            }
            AttrAccess::Id { get, .. } => {
                if let Some(id) = get(node) {
                    push_encoded(&mut out, meta, id.encode());
                }
            }
            AttrAccess::Transform { get, vec2, .. } => {
                if let Some(mut pos) = get(node) {
                    if let Some((tree, id)) = place {
                        if let Some(parent) = tree.parent(id) {
                            pos = tree.compose(parent, pos);
                        }
                    }
                    let atoms = if *vec2 {
                        Vec2::from(pos).encode()
                    } else {
                        pos.encode()
                    };
                    push_encoded(&mut out, meta, atoms);
                }
            }
            AttrAccess::Bool { kind, get, .. } => {
                let value = get(node);
                let name = static_sym(meta.name);
                match kind {
                    BoolKind::Symbol => {
                        if value {
                            out.push(SExpr::Sym(name));
                        }
                    }
                    BoolKind::SymbolInList => {
                        if value {
                            out.push(SExpr::List(vec![SExpr::Sym(name)]));
                        }
                    }
                    BoolKind::YesNo => {
                        let answer = if value { "yes" } else { "no" };
                        out.push(SExpr::List(vec![
                            SExpr::Sym(name),
                            SExpr::Sym(static_sym(answer)),
                        ]));
                    }
                }
            }
            AttrAccess::Child { get, .. } => {
                if let Some(expr) = get(node)? {
                    out.push(expr);
                }
            }
        }
    }
    Ok(out)
}

/// Removes each element matching the predicate; the named and boolean
/// matching below uses this to pick values out of an unordered pool.
fn remove_where(pool: &mut Vec<SExpr>, pred: impl Fn(&SExpr) -> bool) -> Vec<SExpr> {
    let mut removed = Vec::new();
    let mut i = 0;
    while i < pool.len() {
        if pred(&pool[i]) {
            removed.push(pool.remove(i));
        } else {
            i += 1;
        }
    }
    removed
}

/// Fills `node` from the element pool, consuming what it recognizes and
/// leaving the rest behind for the unknown bag.
fn decode_attrs<N: Entity>(node: &mut N, pool: &mut Vec<SExpr>) -> Result<()> {
    for meta in descriptors::<N>() {
        if let Some(count) = meta.positional {
            if pool.len() < count {
                if meta.optional {
                    continue;
                }
                return Err(CadwireError::structure(format!(
                    "not enough positional arguments in {}",
                    short_type_name::<N>()
                )));
            }
            let consumed: Vec<SExpr> = pool[..count].to_vec();
            let outcome = match &meta.access {
                AttrAccess::Value { set, .. } | AttrAccess::Transform { set, .. } => {
                    set(node, &consumed)
                }
                AttrAccess::Id { set, .. } => Uuid::decode(&consumed).map(|v| set(node, v)),
                _ => Err(CadwireError::structure(format!(
                    "attribute '{}' cannot be positional",
                    meta.name
                ))),
            };
            match outcome {
                Ok(()) => {
                    pool.drain(..count);
                }
                // optional positionals may simply not be present; the
                // elements stay in the pool for the next descriptor
                Err(_) if meta.optional => continue,
                Err(e) => return Err(e),
            }
            continue;
        }

        let name = static_sym(meta.name);
        match &meta.access {
            AttrAccess::Bool { kind, set, .. } => {
                let found = match kind {
                    BoolKind::Symbol => {
                        !remove_where(pool, |e| e.as_sym() == Some(name)).is_empty()
                    }
                    BoolKind::SymbolInList => !remove_where(pool, |e| {
                        e.as_list().map(|l| l.len() == 1) == Some(true) && e.head() == Some(name)
                    })
                    .is_empty(),
                    BoolKind::YesNo => {
                        let matches = remove_where(pool, |e| {
                            e.as_list().map(|l| l.len() == 2) == Some(true)
                                && e.head() == Some(name)
                        });
                        match matches.first().and_then(SExpr::as_list) {
                            Some(items) => items[1].as_sym() == Some(static_sym("yes")),
                            None => false,
                        }
                    }
                };
                set(node, found);
            }
            access => {
                let mut matches = remove_where(pool, |e| e.is_named(name));
                if matches.is_empty() {
                    if !meta.optional {
                        return Err(CadwireError::structure(format!(
                            "{} requires attribute '{}'",
                            short_type_name::<N>(),
                            meta.name
                        )));
                    }
                    continue;
                }
                let first = matches.remove(0);
                // duplicates drop back into the pool and end up unknown
                pool.extend(matches);
                let items = first.as_list().expect("is_named matched a list");
                match access {
                    AttrAccess::Value { set, .. } | AttrAccess::Transform { set, .. } => {
                        set(node, &items[1..])?
                    }
                    AttrAccess::Id { set, .. } => set(node, Uuid::decode(&items[1..])?),
                    AttrAccess::Child { set, .. } => set(node, &first)?,
                    AttrAccess::Bool { .. } => unreachable!("booleans handled above"),
                }
            }
        }
    }
    Ok(())
}

// ------------- Standalone entity codec -------------
// Attribute-valued entities (a font inside text effects) are plain struct
// fields rather than tree children; they encode and decode without a tree.

/// Serializes a detached entity to its own wire list.
pub fn entity_to_sexpr<N: Entity>(node: &N) -> Result<SExpr> {
    node.validate()?;
    let mut items = Vec::new();
    if let Some(tag) = N::TAG {
        items.push(SExpr::Sym(static_sym(tag)));
    }
    items.extend(encode_attrs(node, None)?);
    items.extend(
        node.unknown()
            .iter()
            .cloned()
            .map(|e| SExpr::Unknown(Box::new(e))),
    );
    Ok(SExpr::List(items))
}

/// Parses a detached leaf entity from its wire list.
pub fn entity_from_sexpr<N: Entity>(expr: &SExpr) -> Result<N> {
    let items = expr
        .as_list()
        .ok_or_else(|| {
            CadwireError::structure(format!(
                "cannot deserialize {} from a non-list expression",
                short_type_name::<N>()
            ))
        })?
        .to_vec();
    let mut pool = check_tag::<N>(items)?;
    let mut node = N::default();
    decode_attrs(&mut node, &mut pool)?;
    *node.unknown_mut() = pool;
    Ok(node)
}

/// Verifies the list head against the declared tag and returns the
/// remaining elements.
fn check_tag<N: Entity>(mut items: Vec<SExpr>) -> Result<Vec<SExpr>> {
    if let Some(tag) = N::TAG {
        let matches = items.first().map(|e| e.as_sym() == Some(static_sym(tag)));
        if matches != Some(true) {
            return Err(CadwireError::structure(format!(
                "cannot deserialize {}: expected tag '{}'",
                short_type_name::<N>(),
                tag
            )));
        }
        items.remove(0);
    }
    Ok(items)
}

// ------------- Type erasure -------------

/// Object-safe view of an entity, implemented for every `Entity`; the tree
/// stores these.
pub trait AnyNode: Any {
    fn tag(&self) -> Option<&'static str>;
    fn type_name(&self) -> &'static str;
    fn entity_type(&self) -> TypeId;
    fn validate(&self) -> Result<()>;
    fn frame(&self) -> Option<Pos2>;
    fn unknown_exprs(&self) -> &[SExpr];
    fn child_specs(&self) -> &'static [ChildSpec];
    fn encode(&self, tree: &Tree, id: NodeId) -> Result<Vec<SExpr>>;
    fn clone_node(&self, regenerate_ids: bool) -> Box<dyn AnyNode>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<N: Entity> AnyNode for N {
    fn tag(&self) -> Option<&'static str> {
        N::TAG
    }
    fn type_name(&self) -> &'static str {
        short_type_name::<N>()
    }
    fn entity_type(&self) -> TypeId {
        TypeId::of::<N>()
    }
    fn validate(&self) -> Result<()> {
        Entity::validate(self)
    }
    fn frame(&self) -> Option<Pos2> {
        Entity::frame(self)
    }
    fn unknown_exprs(&self) -> &[SExpr] {
        self.unknown()
    }
    fn child_specs(&self) -> &'static [ChildSpec] {
        child_specs_of::<N>()
    }
    fn encode(&self, tree: &Tree, id: NodeId) -> Result<Vec<SExpr>> {
        encode_attrs(self, Some((tree, id)))
    }
    fn clone_node(&self, regenerate_ids: bool) -> Box<dyn AnyNode> {
        let mut copy = self.clone();
        if regenerate_ids {
            for meta in descriptors::<N>() {
                if let AttrAccess::Id { get, set } = &meta.access {
                    if get(&copy).is_some() {
                        set(&mut copy, Uuid::new());
                    }
                }
            }
        }
        Box::new(copy)
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ------------- Tree -------------

/// Stable handle to a slot in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

struct Slot {
    node: Box<dyn AnyNode>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena owning a document's entities. Slots are never reused within one
/// tree, so ids stay valid for its whole lifetime; detached entities remain
/// addressable and can be re-attached.
#[derive(Default)]
pub struct Tree {
    slots: Vec<Slot>,
}

impl Tree {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id.0 as usize]
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id.0 as usize]
    }

    /// Adds a detached entity and returns its handle.
    pub fn insert<N: Entity>(&mut self, node: N) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            node: Box::new(node),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn get<N: Entity>(&self, id: NodeId) -> Option<&N> {
        self.slots
            .get(id.0 as usize)
            .and_then(|s| s.node.as_any().downcast_ref())
    }

    pub fn get_mut<N: Entity>(&mut self, id: NodeId) -> Option<&mut N> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(|s| s.node.as_any_mut().downcast_mut())
    }

    pub fn is<N: Entity>(&self, id: NodeId) -> bool {
        self.slot(id).node.entity_type() == TypeId::of::<N>()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slot(id).children
    }

    /// Attaches `child` at the end of `parent`'s child list.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.slot(parent).children.len();
        self.insert_at(parent, index, child)
    }

    /// Inserts an entity and attaches it in one step.
    pub fn append_new<N: Entity>(&mut self, parent: NodeId, node: N) -> Result<NodeId> {
        let id = self.insert(node);
        self.append(parent, id)?;
        Ok(id)
    }

    /// Attaches `child` at `index`. Fails without mutating anything when the
    /// child type is not permitted, the child already has a parent, or the
    /// index is out of bounds.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let child_slot = self.slot(child);
        if child_slot.parent.is_some() {
            return Err(CadwireError::structure(format!(
                "{} already has a parent",
                child_slot.node.type_name()
            )));
        }
        let child_type = child_slot.node.entity_type();
        let parent_slot = self.slot(parent);
        if !parent_slot
            .node
            .child_specs()
            .iter()
            .any(|s| s.type_id == child_type)
        {
            return Err(CadwireError::structure(format!(
                "{} is not allowed to be a child of {}",
                self.slot(child).node.type_name(),
                parent_slot.node.type_name()
            )));
        }
        if index > parent_slot.children.len() {
            return Err(CadwireError::structure("child index out of bounds"));
        }
        self.slot_mut(parent).children.insert(index, child);
        self.slot_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`. The subtree under `child` stays
    /// intact and owned by the tree; the caller may re-attach or ignore it.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let position = self
            .slot(parent)
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| {
                CadwireError::structure(format!(
                    "{} is not a child of {}",
                    self.slot(child).node.type_name(),
                    self.slot(parent).node.type_name()
                ))
            })?;
        self.slot_mut(parent).children.remove(position);
        self.slot_mut(child).parent = None;
        Ok(())
    }

    /// Detaches `child` from whatever parent it has, if any.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        match self.parent(child) {
            Some(parent) => self.remove(parent, child),
            None => Ok(()),
        }
    }

    /// Nearest node of type `N` on the parent chain, inclusive of `id`.
    pub fn closest<N: Entity>(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.is::<N>(c) {
                return Some(c);
            }
            current = self.parent(c);
        }
        None
    }

    /// Linear scan over children of `id` (recursing when asked) for nodes
    /// of type `N` matching the predicate. No index is maintained; document
    /// sizes make a scan the right trade.
    pub fn find_all<N: Entity>(
        &self,
        id: NodeId,
        recursive: bool,
        predicate: impl Fn(&N) -> bool + Copy,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_matches(id, recursive, predicate, &mut found);
        found
    }

    pub fn find_one<N: Entity>(
        &self,
        id: NodeId,
        recursive: bool,
        predicate: impl Fn(&N) -> bool + Copy,
    ) -> Option<NodeId> {
        self.find_all(id, recursive, predicate).into_iter().next()
    }

    fn collect_matches<N: Entity>(
        &self,
        id: NodeId,
        recursive: bool,
        predicate: impl Fn(&N) -> bool + Copy,
        found: &mut Vec<NodeId>,
    ) {
        for &child in self.children(id) {
            if let Some(node) = self.get::<N>(child) {
                if predicate(node) {
                    found.push(child);
                }
            }
            if recursive {
                self.collect_matches(child, recursive, predicate, found);
            }
        }
    }

    /// Composes `pos` through the coordinate frames of `id` and all its
    /// ancestors, nearest frame first; the document root leaves positions
    /// unchanged.
    pub fn compose(&self, id: NodeId, mut pos: Pos2) -> Pos2 {
        let mut current = Some(id);
        while let Some(c) = current {
            let slot = self.slot(c);
            if let Some(frame) = slot.node.frame() {
                pos = frame.compose(pos);
            }
            current = slot.parent;
        }
        pos
    }

    /// Deep copy of the subtree at `id`, detached, with identifier
    /// attributes regenerated so the copy is a distinct design object.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let copy = self.slot(id).node.clone_node(true);
        let new_id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            node: copy,
            parent: None,
            children: Vec::new(),
        });
        let children: Vec<NodeId> = self.slot(id).children.clone();
        for child in children {
            let new_child = self.clone_subtree(child);
            self.append(new_id, new_child)
                .expect("clone re-attaches the same child types");
        }
        new_id
    }

    // ------------- Wire conversion -------------

    /// Full wire form of the subtree at `id`: the entity's own list, or for
    /// a transparent entity just its children's lists.
    pub fn to_sexpr(&self, id: NodeId) -> Result<Vec<SExpr>> {
        let slot = self.slot(id);
        slot.node.validate()?;
        let mut children_out = Vec::new();
        for &child in &slot.children {
            children_out.extend(self.to_sexpr(child)?);
        }
        match slot.node.tag() {
            Some(tag) => {
                let mut items = vec![SExpr::Sym(static_sym(tag))];
                items.extend(slot.node.encode(self, id)?);
                items.extend(
                    slot.node
                        .unknown_exprs()
                        .iter()
                        .cloned()
                        .map(|e| SExpr::Unknown(Box::new(e))),
                );
                items.extend(children_out);
                Ok(vec![SExpr::List(items)])
            }
            None => Ok(children_out),
        }
    }

    /// Renders the subtree at `id` as wire text.
    pub fn serialize(&self, id: NodeId, show_unknown: bool) -> Result<String> {
        let exprs = self.to_sexpr(id)?;
        let rendered: Vec<String> = exprs
            .iter()
            .map(|e| printer::serialize(e, printer::DEFAULT_WIDTH, show_unknown))
            .collect();
        tracing::debug!(node = self.slot(id).node.type_name(), "serialized subtree");
        Ok(rendered.join("\n"))
    }

    /// Builds a typed node (and its recognized children) from a wire
    /// expression, leaving everything unrecognized in the unknown bag.
    pub fn from_sexpr_as<N: Entity>(&mut self, expr: &SExpr) -> Result<NodeId> {
        let items = expr
            .as_list()
            .ok_or_else(|| {
                CadwireError::structure(format!(
                    "cannot deserialize {} from a non-list expression",
                    short_type_name::<N>()
                ))
            })?
            .to_vec();
        let rest = check_tag::<N>(items)?;

        // recognized children are claimed before attribute matching
        let specs = child_specs_of::<N>();
        let mut child_ids = Vec::new();
        let mut pool = Vec::new();
        for e in rest {
            let claimed = e
                .head()
                .and_then(|head| specs.iter().find(|s| s.tag.map(static_sym) == Some(head)));
            match claimed {
                Some(spec) => child_ids.push((spec.parse)(self, &e)?),
                None => pool.push(e),
            }
        }

        let mut node = N::default();
        decode_attrs(&mut node, &mut pool)?;
        *node.unknown_mut() = pool;

        let id = self.insert(node);
        for child in child_ids {
            self.append(id, child)?;
        }
        Ok(id)
    }

    /// Parses wire text straight into a typed node.
    pub fn parse_as<N: Entity>(&mut self, text: &str) -> Result<NodeId> {
        let expr = parser::parse(text)?;
        self.from_sexpr_as::<N>(&expr)
    }
}
