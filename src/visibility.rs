//! Per-field visibility: declarative flags, inheritance-resolved tables,
//! and enforcement of candidate changes against a persisted resource.
//!
//! Each resource kind declares its wire-field tree once, with explicit
//! annotations on the fields (or containers) whose visibility differs from
//! the inherited default. Building a [`VisibilityTable`] resolves the
//! inheritance so every field path has a concrete flag set, and
//! [`enforce`] walks a candidate wire document against the currently
//! persisted one, reporting every field supplied outside its permitted
//! visibility.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::CloudErrorBody;

/// Visibility of a field as a set over read/create/update.
///
/// `READ` means the field appears in responses; `CREATE` that a client may
/// supply it when the resource is created; `UPDATE` that a client may
/// change it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibilityFlags(u8);

impl VisibilityFlags {
    pub const NONE: VisibilityFlags = VisibilityFlags(0);
    pub const READ: VisibilityFlags = VisibilityFlags(1);
    pub const CREATE: VisibilityFlags = VisibilityFlags(1 << 1);
    pub const UPDATE: VisibilityFlags = VisibilityFlags(1 << 2);

    /// Fields without any annotated ancestor are fully visible.
    pub const DEFAULT: VisibilityFlags = VisibilityFlags(1 | 1 << 1 | 1 << 2);

    pub const fn union(self, other: VisibilityFlags) -> VisibilityFlags {
        VisibilityFlags(self.0 | other.0)
    }

    pub const fn contains(self, other: VisibilityFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Readable but neither creatable nor updatable.
    pub fn read_only(self) -> bool {
        self == VisibilityFlags::READ
    }

    pub fn can_create(self) -> bool {
        self.contains(VisibilityFlags::CREATE)
    }

    pub fn can_update(self) -> bool {
        self.contains(VisibilityFlags::UPDATE)
    }

    /// Parse a whitespace-separated flag list, e.g. `"read create"`.
    ///
    /// Returns `None` for unknown flag words (caller should error).
    pub fn parse(s: &str) -> Option<VisibilityFlags> {
        let mut flags = VisibilityFlags::NONE;
        for word in s.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "read" => flags = flags.union(VisibilityFlags::READ),
                "create" => flags = flags.union(VisibilityFlags::CREATE),
                "update" => flags = flags.union(VisibilityFlags::UPDATE),
                _ => return None,
            }
        }
        Some(flags)
    }
}

impl std::ops::BitOr for VisibilityFlags {
    type Output = VisibilityFlags;

    fn bitor(self, rhs: VisibilityFlags) -> VisibilityFlags {
        self.union(rhs)
    }
}

impl fmt::Display for VisibilityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        if self.contains(VisibilityFlags::READ) {
            words.push("read");
        }
        if self.contains(VisibilityFlags::CREATE) {
            words.push("create");
        }
        if self.contains(VisibilityFlags::UPDATE) {
            words.push("update");
        }
        write!(f, "{}", words.join(" "))
    }
}

/// One node of a resource kind's declared wire-field tree.
///
/// Field names are the wire (JSON) names. A node either carries an explicit
/// annotation or inherits the nearest annotated ancestor's flags when the
/// table is built.
#[derive(Debug, Clone)]
pub struct FieldTree {
    name: &'static str,
    flags: Option<VisibilityFlags>,
    children: Vec<FieldTree>,
}

impl FieldTree {
    /// A field with an explicit visibility annotation. The annotation also
    /// becomes the default for all descendants.
    pub fn annotated(name: &'static str, flags: VisibilityFlags) -> FieldTree {
        FieldTree {
            name,
            flags: Some(flags),
            children: Vec::new(),
        }
    }

    /// A field that inherits its nearest annotated ancestor's flags.
    pub fn inherited(name: &'static str) -> FieldTree {
        FieldTree {
            name,
            flags: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<FieldTree>) -> FieldTree {
        self.children = children;
        self
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// The resolved mapping of every declared field path to its visibility.
///
/// Built once per resource kind at startup and immutable afterwards. Lookup
/// keys are dotted wire paths without subscripts; all elements of a list or
/// map share their container's entry.
#[derive(Debug, Clone)]
pub struct VisibilityTable {
    entries: BTreeMap<String, VisibilityFlags>,
}

impl VisibilityTable {
    /// Resolve a declared field tree into a complete table.
    ///
    /// Depth-first: an unannotated node takes the nearest annotated
    /// ancestor's flags, [`VisibilityFlags::DEFAULT`] at the root; an
    /// explicit annotation always wins.
    ///
    /// # Panics
    ///
    /// Panics if two sibling nodes share a name. That is a bug in a
    /// compiled-in declaration, not a request-time condition, so it fails
    /// at construction.
    pub fn build(roots: &[FieldTree]) -> VisibilityTable {
        let mut entries = BTreeMap::new();
        for node in roots {
            insert_node(&mut entries, node, "", VisibilityFlags::DEFAULT);
        }
        VisibilityTable { entries }
    }

    /// Replace the flags at one path, narrowing (or widening) a table copy
    /// for an individual API version. Descendants that inherited the old
    /// flags are rewritten too, so the override behaves like re-annotating
    /// the declaration.
    ///
    /// # Panics
    ///
    /// Panics if the path is not in the table; overriding a field that does
    /// not exist is a declaration bug.
    pub fn override_path(mut self, path: &str, flags: VisibilityFlags) -> VisibilityTable {
        let old = match self.entries.get(path) {
            Some(flags) => *flags,
            None => panic!("visibility override for unknown field path '{path}'"),
        };

        let descendant_prefix = format!("{path}.");
        for (key, value) in self.entries.iter_mut() {
            if key == path || (key.starts_with(&descendant_prefix) && *value == old) {
                *value = flags;
            }
        }
        self
    }

    pub fn get(&self, path: &str) -> Option<VisibilityFlags> {
        self.entries.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VisibilityFlags)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn effective(&self, path: &str) -> VisibilityFlags {
        self.get(path).unwrap_or(VisibilityFlags::DEFAULT)
    }
}

fn insert_node(
    entries: &mut BTreeMap<String, VisibilityFlags>,
    node: &FieldTree,
    prefix: &str,
    inherited: VisibilityFlags,
) {
    let path = join(prefix, node.name);
    let flags = node.flags.unwrap_or(inherited);

    if entries.insert(path.clone(), flags).is_some() {
        panic!("duplicate field path '{path}' in visibility declaration");
    }

    for child in &node.children {
        insert_node(entries, child, &path, flags);
    }
}

/// Compare a candidate wire document against the currently persisted one
/// and report every change outside the permitted visibility.
///
/// `current` is the persisted resource rendered in the same wire shape; for
/// a create it is the fully-defaulted skeleton, so candidate values equal
/// to a version default always pass. Fields the candidate omits (or sends
/// as JSON null) are skipped: the wire contract omits unset optionals, and
/// normalization only copies what was present.
///
/// Does not short-circuit; one error is produced per offending path.
/// Resubmitting an unmodified read (`candidate == current`) yields no
/// errors for any flags.
pub fn enforce(
    table: &VisibilityTable,
    candidate: &Value,
    current: &Value,
    updating: bool,
) -> Vec<CloudErrorBody> {
    let mut walk = Walk {
        table,
        updating,
        errs: Vec::new(),
    };
    walk.recurse(candidate, current, "", "", "");
    walk.errs
}

struct Walk<'a> {
    table: &'a VisibilityTable,
    updating: bool,
    errs: Vec<CloudErrorBody>,
}

impl Walk<'_> {
    // `map_key` is the table lookup key and never includes subscripts.
    // `namespace`/`fieldname` follow the reported target path and do.
    fn recurse(
        &mut self,
        candidate: &Value,
        current: &Value,
        map_key: &str,
        namespace: &str,
        fieldname: &str,
    ) {
        match candidate {
            // Absent-or-null means "no change requested".
            Value::Null => {}

            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                if candidate != current {
                    self.check_flags(map_key, namespace, fieldname);
                }
            }

            Value::Array(items) => {
                let empty = Vec::new();
                let cur_items = current.as_array().unwrap_or(&empty);
                if items.len() != cur_items.len() {
                    self.check_flags(map_key, namespace, fieldname);
                } else {
                    for (i, item) in items.iter().enumerate() {
                        self.recurse(
                            item,
                            &cur_items[i],
                            map_key,
                            namespace,
                            &format!("{fieldname}[{i}]"),
                        );
                    }
                }
            }

            Value::Object(fields) => {
                if self.is_record(fields, current, map_key) {
                    let child_namespace = join(namespace, fieldname);
                    for (key, child) in fields {
                        let child_key = join(map_key, key);
                        let cur_child = current.get(key).unwrap_or(&Value::Null);
                        self.recurse(child, cur_child, &child_key, &child_namespace, key);
                    }
                } else {
                    self.recurse_map(fields, current, map_key, namespace, fieldname);
                }
            }
        }
    }

    // Map-valued fields follow replace semantics on the wire, so a changed
    // key set is itself a change to the field. Entries recurse under the
    // map's own table entry.
    fn recurse_map(
        &mut self,
        fields: &serde_json::Map<String, Value>,
        current: &Value,
        map_key: &str,
        namespace: &str,
        fieldname: &str,
    ) {
        let empty = serde_json::Map::new();
        let cur_fields = current.as_object().unwrap_or(&empty);

        let keys_equal =
            fields.len() == cur_fields.len() && fields.keys().all(|k| cur_fields.contains_key(k));

        if !keys_equal && !self.check_flags(map_key, namespace, fieldname) {
            return;
        }

        for (key, child) in fields {
            let cur_child = cur_fields.get(key).unwrap_or(&Value::Null);
            self.recurse(
                child,
                cur_child,
                map_key,
                namespace,
                &format!("{fieldname}[{key}]"),
            );
        }
    }

    // An object is a declared record when its keys resolve in the table;
    // otherwise its keys are map entries. The table is complete over
    // declared fields, so one resolving key settles it.
    fn is_record(
        &self,
        fields: &serde_json::Map<String, Value>,
        current: &Value,
        map_key: &str,
    ) -> bool {
        if let Some(key) = fields.keys().next() {
            return self.table.contains(&join(map_key, key));
        }
        // Empty candidate object: decide from the persisted side.
        match current.as_object().and_then(|m| m.keys().next()) {
            Some(key) => self.table.contains(&join(map_key, key)),
            None => true,
        }
    }

    // Returns false when an error was recorded, so containers can skip
    // recursing into a field already reported.
    fn check_flags(&mut self, map_key: &str, namespace: &str, fieldname: &str) -> bool {
        let flags = self.table.effective(map_key);

        let message = if self.updating && !flags.can_update() {
            Some(format!("Field '{fieldname}' cannot be updated"))
        } else if !self.updating && !flags.can_create() {
            if flags.read_only() {
                Some(format!("Field '{fieldname}' is read-only"))
            } else {
                Some(format!("Field '{fieldname}' cannot be set on create"))
            }
        } else {
            None
        };

        match message {
            Some(message) => {
                self.errs.push(CloudErrorBody::invalid_request_content(
                    message,
                    join(namespace, fieldname),
                ));
                false
            }
            None => true,
        }
    }
}
