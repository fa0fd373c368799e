//! The editable field forest.
//!
//! Every structural mutation ends with [`FieldTree::reassign_ids`], so ids are
//! always the preorder position of each node, starting at 0.

use crate::errors::DsError;
use crate::model::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree {
    fields: Vec<Field>,
}

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing forest and renumbers it.
    pub fn from_fields(fields: Vec<Field>) -> Self {
        let mut tree = Self { fields };
        tree.reassign_ids();
        tree
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of nodes, nested ones included.
    pub fn len(&self) -> usize {
        self.fields.iter().map(Field::subtree_len).sum()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn replace(&mut self, fields: Vec<Field>) {
        self.fields = fields;
        self.reassign_ids();
    }

    /// Appends at top level and returns the id the field received.
    pub fn append(&mut self, field: Field) -> usize {
        let id = self.len();
        self.fields.push(field);
        self.reassign_ids();
        id
    }

    /// Inserts before the top-level `index`; `index == len` appends.
    pub fn insert_before(&mut self, index: usize, field: Field) -> Result<(), DsError> {
        if index > self.fields.len() {
            return Err(DsError::validation(format!(
                "insert position {} is past the end ({} top-level fields)",
                index,
                self.fields.len()
            )));
        }
        self.fields.insert(index, field);
        self.reassign_ids();
        Ok(())
    }

    /// Appends `field` into the first aggregate (preorder) named `parent`.
    pub fn attach(&mut self, parent: &str, field: Field) -> Result<(), DsError> {
        let Some(target) = find_aggregate_mut(&mut self.fields, parent) else {
            let reason = if self.preorder().iter().any(|f| f.name == parent) {
                format!("'{}' is not an aggregate and cannot hold fields", parent)
            } else {
                format!("no field named '{}'", parent)
            };
            return Err(DsError::validation(reason));
        };
        target.children.push(field);
        self.reassign_ids();
        Ok(())
    }

    /// Removes the node with `id` (and its subtree).
    pub fn remove(&mut self, id: usize) -> Option<Field> {
        let removed = remove_by_id(&mut self.fields, id);
        if removed.is_some() {
            self.reassign_ids();
        }
        removed
    }

    pub fn find(&self, id: usize) -> Option<&Field> {
        self.preorder().into_iter().find(|field| field.id == id)
    }

    /// All nodes in preorder.
    pub fn preorder(&self) -> Vec<&Field> {
        let mut out = Vec::with_capacity(self.len());
        collect_preorder(&self.fields, &mut out);
        out
    }

    pub fn reassign_ids(&mut self) {
        let mut next = 0;
        renumber(&mut self.fields, &mut next);
    }
}

fn renumber(fields: &mut [Field], next: &mut usize) {
    for field in fields {
        field.id = *next;
        *next += 1;
        renumber(&mut field.children, next);
    }
}

fn collect_preorder<'a>(fields: &'a [Field], out: &mut Vec<&'a Field>) {
    for field in fields {
        out.push(field);
        collect_preorder(&field.children, out);
    }
}

fn find_aggregate_mut<'a>(fields: &'a mut [Field], name: &str) -> Option<&'a mut Field> {
    for field in fields {
        if field.is_aggregate && field.name == name {
            return Some(field);
        }
        if let Some(found) = find_aggregate_mut(&mut field.children, name) {
            return Some(found);
        }
    }
    None
}

fn remove_by_id(fields: &mut Vec<Field>, id: usize) -> Option<Field> {
    if let Some(pos) = fields.iter().position(|field| field.id == id) {
        return Some(fields.remove(pos));
    }
    fields
        .iter_mut()
        .find_map(|field| remove_by_id(&mut field.children, id))
}
