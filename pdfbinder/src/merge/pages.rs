//! Page tree helpers.
//!
//! Pages copied out of a source document lose their parent chain, so any
//! attribute they inherit from an intermediate `Pages` node has to be copied
//! onto the page itself first. References into the source page tree are
//! relinked once the copies exist.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::{HashMap, HashSet};

/// Page attributes a page may inherit from its ancestors.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Upper bound on parent links followed, guarding against cyclic trees.
const MAX_TREE_DEPTH: usize = 64;

/// Clone a page dictionary with inherited attributes made explicit.
///
/// Attributes set on the page win over inherited ones; the nearest ancestor
/// wins among ancestors. The returned dictionary has no `Parent` entry.
///
/// # Errors
///
/// Returns an error if `page_id` does not name a dictionary in `doc`.
pub fn flatten_page(doc: &Document, page_id: ObjectId) -> lopdf::Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut parent = parent_of(&page);

    for _ in 0..MAX_TREE_DEPTH {
        let Some(parent_id) = parent else {
            break;
        };
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        for key in INHERITABLE_KEYS {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }

        parent = parent_of(node);
    }

    page.remove(b"Parent");
    Ok(page)
}

/// Build a flat `Pages` node over `kids`.
pub fn page_tree(kids: &[ObjectId]) -> Dictionary {
    dictionary! {
        "Type" => "Pages",
        "Kids" => kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<Object>>(),
        "Count" => kids.len() as i64,
    }
}

/// Every page object of `doc` together with its `Pages` ancestors.
pub fn page_tree_nodes(doc: &Document) -> HashSet<ObjectId> {
    let mut nodes = HashSet::new();

    for page_id in doc.get_pages().into_values() {
        nodes.insert(page_id);

        let mut parent = doc.get_dictionary(page_id).ok().and_then(parent_of);
        for _ in 0..MAX_TREE_DEPTH {
            let Some(parent_id) = parent else {
                break;
            };
            if !nodes.insert(parent_id) {
                break;
            }
            parent = doc.get_dictionary(parent_id).ok().and_then(parent_of);
        }
    }

    nodes
}

/// Rewrite references inside `object`.
///
/// References found in `moved` point at their new target afterwards;
/// references into `dropped` become `null`.
pub fn relink(
    object: &mut Object,
    moved: &HashMap<ObjectId, ObjectId>,
    dropped: &HashSet<ObjectId>,
) {
    match object {
        Object::Reference(id) => {
            let id = *id;
            if let Some(&target) = moved.get(&id) {
                *object = Object::Reference(target);
            } else if dropped.contains(&id) {
                *object = Object::Null;
            }
        }
        Object::Array(items) => {
            for item in items {
                relink(item, moved, dropped);
            }
        }
        Object::Dictionary(dict) => relink_dictionary(dict, moved, dropped),
        Object::Stream(stream) => relink_dictionary(&mut stream.dict, moved, dropped),
        _ => {}
    }
}

fn relink_dictionary(
    dict: &mut Dictionary,
    moved: &HashMap<ObjectId, ObjectId>,
    dropped: &HashSet<ObjectId>,
) {
    for (_, value) in dict.iter_mut() {
        relink(value, moved, dropped);
    }
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}
