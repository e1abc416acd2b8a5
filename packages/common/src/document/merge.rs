use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use super::{DocumentError, PDF_VERSION};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against malformed, cyclic `Parent` chains.
const MAX_TREE_DEPTH: usize = 32;

/// Concatenate the pages of `sources`, in order, into one new document.
///
/// All-or-nothing: the first unreadable source aborts the merge.
pub fn merge_documents(sources: &[Vec<u8>]) -> Result<Vec<u8>, DocumentError> {
    if sources.is_empty() {
        return Err(DocumentError::Empty);
    }

    let mut merged = Document::with_version(PDF_VERSION);
    let pages_id = merged.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for (index, bytes) in sources.iter().enumerate() {
        let mut doc =
            Document::load_mem(bytes).map_err(|source| DocumentError::Parse { index, source })?;
        doc.renumber_objects_with(merged.max_id + 1);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(DocumentError::NoPages { index });
        }

        for page_id in page_ids {
            let page = flatten_page(&doc, page_id, pages_id)?;
            doc.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        if let Some(&(max_id, _)) = doc.objects.keys().next_back() {
            merged.max_id = merged.max_id.max(max_id);
        }
        merged.objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_page_tree_root(object)),
        );
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    merged.save_to(&mut out)?;
    Ok(out)
}

/// Number of pages in a PDF document.
pub fn page_count(bytes: &[u8]) -> Result<usize, DocumentError> {
    Ok(Document::load_mem(bytes)?.get_pages().len())
}

/// Copy a page dictionary, pulling down inherited attributes and re-parenting
/// it under `parent`.
fn flatten_page(
    doc: &Document,
    page_id: ObjectId,
    parent: ObjectId,
) -> Result<Dictionary, DocumentError> {
    let mut page = doc.get_object(page_id)?.as_dict()?.clone();

    let mut ancestor = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = ancestor else { break };
        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        ancestor = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.set("Parent", parent);
    Ok(page)
}

/// Catalogs, page-tree nodes and outlines of a source are rebuilt or dropped.
fn is_page_tree_root(object: &Object) -> bool {
    let type_name = object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name);
    matches!(
        type_name,
        Ok(b"Catalog" | b"Pages" | b"Outlines" | b"Outline")
    )
}
