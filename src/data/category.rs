use roxmltree::{Document, Node};

use super::loader::{child, element_children, text_of};
use super::model::{Category, CategoryLevel, CategoryTriple};
use crate::error::{TidyError, TidyResult};

/// Look up the identifier of `name` under `level` in the category reference.
///
/// Returns an empty string when there is no reference, the level is missing
/// from it, or no entry carries that `Name`. Duplicate names: first wins.
pub fn resolve(name: &str, level: CategoryLevel, reference: Option<Node<'_, '_>>) -> String {
    find(name, level, reference).unwrap_or_default()
}

fn find(name: &str, level: CategoryLevel, reference: Option<Node<'_, '_>>) -> Option<String> {
    let level_node = child(reference?, level.tag())?;
    let entry = element_children(level_node).find(|e| e.attribute("Name") == Some(name))?;
    Some(
        element_children(entry)
            .next()
            .map(text_of)
            .unwrap_or_default(),
    )
}

/// Resolve all three category levels for a sample.
///
/// Per level the configured name wins over the one in the measurement
/// document; with neither the pair stays empty. In `strict` mode a requested
/// name that the reference document does not know is an error.
pub fn resolve_triple(
    overrides: &[Option<String>; 3],
    sample: Node<'_, '_>,
    reference: Option<&Document<'_>>,
    strict: bool,
) -> TidyResult<CategoryTriple> {
    let root = reference.map(|doc| doc.root_element());
    let mut triple = CategoryTriple::default();

    for level in CategoryLevel::ALL {
        let name = match &overrides[level.index()] {
            Some(name) => name.clone(),
            None => match child(sample, level.document_tag()) {
                Some(node) => text_of(node),
                None => continue,
            },
        };

        let id = match find(&name, level, root) {
            Some(id) => id,
            None if root.is_some() => {
                if strict {
                    return Err(TidyError::CategoryNotFound(name));
                }
                log::warn!("category '{name}' not found under {level} in category reference");
                String::new()
            }
            None => String::new(),
        };
        triple.0[level.index()] = Category { name, id };
    }

    Ok(triple)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = r#"<Categories>
  <First>
    <Category Name="Cola"><Guid>c-1</Guid></Category>
    <Category Name="Juice"><Guid>j-1</Guid></Category>
    <Category Name="Cola"><Guid>c-2</Guid></Category>
  </First>
  <Second>
    <Category Name="Diet"><Guid>d-1</Guid></Category>
  </Second>
</Categories>"#;

    #[test]
    fn first_match_wins() {
        let doc = Document::parse(REFERENCE).unwrap();
        let root = Some(doc.root_element());
        assert_eq!(resolve("Cola", CategoryLevel::First, root), "c-1");
        assert_eq!(resolve("Juice", CategoryLevel::First, root), "j-1");
    }

    #[test]
    fn missing_tree_level_or_name_is_empty() {
        let doc = Document::parse(REFERENCE).unwrap();
        let root = Some(doc.root_element());
        assert_eq!(resolve("Cola", CategoryLevel::First, None), "");
        assert_eq!(resolve("Cola", CategoryLevel::Third, root), "");
        assert_eq!(resolve("Water", CategoryLevel::First, root), "");
        // Levels are independent: a First-level name is unknown under Second.
        assert_eq!(resolve("Cola", CategoryLevel::Second, root), "");
    }

    #[test]
    fn overrides_beat_document_names() {
        let reference = Document::parse(REFERENCE).unwrap();
        let sample = Document::parse(
            "<Drink><Category1>Juice</Category1><Category2>Diet</Category2></Drink>",
        )
        .unwrap();
        let overrides = [Some("Cola".to_string()), None, None];

        let triple =
            resolve_triple(&overrides, sample.root_element(), Some(&reference), false).unwrap();
        assert_eq!(
            triple.get(CategoryLevel::First),
            &Category { name: "Cola".into(), id: "c-1".into() }
        );
        assert_eq!(triple.get(CategoryLevel::Second).id, "d-1");
        assert_eq!(triple.get(CategoryLevel::Third), &Category::default());
    }

    #[test]
    fn unknown_name_is_lenient_unless_strict() {
        let reference = Document::parse(REFERENCE).unwrap();
        let sample = Document::parse("<Drink><Category1>Water</Category1></Drink>").unwrap();
        let overrides = [None, None, None];

        let triple =
            resolve_triple(&overrides, sample.root_element(), Some(&reference), false).unwrap();
        assert_eq!(triple.get(CategoryLevel::First).name, "Water");
        assert_eq!(triple.get(CategoryLevel::First).id, "");

        let err = resolve_triple(&overrides, sample.root_element(), Some(&reference), true)
            .unwrap_err();
        assert!(matches!(err, TidyError::CategoryNotFound(name) if name == "Water"));

        // Without a reference document strict mode has nothing to check against.
        let triple = resolve_triple(&overrides, sample.root_element(), None, true).unwrap();
        assert_eq!(triple.get(CategoryLevel::First).id, "");
    }
}
