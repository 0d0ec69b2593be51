//! Top-chain reduction of search results.
//!
//! Deleting a folder removes everything below it, so any item under a folder
//! that is itself scheduled for deletion is redundant. [`reduce`] collapses an
//! item set to the minimal set of deletions with the same effect.

use std::cmp::Ordering;

use crate::search::ItemRecord;

/// Items that survived reduction, in depth-first path order.
///
/// No element lies below a folder element. Only folders cover their
/// descendants, so a file and a path below it are both kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    items: Vec<ItemRecord>,
}

impl DeletionPlan {
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<ItemRecord> {
        self.items
    }
}

impl<'a> IntoIterator for &'a DeletionPlan {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// `true` iff `descendant` lies strictly below `ancestor`.
pub fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    descendant.len() > ancestor.len()
        && descendant.starts_with(ancestor)
        && descendant.as_bytes()[ancestor.len()] == b'/'
}

/// Compare paths segment by segment, so `a` < `a/b` < `a-b`.
fn compare_paths(left: &str, right: &str) -> Ordering {
    left.split('/').cmp(right.split('/'))
}

/// Collapse `items` to their minimal covering set. Runs in O(n log n).
pub fn reduce(items: impl IntoIterator<Item = ItemRecord>) -> DeletionPlan {
    let mut keyed: Vec<(String, ItemRecord)> = items
        .into_iter()
        .map(|item| (item.full_path(), item))
        .collect();

    // Folders sort first among equal paths so dedup keeps the folder.
    keyed.sort_by(|(left_path, left), (right_path, right)| {
        compare_paths(left_path, right_path).then(left.kind().cmp(&right.kind()))
    });
    keyed.dedup_by(|(current, _), (previous, _)| current == previous);

    let mut open_folders: Vec<String> = Vec::new();
    let mut retained = Vec::with_capacity(keyed.len());

    for (path, item) in keyed {
        while let Some(top) = open_folders.last() {
            if is_ancestor(top, &path) {
                break;
            }
            open_folders.pop();
        }
        if !open_folders.is_empty() {
            continue;
        }
        if item.is_folder() {
            open_folders.push(path);
        }
        retained.push(item);
    }

    DeletionPlan { items: retained }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(plan: &DeletionPlan) -> Vec<String> {
        plan.iter().map(ItemRecord::full_path).collect()
    }

    #[test]
    fn test_reduce_example() {
        let plan = reduce(vec![
            ItemRecord::folder("repo", "a"),
            ItemRecord::file("repo", "a/b.txt"),
            ItemRecord::file("repo", "a/c/d.txt"),
            ItemRecord::file("repo", "x.txt"),
        ]);
        assert_eq!(
            plan.items(),
            &[
                ItemRecord::folder("repo", "a"),
                ItemRecord::file("repo", "x.txt")
            ]
        );
    }

    #[test]
    fn test_sibling_prefix_is_not_an_ancestor() {
        let plan = reduce(vec![
            ItemRecord::folder("repo", "a"),
            ItemRecord::file("repo", "a-b/c.txt"),
            ItemRecord::file("repo", "ab.txt"),
            ItemRecord::file("repo", "a/z.txt"),
        ]);
        assert_eq!(paths(&plan), vec!["repo/a", "repo/a-b/c.txt", "repo/ab.txt"]);
    }

    #[test]
    fn test_files_never_cover_other_items() {
        let plan = reduce(vec![
            ItemRecord::file("repo", "a"),
            ItemRecord::file("repo", "a/b.txt"),
        ]);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_duplicates_are_removed() {
        let plan = reduce(vec![
            ItemRecord::file("repo", "x.txt"),
            ItemRecord::file("repo", "x.txt"),
            ItemRecord::file("repo", "a"),
            ItemRecord::folder("repo", "a"),
        ]);
        assert_eq!(
            plan.items(),
            &[
                ItemRecord::folder("repo", "a"),
                ItemRecord::file("repo", "x.txt")
            ]
        );
    }

    #[test]
    fn test_nested_folders_keep_outermost() {
        let plan = reduce(vec![
            ItemRecord::folder("repo", "a/b/c"),
            ItemRecord::folder("repo", "a/b"),
            ItemRecord::folder("repo", "a"),
            ItemRecord::folder("repo", "b"),
            ItemRecord::file("repo", "b/c/d"),
        ]);
        assert_eq!(paths(&plan), vec!["repo/a", "repo/b"]);
    }

    #[test]
    fn test_repositories_are_independent() {
        let plan = reduce(vec![
            ItemRecord::folder("libs", "a"),
            ItemRecord::file("libs-release", "a/b.txt"),
        ]);
        assert_eq!(paths(&plan), vec!["libs/a", "libs-release/a/b.txt"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(reduce(Vec::new()).is_empty());
    }

    #[test]
    fn test_is_ancestor() {
        assert!(is_ancestor("repo/a", "repo/a/b"));
        assert!(!is_ancestor("repo/a", "repo/a"));
        assert!(!is_ancestor("repo/a", "repo/ab"));
        assert!(!is_ancestor("repo/a/b", "repo/a"));
    }
}
