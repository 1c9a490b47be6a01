//! Arranging file change nodes as a flat list or a directory tree.

use crate::node::FileChangeNode;
use crate::tree_item::TreeItem;
use pr_review_config::FileListLayout;

/// Node in the file tree. Files refer to their change node by index.
#[derive(Debug, Clone)]
struct TreeNode {
    name: String,
    index: Option<usize>,
    children: Vec<TreeNode>,
    expanded: bool,
}

impl TreeNode {
    fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            children: Vec::new(),
            expanded: true,
        }
    }

    fn file(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
            children: Vec::new(),
            expanded: false,
        }
    }

    fn is_directory(&self) -> bool {
        self.index.is_none()
    }

    fn insert_path(&mut self, parts: &[&str], index: usize) {
        match parts {
            [] => {}
            [name] => self.children.push(TreeNode::file(*name, index)),
            [dir_name, rest @ ..] => {
                let child = self
                    .children
                    .iter_mut()
                    .find(|c| c.name == *dir_name && c.is_directory());

                if let Some(dir) = child {
                    dir.insert_path(rest, index);
                } else {
                    let mut new_dir = TreeNode::directory(*dir_name);
                    new_dir.insert_path(rest, index);
                    self.children.push(new_dir);
                }
            }
        }
    }

    /// Directories first, then files, both alphabetically.
    fn sort_recursive(&mut self) {
        self.children
            .sort_by(|a, b| match (a.is_directory(), b.is_directory()) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.name.cmp(&b.name),
            });

        for child in &mut self.children {
            child.sort_recursive();
        }
    }

    fn flatten_recursive(
        &self,
        depth: usize,
        is_last: bool,
        ancestor_has_next: &[bool],
        result: &mut Vec<FlatFileEntry>,
    ) {
        result.push(FlatFileEntry {
            depth,
            name: self.name.clone(),
            index: self.index,
            is_expanded: self.expanded,
            is_last,
            ancestor_has_next: ancestor_has_next.to_vec(),
        });

        if !self.expanded {
            return;
        }

        let mut child_ancestor_has_next = ancestor_has_next.to_vec();
        if depth > 0 {
            child_ancestor_has_next.push(!is_last);
        }
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.flatten_recursive(depth + 1, i + 1 == count, &child_ancestor_has_next, result);
        }
    }

    fn toggle_at_path(&mut self, parts: &[&str]) -> bool {
        let Some((first, rest)) = parts.split_first() else {
            return false;
        };
        let Some(child) = self
            .children
            .iter_mut()
            .find(|c| c.name == *first && c.is_directory())
        else {
            return false;
        };

        if rest.is_empty() {
            child.expanded = !child.expanded;
            true
        } else {
            child.toggle_at_path(rest)
        }
    }
}

/// The file changes of a pull request in display order.
#[derive(Debug, Clone)]
pub struct FileTree {
    layout: FileListLayout,
    root: TreeNode,
}

impl FileTree {
    /// Arrange `nodes` with `layout`. Flat lists keep the order of `nodes`.
    pub fn new(nodes: &[FileChangeNode], layout: FileListLayout) -> Self {
        let mut root = TreeNode::directory("");

        match layout {
            FileListLayout::Flat => {
                root.children = nodes
                    .iter()
                    .enumerate()
                    .map(|(i, node)| TreeNode::file(node.file_name(), i))
                    .collect();
            }
            FileListLayout::Tree => {
                for (i, node) in nodes.iter().enumerate() {
                    let file_name = node.file_name().trim_start_matches("./");
                    let parts: Vec<&str> = file_name.split('/').filter(|p| !p.is_empty()).collect();
                    root.insert_path(&parts, i);
                }
                root.sort_recursive();
            }
        }

        Self { layout, root }
    }

    pub fn layout(&self) -> FileListLayout {
        self.layout
    }

    /// Expand or collapse the directory at `path`. Returns `false` when no
    /// such directory exists.
    pub fn toggle(&mut self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        self.root.toggle_at_path(&parts)
    }

    /// Visible entries, respecting collapsed directories.
    pub fn flatten(&self) -> Vec<FlatFileEntry> {
        let mut result = Vec::new();
        let count = self.root.children.len();
        for (i, child) in self.root.children.iter().enumerate() {
            child.flatten_recursive(0, i + 1 == count, &[], &mut result);
        }
        result
    }

    /// Tree items of the visible entries.
    pub fn tree_items(&self, nodes: &[FileChangeNode]) -> Vec<TreeItem> {
        self.flatten()
            .iter()
            .filter_map(|entry| entry.tree_item(nodes, self.layout))
            .collect()
    }
}

/// A flattened file tree entry for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileEntry {
    /// Nesting depth (0 = top level).
    pub depth: usize,
    /// File or directory name. Flat lists use the full file name.
    pub name: String,
    /// Index of the file change node, `None` for directories.
    pub index: Option<usize>,
    pub is_expanded: bool,
    /// Whether this is the last item in its parent.
    pub is_last: bool,
    /// For each ancestor level below the top, whether that ancestor has more
    /// siblings below it.
    pub ancestor_has_next: Vec<bool>,
}

impl FlatFileEntry {
    pub fn is_dir(&self) -> bool {
        self.index.is_none()
    }

    /// Tree guide lines for this entry, e.g. `│  └─ `.
    pub fn tree_prefix(&self) -> String {
        if self.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for &has_next in &self.ancestor_has_next {
            prefix.push_str(if has_next { "│  " } else { "   " });
        }
        prefix.push_str(if self.is_last { "└─ " } else { "├─ " });
        prefix
    }

    /// Tree item for this entry. In the tree layout the directory is shown
    /// by the tree itself, so file items carry no description.
    pub fn tree_item(&self, nodes: &[FileChangeNode], layout: FileListLayout) -> Option<TreeItem> {
        match self.index {
            None => Some(TreeItem::directory(self.name.as_str(), self.is_expanded)),
            Some(index) => {
                let node = nodes.get(index)?;
                let mut item = node.tree_item();
                if layout == FileListLayout::Tree {
                    item.description.clear();
                }
                Some(item)
            }
        }
    }
}
