//! Text renderings of the index hierarchy and of individual tables.
//!
//! Presentation only: nothing here mutates the tree, and callers outside
//! the crate see these through [`BPlusTree::index_view`],
//! [`BPlusTree::table_view`] and the `Display` impl.

use std::fmt;

use crate::index::block::{BlockId, Body};
use crate::index::BPlusTree;
use crate::interval::Interval;

/// Records shown per table before the view is cut off.
const DISPLAYED_RECORDS: usize = 20;

const HEAD: &str = "├───";
const BLANK: &str = "│       ";

impl<K: Ord + Clone + fmt::Display, V> BPlusTree<K, V> {
    /// Renders the index hierarchy as indented text, one line per block
    /// plus one line per table slot, depth first. An empty tree renders as
    /// `(empty)`.
    pub fn index_view(&self) -> String {
        if self.is_empty() {
            return "(empty)".to_string();
        }
        let mut out = String::new();
        self.render_block(self.root, 0, &mut out);
        out.push_str("(end)\n");
        out
    }

    fn render_block(&self, id: BlockId, level: usize, out: &mut String) {
        let block = self.arena.get(id);
        if level > 0 {
            out.push_str(&BLANK.repeat(level - 1));
            out.push_str(HEAD);
        }
        match &block.body {
            Body::Leaf(_) => {
                let page_id = self.leaves.iter().position(|&leaf| leaf == id);
                match page_id {
                    Some(page_id) => out.push_str(&format!("Page id {}: ", page_id)),
                    None => out.push_str("Page: "),
                }
                out.push_str(&render_range(&block.covering_range()));
                out.push('\n');
                for range in block.slot_ranges() {
                    out.push_str(&BLANK.repeat(level));
                    out.push_str(HEAD);
                    out.push_str("Table: ");
                    out.push_str(&render_range(range));
                    out.push('\n');
                }
            }
            Body::Branch(children) => {
                out.push_str(&render_range(&block.covering_range()));
                out.push('\n');
                for &child in children {
                    self.render_block(child, level + 1, out);
                }
            }
        }
    }
}

impl<K, V> BPlusTree<K, V>
where
    K: Ord + Clone + fmt::Display,
    V: fmt::Display,
{
    /// Renders the table at slot `pos` of page `page_id` as a boxed
    /// record/key/value listing, cut off after a fixed number of records.
    ///
    /// Page ids number the leaves left to right. Returns `None` when the
    /// page or slot does not exist.
    pub fn table_view(&self, page_id: usize, pos: usize) -> Option<String> {
        let leaf = *self.leaves.get(page_id)?;
        let block = self.arena.get(leaf);
        if pos >= block.len() {
            return None;
        }
        let table = &block.tables()[pos];
        let keys: Vec<String> = table
            .keys(DISPLAYED_RECORDS)
            .into_iter()
            .map(|key| key.to_string())
            .collect();
        let values: Vec<String> = table
            .values(DISPLAYED_RECORDS)
            .into_iter()
            .map(|value| value.to_string())
            .collect();
        Some(boxed_records(
            &keys,
            &values,
            table.len() > DISPLAYED_RECORDS,
        ))
    }
}

impl<K: Ord + Clone + fmt::Display, V> fmt::Display for BPlusTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.index_view())
    }
}

fn render_range<K: fmt::Display>(range: &Option<Interval<K>>) -> String {
    match range {
        Some(range) => range.to_string(),
        None => "(empty)".to_string(),
    }
}

fn column_width(cells: &[String], header: &str) -> usize {
    cells
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Lays out parallel key/value columns as a bordered text table; when
/// `truncated`, a trailer marks the hidden remainder.
fn boxed_records(keys: &[String], values: &[String], truncated: bool) -> String {
    let record_width = "record".len();
    let key_width = column_width(keys, "key");
    let value_width = column_width(values, "value");
    let border = format!(
        "+---{}---+---{}---+---{}---+\n",
        "-".repeat(record_width),
        "-".repeat(key_width),
        "-".repeat(value_width),
    );
    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&format!(
        "|   {:<record_width$}   |   {:<key_width$}   |   {:<value_width$}   |\n",
        "record", "key", "value",
    ));
    out.push_str(&border);
    for (record, (key, value)) in keys.iter().zip(values).enumerate() {
        out.push_str(&format!(
            "|   {:<record_width$}   |   {:<key_width$}   |   {:<value_width$}   |\n",
            record, key, value,
        ));
    }
    out.push_str(&border);
    if truncated {
        out.push_str("...(Rest of the records are hidden)\n");
        out.push_str(&border);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::table::OrderedTable;
    use crate::BPlusTree;

    fn filled(lo: i32, hi: i32) -> OrderedTable<i32, i32> {
        (lo..=hi).map(|k| (k, k)).collect()
    }

    #[test]
    fn empty_tree_renders_a_placeholder() {
        let tree: BPlusTree<i32, i32> = BPlusTree::new(4, 10).unwrap();
        assert_eq!(tree.index_view(), "(empty)");
        assert_eq!(tree.to_string(), "(empty)");
    }

    #[test]
    fn hierarchy_lists_pages_and_tables() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        tree.write(filled(1, 10)).unwrap();
        tree.write(filled(11, 20)).unwrap();
        let view = tree.index_view();
        assert!(view.starts_with("[1, 20]\n"));
        assert!(view.contains("Page id 0: [1, 20]"));
        assert!(view.contains("Table: [1, 10]"));
        assert!(view.contains("Table: [11, 20]"));
        assert!(view.ends_with("(end)\n"));
    }

    #[test]
    fn table_view_boxes_records_and_hides_the_tail() {
        let mut tree = BPlusTree::new(4, 100).unwrap();
        tree.write(filled(1, 30)).unwrap();
        let view = tree.table_view(0, 0).unwrap();
        assert!(view.contains("record"));
        assert!(view.contains("|   1 "));
        assert!(view.contains("...(Rest of the records are hidden)"));
        assert_eq!(tree.table_view(0, 1), None);
        assert_eq!(tree.table_view(5, 0), None);
    }
}
