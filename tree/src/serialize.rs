use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use crate::error::TreeError;
use crate::id::NodeId;
use crate::node::Node;
use crate::traverse::{NodeCmp, order_siblings};
use crate::tree::Tree;

/// Options for [`Tree::to_dict`] and [`Tree::to_json`].
pub struct SerializeOptions<'f, D> {
    /// Subtree to serialize; the root when `None`.
    pub start: Option<NodeId>,
    /// Sort siblings (by tag unless `cmp` is given). Defaults to true.
    pub sort: bool,
    pub cmp: Option<&'f NodeCmp<D>>,
    pub reverse: bool,
    /// Carry each node's payload under a `"data"` key (null when absent).
    pub with_data: bool,
}

impl<D> Default for SerializeOptions<'_, D> {
    fn default() -> Self {
        Self {
            start: None,
            sort: true,
            cmp: None,
            reverse: false,
            with_data: false,
        }
    }
}

impl<D: Serialize> Tree<D> {
    /// Nested mapping keyed by tag, with a `children` list of recursively
    /// serialized child mappings. Leaves collapse to their bare tag string
    /// (or `{tag: {"data": payload}}` with `with_data`); collapsed nodes are
    /// serialized as leaves regardless of actual children.
    pub fn to_dict(&self, options: &SerializeOptions<'_, D>) -> Result<Value, TreeError> {
        let start = match &options.start {
            Some(id) => id.clone(),
            None => self
                .root()
                .cloned()
                .ok_or(TreeError::EmptyTree)?,
        };
        self.dict_node(&start, options)
    }

    fn dict_node(
        &self,
        id: &NodeId,
        options: &SerializeOptions<'_, D>,
    ) -> Result<Value, TreeError> {
        let node = self.get(id)?;
        let tag = node.tag().to_owned();

        let mut children = Vec::new();
        if node.expanded() {
            let mut siblings: Vec<&Node<D>> = node
                .children()
                .iter()
                .filter_map(|child| self.get_node(child))
                .collect();
            if options.sort {
                match options.cmp {
                    Some(cmp) => order_siblings(&mut siblings, Some(cmp), options.reverse),
                    None => {
                        let by_tag: &NodeCmp<D> = &|a, b| a.tag().cmp(b.tag());
                        order_siblings(&mut siblings, Some(by_tag), options.reverse);
                    }
                }
            } else {
                order_siblings(&mut siblings, None, options.reverse);
            }
            for child in siblings {
                children.push(self.dict_node(child.id(), options)?);
            }
        }

        if children.is_empty() {
            // minimal leaf representation
            if options.with_data {
                let mut body = Map::new();
                body.insert("data".to_owned(), serde_json::to_value(node.data())?);
                let mut entry = Map::new();
                entry.insert(tag, Value::Object(body));
                return Ok(Value::Object(entry));
            }
            return Ok(Value::String(tag));
        }

        let mut body = Map::new();
        body.insert("children".to_owned(), Value::Array(children));
        if options.with_data {
            body.insert("data".to_owned(), serde_json::to_value(node.data())?);
        }
        let mut entry = Map::new();
        entry.insert(tag, Value::Object(body));
        Ok(Value::Object(entry))
    }

    /// The mapping of [`to_dict`](Self::to_dict) rendered as a JSON string
    /// with non-ASCII characters escaped (`", "` / `": "` separators, the
    /// shape external consumers expect).
    pub fn to_json(&self, options: &SerializeOptions<'_, D>) -> Result<String, TreeError> {
        let value = self.to_dict(options)?;
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
        value.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// `serde_json` formatter producing `", "` and `": "` separators and
/// `\uXXXX` escapes for every non-ASCII character (surrogate pairs above
/// the BMP).
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn family() -> Tree<()> {
        let mut tree = Tree::new();
        tree.create_node(Some("Hárry"), Some(id("hárry")), None, None)
            .unwrap();
        tree.create_node(Some("Jane"), Some(id("jane")), Some(&id("hárry")), None)
            .unwrap();
        tree.create_node(Some("Bill"), Some(id("bill")), Some(&id("hárry")), None)
            .unwrap();
        tree.create_node(Some("Diane"), Some(id("diane")), Some(&id("jane")), None)
            .unwrap();
        tree.create_node(Some("George"), Some(id("george")), Some(&id("bill")), None)
            .unwrap();
        tree
    }

    #[test]
    fn to_json_sorted_by_tag() {
        let tree = family();
        assert_eq!(
            tree.to_json(&SerializeOptions::default()).unwrap(),
            "{\"H\\u00e1rry\": {\"children\": [{\"Bill\": {\"children\": [\"George\"]}}, \
             {\"Jane\": {\"children\": [\"Diane\"]}}]}}"
        );
    }

    #[test]
    fn to_json_with_data_carries_null_payloads() {
        let tree = family();
        let options = SerializeOptions {
            with_data: true,
            ..SerializeOptions::default()
        };
        assert_eq!(
            tree.to_json(&options).unwrap(),
            "{\"H\\u00e1rry\": {\"children\": [{\"Bill\": {\"children\": \
             [{\"George\": {\"data\": null}}], \"data\": null}}, \
             {\"Jane\": {\"children\": [{\"Diane\": {\"data\": null}}], \"data\": null}}], \
             \"data\": null}}"
        );
    }

    #[test]
    fn leaves_never_carry_a_children_key() {
        let tree = family();
        let value = tree.to_dict(&SerializeOptions::default()).unwrap();
        let diane = &value["Hárry"]["children"][1]["Jane"]["children"][0];
        assert_eq!(diane, &Value::String("Diane".to_owned()));
    }

    #[test]
    fn unsorted_keeps_insertion_order() {
        let tree = family();
        let options = SerializeOptions {
            sort: false,
            ..SerializeOptions::default()
        };
        let value = tree.to_dict(&options).unwrap();
        let children = value["Hárry"]["children"].as_array().unwrap();
        assert_eq!(children[0]["Jane"]["children"][0], "Diane");
        assert_eq!(children[1]["Bill"]["children"][0], "George");
    }

    #[test]
    fn collapsed_node_serializes_as_leaf() {
        let mut tree = family();
        tree.get_mut(&id("jane")).unwrap().set_expanded(false);
        let value = tree.to_dict(&SerializeOptions::default()).unwrap();
        let children = value["Hárry"]["children"].as_array().unwrap();
        assert_eq!(children[1], "Jane");
    }

    #[test]
    fn payload_is_serialized_with_data() {
        let mut tree: Tree<&str> = Tree::new();
        tree.create_node(Some("Rose"), Some(id("rose")), None, Some("red"))
            .unwrap();
        let options = SerializeOptions {
            with_data: true,
            ..SerializeOptions::default()
        };
        assert_eq!(
            tree.to_json(&options).unwrap(),
            "{\"Rose\": {\"data\": \"red\"}}"
        );
    }

    #[test]
    fn serializing_a_subtree() {
        let tree = family();
        let options = SerializeOptions {
            start: Some(id("jane")),
            ..SerializeOptions::default()
        };
        assert_eq!(
            tree.to_json(&options).unwrap(),
            "{\"Jane\": {\"children\": [\"Diane\"]}}"
        );
    }

    #[test]
    fn empty_tree_fails() {
        let tree: Tree<()> = Tree::new();
        assert!(matches!(
            tree.to_dict(&SerializeOptions::default()),
            Err(TreeError::EmptyTree)
        ));
    }

    #[test]
    fn non_bmp_characters_use_surrogate_pairs() {
        let mut tree: Tree<()> = Tree::new();
        tree.create_node(Some("tree 🌳"), Some(id("t")), None, None)
            .unwrap();
        assert_eq!(
            tree.to_json(&SerializeOptions::default()).unwrap(),
            "\"tree \\ud83c\\udf33\""
        );
    }
}
