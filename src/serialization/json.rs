//! JSON serializer for the versioned BK-tree schema.
//!
//! The document nests one object per tree level, so both directions walk it
//! with an explicit stack. `serde_json` encodes and decodes every scalar
//! token (words, keys, ranks), and the structure around them is handled
//! here.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::{DeserializeOwned, Error as _, IgnoredAny};

use crate::dictionary::bk_tree::BkTree;
use crate::distance::DistanceFn;

use super::{
    assemble, parse_key, BkTreeSerializer, NodeRecord, SerializationError, FORMAT_VERSION,
};

/// JSON serializer for human-readable format.
pub struct JsonSerializer;

impl BkTreeSerializer for JsonSerializer {
    fn serialize<F, W>(tree: &BkTree<F>, mut writer: W) -> Result<(), SerializationError>
    where
        F: Fn(&str, &str) -> usize,
        W: Write,
    {
        write_document(tree, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn deserialize_with<F, R>(mut reader: R, distance: F) -> Result<BkTree<F>, SerializationError>
    where
        F: Fn(&str, &str) -> usize,
        R: Read,
    {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let (version, records) = Scanner::new(&input).document()?;
        if version != FORMAT_VERSION {
            return Err(SerializationError::UnsupportedVersion(version));
        }
        assemble(records, distance)
    }
}

impl JsonSerializer {
    /// Write `tree` to a file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save<F, P>(tree: &BkTree<F>, path: P) -> Result<(), SerializationError>
    where
        F: Fn(&str, &str) -> usize,
        P: AsRef<Path>,
    {
        let file = File::create(path.as_ref())?;
        Self::serialize(tree, BufWriter::new(file))?;
        tracing::debug!(path = %path.as_ref().display(), size = tree.size(), "bk-tree saved");
        Ok(())
    }

    /// Read a tree that uses standard edit distance from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid
    /// tree.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<BkTree<DistanceFn>, SerializationError> {
        let file = File::open(path.as_ref())?;
        let tree = Self::deserialize(BufReader::new(file))?;
        tracing::debug!(path = %path.as_ref().display(), size = tree.size(), "bk-tree loaded");
        Ok(tree)
    }
}

enum Emit {
    Open {
        node: usize,
        key: Option<usize>,
        comma: bool,
    },
    Close,
}

fn write_document<F, W>(tree: &BkTree<F>, writer: &mut W) -> Result<(), SerializationError>
where
    F: Fn(&str, &str) -> usize,
    W: Write,
{
    write!(writer, "{{\"version\":{},\"root\":", FORMAT_VERSION)?;
    let Some(root) = tree.root() else {
        writer.write_all(b"null}")?;
        return Ok(());
    };

    let mut stack = vec![Emit::Open {
        node: root,
        key: None,
        comma: false,
    }];
    while let Some(step) = stack.pop() {
        match step {
            // closes both the children map and the record
            Emit::Close => writer.write_all(b"}}")?,
            Emit::Open { node, key, comma } => {
                if comma {
                    writer.write_all(b",")?;
                }
                if let Some(key) = key {
                    write!(writer, "\"{}\":", key)?;
                }
                let (word, rank, children) = tree.node(node);
                writer.write_all(b"{\"word\":")?;
                serde_json::to_writer(&mut *writer, word)?;
                write!(writer, ",\"rank\":{},\"children\":{{", rank)?;

                stack.push(Emit::Close);
                stack.extend(children.iter().enumerate().rev().map(|(i, &(key, child))| {
                    Emit::Open {
                        node: child,
                        key: Some(key),
                        comma: i > 0,
                    }
                }));
            }
        }
    }
    writer.write_all(b"}")?;
    Ok(())
}

#[derive(Clone, Copy)]
enum Frame {
    /// Inside the record stored in this slot.
    Record(usize),
    /// Inside the children map of this slot.
    Children(usize),
}

/// Cursor over a JSON document that reads objects member by member.
struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Read the top-level object, returning its version and the records of
    /// its tree, parents first.
    fn document(&mut self) -> Result<(u32, Vec<NodeRecord>), SerializationError> {
        let mut version = None;
        let mut records = Vec::new();

        if self.open_object()? {
            loop {
                match self.key()?.as_str() {
                    "version" => version = Some(self.value::<u32>()?),
                    "root" if self.peek() == Some(b'{') => records = self.records()?,
                    "root" => {
                        self.value::<()>()?;
                        records.clear();
                    }
                    _ => {
                        self.value::<IgnoredAny>()?;
                    }
                }
                if !self.next_member()? {
                    break;
                }
            }
        }

        if self.peek().is_some() {
            return Err(self.error("trailing characters"));
        }
        let version = version.ok_or(SerializationError::MissingField("version"))?;
        Ok((version, records))
    }

    fn records(&mut self) -> Result<Vec<NodeRecord>, SerializationError> {
        let mut records = vec![NodeRecord::default()];
        let mut stack = vec![Frame::Record(0)];
        let mut has_member = self.open_object()?;

        while let Some(&frame) = stack.last() {
            if !has_member {
                stack.pop();
                if stack.is_empty() {
                    break;
                }
                has_member = self.next_member()?;
                continue;
            }

            let key = self.key()?;
            match frame {
                Frame::Record(slot) => match key.as_str() {
                    "word" => records[slot].word = Some(self.value()?),
                    "rank" => records[slot].rank = Some(self.value()?),
                    "children" => {
                        stack.push(Frame::Children(slot));
                        has_member = self.open_object()?;
                        continue;
                    }
                    _ => {
                        self.value::<IgnoredAny>()?;
                    }
                },
                Frame::Children(parent) => {
                    records.push(NodeRecord {
                        parent: Some((parent, parse_key(&key)?)),
                        ..NodeRecord::default()
                    });
                    stack.push(Frame::Record(records.len() - 1));
                    has_member = self.open_object()?;
                    continue;
                }
            }
            has_member = self.next_member()?;
        }
        Ok(records)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\n' | b'\r' | b'\t') = self.input.get(self.pos).copied() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), SerializationError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format_args!("expected `{}`", byte as char)))
        }
    }

    /// Consume `{`. Returns `false` (and consumes the `}`) for an empty
    /// object.
    fn open_object(&mut self) -> Result<bool, SerializationError> {
        self.expect(b'{')?;
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(false);
        }
        Ok(true)
    }

    /// Consume the separator after a member. Returns `false` once the
    /// object is closed.
    fn next_member(&mut self) -> Result<bool, SerializationError> {
        match self.peek() {
            Some(b',') => {
                self.pos += 1;
                Ok(true)
            }
            Some(b'}') => {
                self.pos += 1;
                Ok(false)
            }
            _ => Err(self.error("expected `,` or `}`")),
        }
    }

    fn key(&mut self) -> Result<String, SerializationError> {
        let key = self.value::<String>()?;
        self.expect(b':')?;
        Ok(key)
    }

    /// Decode the next value with `serde_json` and step past it.
    fn value<T: DeserializeOwned>(&mut self) -> Result<T, SerializationError> {
        let mut stream =
            serde_json::Deserializer::from_slice(&self.input[self.pos..]).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => {
                self.pos += stream.byte_offset();
                Ok(value)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn error(&self, message: impl fmt::Display) -> SerializationError {
        serde_json::Error::custom(format_args!("{} at byte {}", message, self.pos)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(tree: &BkTree) -> BkTree {
        let mut buffer = Vec::new();
        JsonSerializer::serialize(tree, &mut buffer).unwrap();
        JsonSerializer::deserialize(buffer.as_slice()).unwrap()
    }

    #[test]
    fn test_json_roundtrip() {
        let tree = BkTree::build(["cat", "cap", "bat", "cats"]);
        let loaded = round_trip(&tree);
        assert_eq!(loaded.size(), 4);
        assert_eq!(
            loaded.query("cat", 1, 10).unwrap(),
            tree.query("cat", 1, 10).unwrap()
        );
    }

    #[test]
    fn test_roundtrip_preserves_shape() {
        let tree = BkTree::build(["book", "books", "cake", "boo", "boon", "cook", "cape", "cart"]);
        let loaded = round_trip(&tree);
        assert_eq!(loaded.depth(), tree.depth());

        let mut original = Vec::new();
        let mut restored = Vec::new();
        JsonSerializer::serialize(&tree, &mut original).unwrap();
        JsonSerializer::serialize(&loaded, &mut restored).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_json_layout() {
        let tree = BkTree::build(["cat", "cap", "cats", "dog"]);
        let mut buffer = Vec::new();
        JsonSerializer::serialize(&tree, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["root"]["word"], "cat");
        assert_eq!(value["root"]["rank"], 1);
        // "cap" and "cats" are both 1 from "cat", so "cats" sits below "cap"
        assert_eq!(value["root"]["children"]["1"]["word"], "cap");
        assert_eq!(value["root"]["children"]["1"]["children"]["2"]["word"], "cats");
        assert_eq!(value["root"]["children"]["3"]["word"], "dog");
        assert_eq!(value["root"]["children"]["3"]["children"], serde_json::json!({}));
    }

    #[test]
    fn test_words_are_escaped() {
        let tree = BkTree::build(["say \"hi\"", "back\\slash", "tab\there"]);
        let loaded = round_trip(&tree);
        for word in ["say \"hi\"", "back\\slash", "tab\there"] {
            assert!(loaded.contains(word), "missing {:?}", word);
        }
    }

    #[test]
    fn test_empty_tree_is_null_root() {
        let mut buffer = Vec::new();
        JsonSerializer::serialize(&BkTree::new(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), r#"{"version":1,"root":null}"#);
        assert!(JsonSerializer::deserialize(buffer.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_accepts_any_member_order_and_whitespace() {
        let input = r#"
            {
              "root": {
                "children": { "1": { "rank": 2, "word": "cap" } },
                "rank": 1,
                "note": [1, {"nested": true}],
                "word": "cat"
              },
              "version": 1
            }
        "#;
        let tree = JsonSerializer::deserialize(input.as_bytes()).unwrap();
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.query("cap", 0, 1).unwrap()[0].rank, 2);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let input = r#"{"version":2,"root":null}"#;
        assert!(matches!(
            JsonSerializer::deserialize(input.as_bytes()),
            Err(SerializationError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_rejects_missing_version() {
        assert!(matches!(
            JsonSerializer::deserialize(r#"{"root":null}"#.as_bytes()),
            Err(SerializationError::MissingField("version"))
        ));
    }

    #[test]
    fn test_rejects_non_numeric_key() {
        let input = r#"{"version":1,"root":{"word":"cat","rank":1,"children":{"x":{"word":"cap","rank":2,"children":{}}}}}"#;
        assert!(matches!(
            JsonSerializer::deserialize(input.as_bytes()),
            Err(SerializationError::InvalidKey(key)) if key == "x"
        ));
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let input = r#"{"version":1,"root":{"word":"cat","rank":1,"children":{"1":{"word":"cap","rank":2},"1":{"word":"bat","rank":3}}}}"#;
        assert!(matches!(
            JsonSerializer::deserialize(input.as_bytes()),
            Err(SerializationError::DuplicateKey { key: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        for input in ["", "{", "[]", r#"{"version":1,"root":{"word":"cat","rank":1}"#, r#"{"version":1} x"#] {
            assert!(
                matches!(
                    JsonSerializer::deserialize(input.as_bytes()),
                    Err(SerializationError::Json(_))
                ),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_missing_children_defaults_to_leaf() {
        let input = r#"{"version":1,"root":{"word":"solo","rank":7}}"#;
        let tree = JsonSerializer::deserialize(input.as_bytes()).unwrap();
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.query("solo", 0, 1).unwrap()[0].rank, 7);
    }

    #[test]
    fn test_deep_chain_roundtrip() {
        // Distinct one-character words form a single chain, far deeper than
        // any nesting limit a recursive codec would allow
        let words: Vec<String> = (0..3_000u32)
            .filter_map(|n| char::from_u32(0x4E00 + n))
            .map(String::from)
            .collect();
        let tree = BkTree::build(&words);
        assert_eq!(tree.depth(), 2_999);

        let loaded = round_trip(&tree);
        assert_eq!(loaded.size(), 3_000);
        assert_eq!(loaded.depth(), 2_999);
        assert_eq!(
            loaded.query(&words[2_500], 0, 5).unwrap(),
            tree.query(&words[2_500], 0, 5).unwrap()
        );
    }
}
