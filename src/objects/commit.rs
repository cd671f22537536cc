//! A commit is an immutable snapshot: a root tree key, zero or more parent
//! commit keys, and a free-form message. Authorship metadata is not modeled
//! here: `author`/`committer` header lines are tolerated on parse (for
//! compatibility with payloads written by other implementations) but
//! discarded, and this core never emits them.
//!
//! Payload format:
//! ```text
//! tree <key>
//! parent <key>     # zero or more
//! author <...>     # optional, ignored
//! committer <...>  # optional, ignored
//!
//! <message>
//! ```

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: String,
    pub parents: Vec<String>,
    pub message: String,
}

impl Commit {
    pub fn new(tree: impl Into<String>, parents: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            tree: tree.into(),
            parents,
            message: message.into(),
        }
    }

    pub fn is_initial(&self) -> bool {
        self.parents.is_empty()
    }

    /// The first non-blank line of the message, used for one-line log
    /// output and as the return value of `commit`/`checkout`.
    pub fn short_comment(&self) -> &str {
        self.message
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("")
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("tree {}\n", self.tree));
        for parent in &self.parents {
            out.push_str(&format!("parent {parent}\n"));
        }
        out.push('\n');
        out.push_str(&self.message);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut tree = None;
        let mut parents = Vec::new();
        let mut lines = content.lines();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            if let Some(key) = line.strip_prefix("tree ") {
                tree = Some(key.to_string());
            } else if let Some(key) = line.strip_prefix("parent ") {
                parents.push(key.to_string());
            } else if line.starts_with("author ")
                || line.starts_with("committer ")
                || line.starts_with("commiter ")
            {
                // Authorship lines from other implementations; not modeled, not emitted.
            } else {
                return Err(Error::Corrupt(format!(
                    "unrecognized commit header line: {line:?}"
                )));
            }
        }

        let tree = tree.ok_or_else(|| Error::Corrupt("commit missing tree header".to_string()))?;
        let message: String = lines.collect::<Vec<_>>().join("\n");

        Ok(Self {
            tree,
            parents,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_then_parse_roundtrips() {
        let commit = Commit::new("a".repeat(40), vec!["b".repeat(40)], "first\n\nbody line");
        let parsed = Commit::parse(&commit.serialize()).unwrap();
        assert_eq!(parsed.tree, commit.tree);
        assert_eq!(parsed.parents, commit.parents);
        assert_eq!(parsed.message, commit.message);
    }

    #[test]
    fn initial_commit_has_no_parents() {
        let commit = Commit::new("a".repeat(40), vec![], "initial");
        assert!(commit.is_initial());
    }

    #[test]
    fn short_comment_is_first_nonblank_line() {
        let commit = Commit::new("a".repeat(40), vec![], "\nsecond\nthird");
        assert_eq!(commit.short_comment(), "second");
    }

    #[test]
    fn parse_rejects_missing_tree() {
        assert!(Commit::parse("\nmessage only").is_err());
    }

    #[test]
    fn parse_tolerates_author_and_committer_lines() {
        let tree = "a".repeat(40);
        let content = format!(
            "tree {tree}\nauthor Jane <jane@example.com> 0 +0000\ncommiter Jane <jane@example.com> 0 +0000\ncommitter Jane <jane@example.com> 0 +0000\n\nmessage"
        );
        let commit = Commit::parse(&content).unwrap();
        assert_eq!(commit.tree, tree);
        assert_eq!(commit.message, "message");
    }

    #[test]
    fn parse_rejects_truly_unrecognized_header_line() {
        let tree = "a".repeat(40);
        let content = format!("tree {tree}\nbogus header\n\nmessage");
        assert!(Commit::parse(&content).is_err());
    }
}
