//! Node trait definitions.
//!
//! Every engine stores its nodes in an [`Arena`](crate::arena::Arena) and
//! links them with `Option<NodeId>` indices. The three node variants
//! (plain, AVL, red-black) share the key/left/right shape through [`Node`];
//! variant-specific data is surfaced through the defaulted accessors so a
//! snapshot can be taken without knowing the concrete node type.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Index of a node inside an engine's arena.
pub type NodeId = u32;

/// Keys must be totally ordered. Equal keys route right on insert.
pub trait Key: Ord + Clone + Debug {}

impl<T: Ord + Clone + Debug> Key for T {}

/// Common shape shared by all node variants.
pub trait Node<K> {
    fn key(&self) -> &K;
    fn set_key(&mut self, key: K);
    fn l(&self) -> Option<NodeId>;
    fn r(&self) -> Option<NodeId>;
    fn set_l(&mut self, v: Option<NodeId>);
    fn set_r(&mut self, v: Option<NodeId>);

    /// Cached subtree height, AVL nodes only.
    fn height(&self) -> Option<u32> {
        None
    }

    /// Node color, red-black nodes only.
    fn color(&self) -> Option<Color> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
}

impl Color {
    pub fn from_black(black: bool) -> Self {
        if black {
            Color::Black
        } else {
            Color::Red
        }
    }

    pub fn is_black(self) -> bool {
        self == Color::Black
    }
}

/// Which engine a tree (or a snapshot of one) belongs to.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[value(name = "bst")]
    Bst,
    #[default]
    #[value(name = "avl")]
    Avl,
    #[value(name = "red-black")]
    RedBlack,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Bst => "bst",
            Variant::Avl => "avl",
            Variant::RedBlack => "red-black",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
