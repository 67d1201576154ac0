use crate::types::{Color, Node, NodeId};

/// Red-black node. `p` is a non-owning back-link used by fixups and
/// rotations only; snapshots never copy it.
#[derive(Clone, Debug)]
pub struct RbNode<K> {
    pub p: Option<NodeId>,
    pub l: Option<NodeId>,
    pub r: Option<NodeId>,
    pub k: K,
    /// Node color: `true` = black, `false` = red.
    pub b: bool,
}

impl<K> RbNode<K> {
    /// New nodes start red.
    pub fn new(k: K) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            b: false,
        }
    }
}

impl<K> Node<K> for RbNode<K> {
    fn key(&self) -> &K {
        &self.k
    }

    fn set_key(&mut self, key: K) {
        self.k = key;
    }

    fn l(&self) -> Option<NodeId> {
        self.l
    }

    fn r(&self) -> Option<NodeId> {
        self.r
    }

    fn set_l(&mut self, v: Option<NodeId>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<NodeId>) {
        self.r = v;
    }

    fn color(&self) -> Option<Color> {
        Some(Color::from_black(self.b))
    }
}
