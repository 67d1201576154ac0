use crate::types::{Node, NodeId};

/// AVL node with a cached subtree height (`1` for a leaf).
#[derive(Clone, Debug)]
pub struct AvlNode<K> {
    pub l: Option<NodeId>,
    pub r: Option<NodeId>,
    pub k: K,
    pub h: u32,
}

impl<K> AvlNode<K> {
    pub fn new(k: K) -> Self {
        Self {
            l: None,
            r: None,
            k,
            h: 1,
        }
    }
}

impl<K> Node<K> for AvlNode<K> {
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

    fn height(&self) -> Option<u32> {
        Some(self.h)
    }
}
