use crate::types::{Node, NodeId};

/// Plain search-tree node: key and two child links.
#[derive(Clone, Debug)]
pub struct BstNode<K> {
    pub l: Option<NodeId>,
    pub r: Option<NodeId>,
    pub k: K,
}

impl<K> BstNode<K> {
    pub fn new(k: K) -> Self {
        Self { l: None, r: None, k }
    }
}

impl<K> Node<K> for BstNode<K> {
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
}
