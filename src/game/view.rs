use crate::*;
use fixedbitset::FixedBitSet;
use petgraph::graph::EdgeIndex;
use petgraph::graph::NodeIndex;
use std::collections::VecDeque;

/// Pruned view of a [`Game`].
///
/// Exclusions are two liveness masks over the arena: hidden nodes and
/// hidden edges. An edge is visible when it is not hidden and both of its
/// endpoints are visible. Adjacency queries return owned index lists, so a
/// caller can hide what it just iterated without aliasing the view.
#[derive(Debug, Clone)]
pub struct View<'g, S, A>
where
    S: Ident,
    A: Ident,
{
    game: &'g Game<S, A>,
    nodes: FixedBitSet,
    edges: FixedBitSet,
}

impl<'g, S, A> View<'g, S, A>
where
    S: Ident,
    A: Ident,
{
    pub fn new(game: &'g Game<S, A>) -> Self {
        Self {
            game,
            nodes: FixedBitSet::with_capacity(game.n()),
            edges: FixedBitSet::with_capacity(game.m()),
        }
    }
    pub fn game(&self) -> &'g Game<S, A> {
        self.game
    }

    pub fn has_node(&self, n: NodeIndex) -> bool {
        !self.nodes.contains(n.index())
    }
    pub fn has_edge(&self, e: EdgeIndex) -> bool {
        !self.edges.contains(e.index())
            && self.has_node(self.game.source(e))
            && self.has_node(self.game.target(e))
    }
    pub fn outgoing(&self, n: NodeIndex) -> Vec<EdgeIndex> {
        match self.has_node(n) {
            false => Vec::new(),
            true => self
                .game
                .outgoing(n)
                .filter(|e| self.has_edge(*e))
                .collect(),
        }
    }
    pub fn incoming(&self, n: NodeIndex) -> Vec<EdgeIndex> {
        match self.has_node(n) {
            false => Vec::new(),
            true => self
                .game
                .incoming(n)
                .filter(|e| self.has_edge(*e))
                .collect(),
        }
    }
    pub fn out_degree(&self, n: NodeIndex) -> usize {
        self.outgoing(n).len()
    }

    pub fn hide_node(&mut self, n: NodeIndex) {
        self.nodes.insert(n.index());
    }
    pub fn hide_edge(&mut self, e: EdgeIndex) {
        self.edges.insert(e.index());
    }
    /// Make a state absorbing by hiding everything leaving it.
    pub fn hide_outgoing(&mut self, n: NodeIndex) {
        for e in self.game.outgoing(n) {
            self.edges.insert(e.index());
        }
    }
    /// Disable one action at a state, i.e. every edge it labels.
    pub fn hide_action(&mut self, n: NodeIndex, action: &A) {
        for e in self.game.outgoing(n) {
            if self.game.action(e) == action {
                self.edges.insert(e.index());
            }
        }
    }

    /// Mask of visible nodes.
    pub fn nodes(&self) -> FixedBitSet {
        let mut mask = FixedBitSet::with_capacity(self.game.n());
        mask.insert_range(..);
        mask.difference_with(&self.nodes);
        mask
    }
    /// Mask of visible edges.
    pub fn edges(&self) -> FixedBitSet {
        let mut mask = FixedBitSet::with_capacity(self.game.m());
        for e in self.game.edges().filter(|e| self.has_edge(*e)) {
            mask.insert(e.index());
        }
        mask
    }

    /// Visible nodes with no visible path into `sources`.
    pub fn disconnected(&self, sources: &FixedBitSet) -> FixedBitSet {
        let mut reached = FixedBitSet::with_capacity(self.game.n());
        let mut queue = sources
            .ones()
            .map(NodeIndex::new)
            .filter(|n| self.has_node(*n))
            .collect::<VecDeque<_>>();
        for n in queue.iter() {
            reached.insert(n.index());
        }
        while let Some(v) = queue.pop_front() {
            for e in self.incoming(v) {
                let u = self.game.source(e);
                if !reached.put(u.index()) {
                    queue.push_back(u);
                }
            }
        }
        let mut mask = self.nodes();
        mask.difference_with(&reached);
        mask
    }
}
