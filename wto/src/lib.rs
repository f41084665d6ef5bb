//! Bourdoncle's weak topological ordering: a hierarchical decomposition of a
//! directed graph, reachable from a root node, into vertices and nested
//! strongly connected components. Grounded on
//! `examples/original_source/test/unit/WeakTopologicalOrderingTest.cpp`
//! (the example from Bourdoncle's paper, reproduced in this crate's tests)
//! and the path-based DFS algorithm it exercises.

use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;

/// One element of a weak topological ordering: either a plain vertex, or a
/// strongly connected component with a designated head and its own nested
/// ordering over the rest of the component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WtoComponent<N> {
    Vertex(N),
    Scc { head: N, body: Vec<WtoComponent<N>> },
}

impl<N> WtoComponent<N> {
    pub fn head_node(&self) -> &N {
        match self {
            WtoComponent::Vertex(n) => n,
            WtoComponent::Scc { head, .. } => head,
        }
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self, WtoComponent::Vertex(_))
    }

    pub fn is_scc(&self) -> bool {
        matches!(self, WtoComponent::Scc { .. })
    }

    /// The component's inner ordering (everything reachable within the SCC
    /// other than the head itself). Empty for a plain vertex.
    pub fn body(&self) -> &[WtoComponent<N>] {
        match self {
            WtoComponent::Vertex(_) => &[],
            WtoComponent::Scc { body, .. } => body,
        }
    }
}

impl<N: std::fmt::Display> std::fmt::Display for WtoComponent<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WtoComponent::Vertex(n) => write!(f, "{}", n),
            WtoComponent::Scc { head, body } => {
                write!(f, "({}", head)?;
                for component in body {
                    write!(f, " {}", component)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The top-level weak topological ordering: a sequence of components in
/// traversal order, restartable by reconstructing it from the same root and
/// successor function (the output itself is immutable once built).
#[derive(Clone, Debug)]
pub struct Wto<N> {
    components: Vec<WtoComponent<N>>,
}

impl<N: Clone + Eq + Hash> Wto<N> {
    /// Builds the weak topological ordering of the graph reachable from
    /// `root` via `successors`, using Bourdoncle's path-based DFS: assign a
    /// depth-first number to each node; on a back-edge, fold every node
    /// between the target and the source into one component; recurse on
    /// that component (minus its head) for the component's inner ordering.
    pub fn new<F, I>(root: N, successors: F) -> Self
    where
        F: Fn(&N) -> I,
        I: IntoIterator<Item = N>,
    {
        let mut builder = Builder {
            successors,
            dfn: HashMap::new(),
            stack: Vec::new(),
            next_num: 0,
        };
        let mut components = Vec::new();
        builder.visit(root, &mut components);
        Wto { components }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WtoComponent<N>> {
        self.components.iter()
    }
}

impl<N: std::fmt::Display> std::fmt::Display for Wto<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl<'a, N> IntoIterator for &'a Wto<N> {
    type Item = &'a WtoComponent<N>;
    type IntoIter = std::slice::Iter<'a, WtoComponent<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

struct Builder<N, F> {
    successors: F,
    // 0 means unvisited; `i64::MAX` marks a node that has been fully
    // assigned to a component.
    dfn: HashMap<N, i64>,
    stack: Vec<N>,
    next_num: i64,
}

impl<N: Clone + Eq + Hash, F, I> Builder<N, F>
where
    F: Fn(&N) -> I,
    I: IntoIterator<Item = N>,
{
    fn dfn_of(&self, n: &N) -> i64 {
        *self.dfn.get(n).unwrap_or(&0)
    }

    fn successors_of(&self, n: &N) -> SmallVec<[N; 4]> {
        (self.successors)(n).into_iter().collect()
    }

    /// Visits `vertex`, appending finished vertices/components to the front
    /// of `partition` as they're discovered to be fully processed, and
    /// returns the lowest depth-first number reachable from `vertex` (used
    /// by the caller to detect whether `vertex` itself heads a component).
    fn visit(&mut self, vertex: N, partition: &mut Vec<WtoComponent<N>>) -> i64 {
        self.stack.push(vertex.clone());
        self.next_num += 1;
        let num = self.next_num;
        self.dfn.insert(vertex.clone(), num);
        let mut head = num;
        let mut is_loop = false;

        for successor in self.successors_of(&vertex) {
            let successor_dfn = self.dfn_of(&successor);
            let min = if successor_dfn == 0 {
                self.visit(successor, partition)
            } else {
                successor_dfn
            };
            if min <= head {
                head = min;
                is_loop = true;
            }
        }

        if head == num {
            self.dfn.insert(vertex.clone(), i64::MAX);
            let mut element = self.stack.pop().expect("path-based DFS stack underflow");
            if is_loop {
                while element != vertex {
                    self.dfn.insert(element.clone(), 0);
                    element = self.stack.pop().expect("path-based DFS stack underflow");
                }
                let body = self.component(&vertex);
                partition.insert(0, WtoComponent::Scc { head: vertex, body });
            } else {
                partition.insert(0, WtoComponent::Vertex(vertex));
            }
        }
        head
    }

    /// The nested weak topological ordering of a component headed at
    /// `vertex`: every successor of `vertex` still marked unvisited (i.e.
    /// folded into this component rather than finalized earlier) is
    /// (re-)visited here.
    fn component(&mut self, vertex: &N) -> Vec<WtoComponent<N>> {
        let mut body = Vec::new();
        for successor in self.successors_of(vertex) {
            if self.dfn_of(&successor) == 0 {
                self.visit(successor, &mut body);
            }
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::{HashMap as StdHashMap, HashSet};

    struct Graph {
        edges: StdHashMap<&'static str, HashSet<&'static str>>,
    }

    impl Graph {
        fn new() -> Self {
            Graph { edges: StdHashMap::new() }
        }

        fn add_edge(&mut self, source: &'static str, target: &'static str) {
            self.edges.entry(source).or_default().insert(target);
        }

        fn successors(&self, node: &&'static str) -> Vec<&'static str> {
            let mut succs: Vec<&'static str> =
                self.edges.get(node).into_iter().flatten().copied().collect();
            succs.sort_unstable();
            succs
        }
    }

    /// The example from page 4 of Bourdoncle's paper, reproduced by the
    /// original test suite.
    fn bourdoncle_paper_graph() -> Graph {
        let mut g = Graph::new();
        g.add_edge("1", "2");
        g.add_edge("2", "3");
        g.add_edge("3", "4");
        g.add_edge("4", "5");
        g.add_edge("5", "6");
        g.add_edge("6", "7");
        g.add_edge("7", "8");
        g.add_edge("2", "8");
        g.add_edge("4", "7");
        g.add_edge("6", "5");
        g.add_edge("7", "3");
        g
    }

    #[test]
    fn example_from_the_paper() {
        let g = bourdoncle_paper_graph();
        let wto = Wto::new("1", |n| g.successors(n));
        assert_eq!(format!("{}", wto), "1 2 (3 4 (5 6) 7) 8");
    }

    #[test]
    fn component_structure_matches_the_nesting() {
        let g = bourdoncle_paper_graph();
        let wto = Wto::new("1", |n| g.successors(n));
        let components: Vec<&WtoComponent<&str>> = wto.iter().collect();

        assert_eq!(*components[0].head_node(), "1");
        assert!(components[0].is_vertex());
        assert_eq!(*components[1].head_node(), "2");
        assert!(components[1].is_vertex());

        let outer_scc = components[2];
        assert_eq!(*outer_scc.head_node(), "3");
        assert!(outer_scc.is_scc());
        let outer_body = outer_scc.body();
        assert_eq!(*outer_body[0].head_node(), "4");
        assert!(outer_body[0].is_vertex());

        let inner_scc = &outer_body[1];
        assert_eq!(*inner_scc.head_node(), "5");
        assert!(inner_scc.is_scc());
        assert_eq!(inner_scc.body().len(), 1);
        assert_eq!(*inner_scc.body()[0].head_node(), "6");

        assert_eq!(*outer_body[2].head_node(), "7");
        assert!(outer_body[2].is_vertex());

        assert_eq!(*components[3].head_node(), "8");
        assert!(components[3].is_vertex());
    }

    #[test]
    fn acyclic_graph_has_no_sccs() {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        let wto = Wto::new("a", |n| g.successors(n));
        assert!(wto.iter().all(|c| c.is_vertex()));
        assert_eq!(format!("{}", wto), "a b c");
    }

    #[test]
    fn single_node_self_loop_is_an_scc_of_one() {
        let mut g = Graph::new();
        g.add_edge("a", "a");
        let wto = Wto::new("a", |n| g.successors(n));
        let components: Vec<&WtoComponent<&str>> = wto.iter().collect();
        assert_eq!(components.len(), 1);
        assert!(components[0].is_scc());
        assert!(components[0].body().is_empty());
        assert_eq!(format!("{}", wto), "(a)");
    }
}
