//! Transitive closure over a directed graph of integer nodes.
//!
//! Nodes that can reach each other form one strongly connected component and
//! share a single closure set, stored once on the component. Two nodes of the
//! same component report the same [`ClosureId`].

use bit_set::BitSet;
use crate::Map;

#[derive(Debug, Clone, Default)]
pub struct Closures {
  /// node id -> slot
  slots: Map<usize, usize>,
  /// slot -> node id
  nodes: Vec<usize>,
  /// slot -> component
  components: Vec<usize>,
  /// component -> every node reachable from any member, members included
  sets: Vec<BitSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClosureId(usize);

const UNVISITED: usize = usize::MAX;

impl Closures {
  pub fn new<I>(edges: I) -> Self
    where I: IntoIterator<Item = (usize, usize)>
  {
    let mut slots = Map::default();
    let mut nodes = vec![];
    let mut adjacent: Vec<Vec<usize>> = vec![];

    let mut slot_of = |node: usize, adjacent: &mut Vec<Vec<usize>>| -> usize {
      *slots.entry(node).or_insert_with(|| {
        nodes.push(node);
        adjacent.push(vec![]);
        nodes.len() - 1
      })
    };

    for (from, to) in edges {
      let from = slot_of(from, &mut adjacent);
      let to = slot_of(to, &mut adjacent);
      // self-loops only register the node
      if from != to {
        adjacent[from].push(to);
      }
    }

    let (components, sets) = resolve(&nodes, &adjacent);

    Self {
      slots,
      nodes,
      components,
      sets,
    }
  }

  /// Closure of a node, or `None` if the node appears in no edge.
  pub fn get(&self, node: usize) -> Option<&BitSet> {
    let slot = *self.slots.get(&node)?;
    Some(&self.sets[self.components[slot]])
  }

  pub fn id_of(&self, node: usize) -> Option<ClosureId> {
    let slot = *self.slots.get(&node)?;
    Some(ClosureId(self.components[slot]))
  }

  pub fn contains_node(&self, node: usize) -> bool {
    self.slots.contains_key(&node)
  }

  pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
    self.nodes.iter().copied()
  }

  /// Union of the closures of `seeds`. A seed absent from the graph
  /// contributes only itself.
  pub fn of_nodes<I>(&self, seeds: I) -> BitSet
    where I: IntoIterator<Item = usize>
  {
    let mut result = BitSet::new();
    let mut seen = BitSet::new();

    for node in seeds {
      match self.slots.get(&node) {
        Some(&slot) => {
          let component = self.components[slot];
          if seen.insert(component) {
            result.union_with(&self.sets[component]);
          }
        }
        None => {
          result.insert(node);
        }
      }
    }

    result
  }
}

/// Plain reachability from one node, without building shared closures.
pub fn closure_of_one_node<I>(edges: I, node: usize) -> BitSet
  where I: IntoIterator<Item = (usize, usize)>
{
  let mut adjacent = Map::<usize, Vec<usize>>::default();
  for (from, to) in edges {
    adjacent.entry(from).or_default().push(to);
  }

  let mut result = BitSet::new();
  result.insert(node);
  let mut stack = vec![node];

  while let Some(n) = stack.pop() {
    if let Some(next) = adjacent.get(&n) {
      for &m in next {
        if result.insert(m) {
          stack.push(m);
        }
      }
    }
  }

  result
}

/// Iterative Tarjan. Components are completed in reverse topological order,
/// so every successor component's set is final when a component closes.
fn resolve(nodes: &[usize], adjacent: &[Vec<usize>]) -> (Vec<usize>, Vec<BitSet>) {
  let n = nodes.len();
  let mut index = vec![UNVISITED; n];
  let mut low = vec![0; n];
  let mut on_stack = vec![false; n];
  let mut stack = vec![];
  let mut components = vec![UNVISITED; n];
  let mut sets: Vec<BitSet> = vec![];
  let mut next_index = 0;

  for root in 0..n {
    if index[root] != UNVISITED {
      continue;
    }

    index[root] = next_index;
    low[root] = next_index;
    next_index += 1;
    stack.push(root);
    on_stack[root] = true;

    // (slot, next edge to explore)
    let mut frames = vec![(root, 0)];

    while let Some(frame) = frames.last_mut() {
      let v = frame.0;

      if frame.1 < adjacent[v].len() {
        let w = adjacent[v][frame.1];
        frame.1 += 1;

        if index[w] == UNVISITED {
          index[w] = next_index;
          low[w] = next_index;
          next_index += 1;
          stack.push(w);
          on_stack[w] = true;
          frames.push((w, 0));
        } else if on_stack[w] {
          low[v] = low[v].min(index[w]);
        }
        continue;
      }

      frames.pop();
      if let Some(&(parent, _)) = frames.last() {
        low[parent] = low[parent].min(low[v]);
      }

      if low[v] != index[v] {
        continue;
      }

      let component = sets.len();
      let mut set = BitSet::new();
      let mut members = vec![];

      while let Some(w) = stack.pop() {
        on_stack[w] = false;
        components[w] = component;
        set.insert(nodes[w]);
        members.push(w);
        if w == v {
          break;
        }
      }

      for &member in &members {
        for &w in &adjacent[member] {
          let other = components[w];
          if other != component {
            set.union_with(&sets[other]);
          }
        }
      }

      sets.push(set);
    }
  }

  (components, sets)
}
