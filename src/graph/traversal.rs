//! Graph traversal algorithms

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// BFS traversal from start nodes, level by level up to `max_depth` hops
pub fn bfs<T, F>(start: &[T], max_depth: usize, mut get_neighbors: F) -> Vec<T>
where
    T: Copy + Eq + Hash,
    F: FnMut(T) -> Vec<T>,
{
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from_iter(start.iter().copied());
    let mut result = Vec::new();
    let mut depth = 0;

    while !queue.is_empty() && depth <= max_depth {
        let level_size = queue.len();

        for _ in 0..level_size {
            if let Some(node) = queue.pop_front() {
                if !visited.insert(node) {
                    continue;
                }

                result.push(node);

                if depth == max_depth {
                    continue;
                }

                for neighbor in get_neighbors(node) {
                    if !visited.contains(&neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        depth += 1;
    }

    result
}

/// DFS traversal (transitive closure along `get_neighbors`)
pub fn dfs<T, F>(start: &[T], max_depth: usize, mut get_neighbors: F) -> Vec<T>
where
    T: Copy + Eq + Hash,
    F: FnMut(T) -> Vec<T>,
{
    let mut visited = HashSet::new();
    let mut stack = Vec::from_iter(start.iter().map(|&id| (id, 0usize)));
    let mut result = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        if depth > max_depth {
            continue;
        }

        if !visited.insert(node) {
            continue;
        }

        result.push(node);

        for neighbor in get_neighbors(node) {
            if !visited.contains(&neighbor) {
                stack.push((neighbor, depth.saturating_add(1)));
            }
        }
    }

    result
}

#[derive(Clone, Copy)]
struct State<T> {
    cost: f64,
    node: T,
}

impl<T> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl<T> Eq for State<T> {}

impl<T> PartialOrd for State<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for State<T> {
    // Reversed so BinaryHeap pops the cheapest state
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

/// Dijkstra between two nodes. `get_edges` yields `(neighbor, weight)` pairs
/// and may reject an edge with an error. Weights must be non-negative.
///
/// Returns the node sequence and total cost, or `None` if `target` is unreachable.
pub fn dijkstra<T, F, E>(source: T, target: T, mut get_edges: F) -> Result<Option<(Vec<T>, f64)>, E>
where
    T: Copy + Eq + Hash,
    F: FnMut(T) -> Result<Vec<(T, f64)>, E>,
{
    let mut dist: HashMap<T, f64> = HashMap::new();
    let mut prev: HashMap<T, T> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(State { cost: 0.0, node: source });

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            let mut path = vec![target];
            let mut current = target;
            while let Some(&p) = prev.get(&current) {
                path.push(p);
                current = p;
            }
            path.reverse();
            return Ok(Some((path, cost)));
        }

        if dist.get(&node).map_or(false, |&best| cost > best) {
            continue;
        }

        for (next, weight) in get_edges(node)? {
            let candidate = cost + weight;
            if dist.get(&next).map_or(true, |&best| candidate < best) {
                dist.insert(next, candidate);
                prev.insert(next, node);
                heap.push(State { cost: candidate, node: next });
            }
        }
    }

    Ok(None)
}
