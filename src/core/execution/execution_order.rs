use std::collections::BTreeSet;

/// Outcome of topologically sorting the component graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordering {
    /// Components grouped into stages; members of one stage do not depend on each other
    Stages(Vec<Vec<usize>>),
    /// The graph has a cycle; one witnessing cycle, first node repeated at the end
    Cycle(Vec<usize>),
}

/// Manages topological sorting and execution order calculation for components.
///
/// Components are identified by registration position. Ties inside a stage are
/// broken by registration order, so the result is deterministic.
pub struct ExecutionOrderBuilder;

impl ExecutionOrderBuilder {
    /// Build a staged execution order from `(source, target)` edges.
    /// Uses modified Kahn's algorithm to detect cycles.
    pub fn build_execution_order_stages(component_count: usize, edges: &[(usize, usize)]) -> Ordering {
        let mut adj_list: Vec<Vec<usize>> = vec![Vec::new(); component_count];
        let mut in_degree: Vec<usize> = vec![0; component_count];

        for &(source, target) in edges {
            adj_list[source].push(target);
            in_degree[target] += 1;
        }

        let mut remaining: BTreeSet<usize> = (0..component_count).collect();
        let mut stages = Vec::new();

        while !remaining.is_empty() {
            // Find all components with zero in-degree (current stage)
            let current_stage: Vec<usize> = remaining
                .iter()
                .copied()
                .filter(|&node| in_degree[node] == 0)
                .collect();

            if current_stage.is_empty() {
                return Ordering::Cycle(Self::find_cycle(&adj_list, &remaining));
            }

            for &node in &current_stage {
                remaining.remove(&node);
                for &neighbor in &adj_list[node] {
                    in_degree[neighbor] -= 1;
                }
            }

            stages.push(current_stage);
        }

        Ordering::Stages(stages)
    }

    /// Flattened execution order
    pub fn build_execution_order(component_count: usize, edges: &[(usize, usize)]) -> Result<Vec<usize>, Vec<usize>> {
        match Self::build_execution_order_stages(component_count, edges) {
            Ordering::Stages(stages) => Ok(stages.into_iter().flatten().collect()),
            Ordering::Cycle(cycle) => Err(cycle),
        }
    }

    /// Every node left after Kahn's algorithm has a predecessor that is also
    /// left. Walking predecessors backwards from any of them must therefore
    /// revisit a node; the path between the two visits is a cycle.
    fn find_cycle(adj_list: &[Vec<usize>], remaining: &BTreeSet<usize>) -> Vec<usize> {
        let predecessor = |node: usize| {
            remaining
                .iter()
                .copied()
                .find(|&candidate| adj_list[candidate].contains(&node))
        };

        let Some(&start) = remaining.iter().next() else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut current = start;
        while let Some(previous) = predecessor(current) {
            if let Some(position) = path.iter().position(|&node| node == previous) {
                let mut cycle: Vec<usize> = path[position..].to_vec();
                // path was walked backwards along edges
                cycle.reverse();
                cycle.push(cycle[0]);
                return cycle;
            }
            path.push(previous);
            current = previous;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_execution_order_stages_simple() {
        // A -> B -> C
        let stages = ExecutionOrderBuilder::build_execution_order_stages(3, &[(0, 1), (1, 2)]);
        assert_eq!(stages, Ordering::Stages(vec![vec![0], vec![1], vec![2]]));
    }

    #[test]
    fn test_build_execution_order_stages_parallel() {
        // A -> B, A -> C, B -> D, C -> D
        let stages = ExecutionOrderBuilder::build_execution_order_stages(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(stages, Ordering::Stages(vec![vec![0], vec![1, 2], vec![3]]));
    }

    #[test]
    fn test_stage_members_follow_registration_order() {
        // D registered last but has no inputs, so it shares the first stage
        let stages = ExecutionOrderBuilder::build_execution_order_stages(3, &[(2, 0)]);
        assert_eq!(stages, Ordering::Stages(vec![vec![1, 2], vec![0]]));
    }

    #[test]
    fn test_build_execution_order_stages_cycle_detection() {
        // A -> B -> A
        let result = ExecutionOrderBuilder::build_execution_order_stages(2, &[(0, 1), (1, 0)]);
        match result {
            Ordering::Cycle(cycle) => {
                assert_eq!(cycle.len(), 3);
                assert_eq!(cycle.first(), cycle.last());
                assert!(cycle.contains(&0) && cycle.contains(&1));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_witness_skips_downstream_nodes() {
        // 0 -> 1 -> 2 -> 1, 2 -> 3
        let result = ExecutionOrderBuilder::build_execution_order(4, &[(0, 1), (1, 2), (2, 1), (2, 3)]);
        let cycle = result.unwrap_err();
        assert_eq!(cycle, vec![2, 1, 2]);
    }

    #[test]
    fn test_build_execution_order_flattens_stages() {
        let flattened = ExecutionOrderBuilder::build_execution_order(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(flattened, vec![0, 1, 2]);
    }
}
