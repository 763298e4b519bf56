//! Property checks: the distributed engine agrees with the serial reference
//! for every worker count, and its predecessor tree is consistent.
mod util;

use dijkstra_spmd::prelude::*;
use proptest::prelude::*;
use util::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn distributed_matches_serial(
        n in 1usize..14,
        density in 0.0f64..1.0,
        directed in any::<bool>(),
        workers in 1usize..6,
        seed in any::<u64>(),
    ) {
        let max = n * (n - 1);
        let edges = (max as f64 * density) as usize;
        let g = random_graph_with(n, edges, directed, seed);
        let source = (seed as usize) % n;

        let want = dijkstra_serial(&g, source).unwrap();
        let got = run_workers(&g, source, workers);

        prop_assert_eq!(&got.distances, &want.distances);
        prop_assert_eq!(&got.predecessors, &want.predecessors);
        prop_assert_eq!(got.iterations, want.iterations);
        assert_tree_consistent(&g, &got);
    }

    #[test]
    fn result_does_not_depend_on_worker_count(
        n in 2usize..12,
        directed in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let g = random_graph_with(n, n * (n - 1) / 4, directed, seed);
        let base = run_workers(&g, 0, 1);
        for workers in [2, 3, n, n + 1] {
            let r = run_workers(&g, 0, workers);
            prop_assert_eq!(&r.distances, &base.distances);
            prop_assert_eq!(&r.predecessors, &base.predecessors);
        }
    }

    #[test]
    fn reachable_vertices_have_paths_from_source(
        n in 1usize..12,
        seed in any::<u64>(),
    ) {
        let g = random_graph_with(n, n, true, seed);
        let r = run_workers(&g, 0, 3);
        for v in 0..n {
            match r.path_to(v) {
                Some(path) => {
                    prop_assert_eq!(path[0], 0);
                    prop_assert_eq!(*path.last().unwrap(), v);
                }
                None => prop_assert_eq!(r.distances[v], -1),
            }
        }
    }
}
