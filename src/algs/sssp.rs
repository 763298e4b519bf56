//! End-to-end distributed run: validate → bootstrap → timed iteration loop → report.

use std::time::Instant;

use crate::algs::bootstrap::{Bootstrapped, COORDINATOR, bootstrap};
use crate::algs::communicator::Communicator;
use crate::algs::engine::IterationEngine;
use crate::config::RunConfig;
use crate::graph::DenseGraph;
use crate::report::{RunMode, SsspReport};
use crate::sssp_error::SsspError;

/// Run the distributed shortest-path computation described by `config`.
///
/// Must be called by every rank of `comm`. Returns `Some(report)` on the
/// coordinator and `None` on every other rank.
///
/// # Errors
/// Configuration errors are raised before any collective. Input errors are
/// raised on the coordinator and mirrored as [`SsspError::Aborted`] elsewhere.
pub fn distributed_sssp<C: Communicator>(
    comm: &C,
    config: &RunConfig,
) -> Result<Option<SsspReport>, SsspError> {
    config.validate()?;
    let boot = bootstrap(comm, config.vertex_count, config.source, || {
        config.input.load(config.vertex_count)
    })?;
    solve(comm, boot, config.source)
}

/// Same as [`distributed_sssp`] for a graph already in memory on the coordinator.
/// Non-coordinator ranks may pass any graph of the same vertex count; only the
/// coordinator's copy is distributed.
pub fn distributed_sssp_graph<C: Communicator>(
    comm: &C,
    graph: &DenseGraph,
    source: usize,
) -> Result<Option<SsspReport>, SsspError> {
    let n = graph.vertex_count();
    if source >= n {
        return Err(SsspError::SourceOutOfRange {
            vertex: source as i64,
            vertex_count: n,
        });
    }
    let boot = bootstrap(comm, n, source, || Ok(graph.clone()))?;
    solve(comm, boot, source)
}

fn solve<C: Communicator>(
    comm: &C,
    boot: Bootstrapped,
    source: usize,
) -> Result<Option<SsspReport>, SsspError> {
    let Bootstrapped {
        partition,
        graph,
        initial,
    } = boot;
    let engine = IterationEngine::new(comm, &graph, partition, initial)?;
    let start = Instant::now();
    let outcome = engine.run()?;
    let elapsed = start.elapsed();

    if comm.rank() != COORDINATOR {
        return Ok(None);
    }
    let report = SsspReport::from_state(
        &outcome.state,
        partition.vertex_count(),
        source,
        if comm.is_no_comm() { RunMode::Serial } else { RunMode::Parallel },
        comm.size(),
        outcome.iterations,
        elapsed,
    );
    log::info!(
        "coordinator: {} of {} vertices reachable, loop took {:.6}s",
        report.distances.iter().filter(|&&d| d >= 0).count(),
        report.vertex_count(),
        report.elapsed_secs
    );
    Ok(Some(report))
}
